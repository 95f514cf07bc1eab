use colored::Colorize;
use tracing_subscriber::EnvFilter;

use corral_server::{CorralServer, ServerConfig};

use crate::cli::*;
use crate::demo;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args, cli.verbose).await,
        Command::CheckConfig(args) => cmd_check_config(args, cli.format),
    }
}

async fn cmd_serve(args: ServeArgs, verbose: bool) -> anyhow::Result<()> {
    let config = effective_config(&args)?;
    init_tracing(&config.log_filter, verbose);

    let resources = demo::resources().await?;
    println!(
        "{} Corral serving {} on {}",
        "✓".green().bold(),
        resources.names().collect::<Vec<_>>().join(", ").cyan(),
        config.bind_addr.to_string().bold()
    );
    CorralServer::new(config, resources).serve().await?;
    Ok(())
}

fn cmd_check_config(args: CheckConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = ServerConfig::load(&args.path)?;
    match format {
        OutputFormat::Text => {
            println!("{} {}", "✓".green().bold(), args.path.display());
            print!("{}", config.to_toml()?);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

/// Config file (or defaults) with command-line overrides applied.
fn effective_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(host) = &args.public_host {
        config.public_host = Some(host.clone());
    }
    Ok(config)
}

/// `RUST_LOG` wins; otherwise the configured filter, or `debug` with `-v`.
fn init_tracing(log_filter: &str, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { log_filter })
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
