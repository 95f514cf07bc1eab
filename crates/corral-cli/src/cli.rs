use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "corral",
    about = "Corral: paginated, content-negotiated REST collections",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the demo collections over HTTP
    Serve(ServeArgs),
    /// Parse a config file and print the effective settings
    CheckConfig(CheckConfigArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on; overrides the config file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Host used in pagination links; overrides the config file
    #[arg(long)]
    pub public_host: Option<String>,
}

#[derive(Args)]
pub struct CheckConfigArgs {
    pub path: PathBuf,
}
