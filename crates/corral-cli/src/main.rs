use clap::Parser;

mod cli;
mod commands;
mod demo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    commands::run_command(cli).await
}
