mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use survey_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        cli::Commands::Serve {
            host,
            port,
            log_path,
        } => {
            let overrides = commands::serve::Overrides {
                host,
                port,
                log_path,
            };
            commands::serve::handle(config, overrides).await
        }
        cli::Commands::Config { path } => {
            commands::config::handle(&config, cli.config.as_deref(), path)
        }
    }
}
