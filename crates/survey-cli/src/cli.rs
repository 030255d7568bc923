use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "survey")]
#[command(about = "Survey intake service with PII redaction", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config directory)
    #[arg(long, global = true, env = "SURVEY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind (default from config: 127.0.0.1)
        #[arg(long, env = "SURVEY_HOST")]
        host: Option<String>,

        /// Port to bind (default from config: 5000)
        #[arg(long, env = "SURVEY_PORT")]
        port: Option<u16>,

        /// Record log file
        #[arg(long, env = "SURVEY_LOG_PATH")]
        log_path: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Only print the config file path
        #[arg(long)]
        path: bool,
    },
}
