use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use survey_config::Config;
use survey_server::SurveyServer;
use survey_storage::RecordLog;
use tracing::info;

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_path: Option<PathBuf>,
}

pub async fn handle(config: Config, overrides: Overrides) -> Result<()> {
    let config = apply(config, overrides);

    let log = RecordLog::open(config.storage.path.clone())
        .await
        .context("Failed to open record log")?;

    info!("Appending survey records to {}", log.path().display());

    SurveyServer::new(Arc::new(log))
        .serve(&config.bind_addr())
        .await
}

fn apply(mut config: Config, overrides: Overrides) -> Config {
    if let Some(host) = overrides.host {
        config.server.host = host;
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    if let Some(path) = overrides.log_path {
        config.storage.path = Some(path);
    }
    config
}
