use anyhow::Result;
use std::path::Path;
use survey_config::Config;
use survey_storage::RecordLog;

pub fn handle(config: &Config, explicit_path: Option<&Path>, path_only: bool) -> Result<()> {
    let config_path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_path);

    if path_only {
        println!("{}", config_path.display());
        return Ok(());
    }

    let log_path = config
        .storage
        .path
        .clone()
        .unwrap_or_else(RecordLog::default_path);

    println!("# {}", config_path.display());
    print!("{}", toml::to_string_pretty(config)?);
    println!("# record log: {}", log_path.display());

    Ok(())
}
