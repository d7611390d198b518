use crate::config::Config;
use anyhow::{Context, Result};
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use std::fs;

/// Initialize file logging under the askr home directory.
///
/// Logs go to `~/.askr/logs/` rather than stderr so the TUI screen stays
/// clean. Level comes from `RUST_LOG`, defaulting to `info`. The returned
/// handle must stay alive for the duration of the program.
pub fn init(config: &Config) -> Result<LoggerHandle> {
    let log_dir = config.askr_home.join("logs");
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let handle = Logger::try_with_env_or_str("info")?
        .log_to_file(FileSpec::default().directory(log_dir).basename("askr"))
        .start()
        .context("Failed to start logger")?;

    Ok(handle)
}
