use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default endpoint of the answering service
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/chatbot/chat/";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Answering service endpoint
    pub endpoint: String,

    /// Outbound request timeout in seconds
    pub request_timeout_secs: u64,

    /// Askr home directory
    pub askr_home: PathBuf,

    /// UI preferences
    pub ui: UiConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub show_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));

        Config {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 60,
            askr_home: home.join(".askr"),
            ui: UiConfig {
                show_timestamps: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from `~/.askr/config.toml`, falling back to
    /// defaults when the file does not exist yet.
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        let askr_home = home.join(".askr");
        let config_path = askr_home.join("config.toml");

        fs::create_dir_all(&askr_home).context("Failed to create .askr directory")?;

        let mut config = if config_path.exists() {
            Self::read_from(&config_path)?
        } else {
            Config::default()
        };

        config.askr_home = askr_home;

        // Write the defaults out on first run so they are editable.
        if !config_path.exists() {
            config.save()?;
        }

        Ok(config)
    }

    /// Parse a config file from an explicit path
    pub fn read_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to `config.toml` under the askr home
    pub fn save(&self) -> Result<()> {
        let config_path = self.askr_home.join("config.toml");
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, content).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_service() {
        let config = Config::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout_secs, 60);
        assert!(config.ui.show_timestamps);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.endpoint = "http://service.test/chat".to_string();
        config.request_timeout_secs = 5;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let restored: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(restored.endpoint, "http://service.test/chat");
        assert_eq!(restored.request_timeout_secs, 5);
    }

    #[test]
    fn read_from_parses_a_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
endpoint = "http://elsewhere/chat"
request_timeout_secs = 10
askr_home = "/tmp/askr-test"

[ui]
show_timestamps = false
"#,
        )
        .unwrap();

        let config = Config::read_from(&path).unwrap();
        assert_eq!(config.endpoint, "http://elsewhere/chat");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(!config.ui.show_timestamps);
    }
}
