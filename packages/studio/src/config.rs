use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Studio configuration file format. CLI flags override file values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the admin backend consumed by the API client.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Page whose sections this studio session edits.
    #[serde(default = "default_page_key")]
    pub page_key: String,

    /// HTTP port for the studio surface (admin API + preview SSE).
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_api_base() -> String {
    "http://127.0.0.1:9000".to_string()
}

fn default_page_key() -> String {
    "home".to_string()
}

fn default_port() -> u16 {
    4180
}

impl Config {
    /// Load config from a directory, falling back to defaults when no
    /// config file exists.
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            page_key: default_page_key(),
            port: default_port(),
        }
    }
}
