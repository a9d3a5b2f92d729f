use serde::{Deserialize, Serialize};

/// Compiled-in defaults, used when no config file is given.
pub const DEFAULT_CONFIG: &str = include_str!("../config/config.toml");

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CatalogConfig {
    pub api_url: String,
    /// Request timeout in seconds.
    pub timeout: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct LogConfig {
    pub json: bool,
}

fn default_page_size() -> u32 {
    20
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}
