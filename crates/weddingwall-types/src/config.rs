//! Configuration types for the photo wall.
//!
//! `WallConfig` mirrors the optional `config.toml`. Channel credentials are
//! not part of it; they come from the environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default storage base path holding `before/`, `displaying/` and `done/`.
pub const DEFAULT_UPLOAD_BASE: &str = "/tmp/uploads";

/// Top-level configuration. All fields have defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WallConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub line: LineApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(DEFAULT_UPLOAD_BASE)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Endpoints of the LINE Messaging API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineApiConfig {
    /// Base URL for the reply endpoint.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Base URL for message content downloads.
    #[serde(default = "default_data_api_base_url")]
    pub data_api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://api.line.me".to_string()
}

fn default_data_api_base_url() -> String {
    "https://api-data.line.me".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LineApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            data_api_base_url: default_data_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = WallConfig::default();
        assert_eq!(config.storage.base_dir, PathBuf::from("/tmp/uploads"));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.line.api_base_url, "https://api.line.me");
        assert_eq!(config.line.timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: WallConfig = toml::from_str("").unwrap();
        assert_eq!(config.storage.base_dir, PathBuf::from(DEFAULT_UPLOAD_BASE));
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let toml_str = r#"
[storage]
base_dir = "/srv/wall"

[server]
port = 8080
"#;
        let config: WallConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage.base_dir, PathBuf::from("/srv/wall"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.line.data_api_base_url, "https://api-data.line.me");
    }
}
