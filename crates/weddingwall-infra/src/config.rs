//! Configuration loader for the photo wall.
//!
//! Reads an optional `config.toml` and deserializes it into [`WallConfig`],
//! falling back to defaults when the file is missing or malformed. LINE
//! channel credentials come from the environment only.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use weddingwall_types::config::WallConfig;

/// Explicit config file path.
pub const CONFIG_PATH_ENV: &str = "WEDDINGWALL_CONFIG";
/// Overrides `storage.base_dir`.
pub const UPLOAD_DIR_ENV: &str = "WEDDINGWALL_UPLOAD_DIR";
pub const CHANNEL_SECRET_ENV: &str = "LINE_CHANNEL_SECRET";
pub const ACCESS_TOKEN_ENV: &str = "LINE_CHANNEL_ACCESS_TOKEN";

/// Placeholder used when a credential is not configured.
const DUMMY_CREDENTIAL: &str = "dummy";

/// Resolve the config file path.
///
/// Priority:
/// 1. `WEDDINGWALL_CONFIG` environment variable
/// 2. `~/.weddingwall/config.toml`, with `.` standing in for the home
///    directory when it cannot be determined
pub fn resolve_config_path() -> PathBuf {
    resolve_config_path_with(|key| std::env::var(key).ok())
}

fn resolve_config_path_with(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(path) = lookup(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".weddingwall")
        .join("config.toml")
}

/// Load configuration from `path`.
///
/// - Missing file: [`WallConfig::default()`].
/// - Unreadable or unparseable file: warning logged, defaults returned.
pub async fn load_config(path: &Path) -> WallConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return WallConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return WallConfig::default();
        }
    };

    match toml::from_str::<WallConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            WallConfig::default()
        }
    }
}

/// Apply environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: &mut WallConfig) {
    apply_overrides_with(config, |key| std::env::var(key).ok());
}

fn apply_overrides_with(config: &mut WallConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(dir) = lookup(UPLOAD_DIR_ENV).filter(|d| !d.is_empty()) {
        config.storage.base_dir = PathBuf::from(dir);
    }
}

/// Resolve, load and override in one step.
pub async fn load_effective_config() -> WallConfig {
    let path = resolve_config_path();
    let mut config = load_config(&path).await;
    apply_env_overrides(&mut config);
    config
}

/// LINE channel credentials.
pub struct LineCredentials {
    pub channel_secret: SecretString,
    pub access_token: SecretString,
    /// Names of variables that were missing and replaced with the placeholder.
    pub missing: Vec<&'static str>,
}

impl LineCredentials {
    /// Read credentials from the environment.
    ///
    /// Missing values fall back to `"dummy"` so the server can still start;
    /// signature checks then fail for every real LINE request.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut missing = Vec::new();
        let mut read = |key: &'static str| match lookup(key).filter(|v| !v.is_empty()) {
            Some(value) => SecretString::from(value),
            None => {
                tracing::warn!(variable = key, "credential not set, using placeholder");
                missing.push(key);
                SecretString::from(DUMMY_CREDENTIAL)
            }
        };
        let channel_secret = read(CHANNEL_SECRET_ENV);
        let access_token = read(ACCESS_TOKEN_ENV);
        Self {
            channel_secret,
            access_token,
            missing,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}
