//! Configuration loading.
//!
//! Reads `SessionConfig` from `~/.config/mindsage/config.toml` and applies
//! environment overrides on top. A missing file yields the defaults.

use crate::paths::MindsagePaths;
use mindsage_core::config::{EndpointClass, SessionConfig};
use mindsage_core::error::{MindsageError, Result};
use std::path::{Path, PathBuf};

pub const ENV_NETWORK: &str = "MINDSAGE_NETWORK";
pub const ENV_HOST: &str = "MINDSAGE_HOST";
pub const ENV_SERVICE_ID: &str = "MINDSAGE_SERVICE_ID";

/// Loads the session configuration.
///
/// Precedence: environment > file > defaults.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Creates a ConfigService for the default config file.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: MindsagePaths::config_file()?,
        })
    }

    /// Creates a ConfigService with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file layer only.
    ///
    /// # Returns
    ///
    /// - `Ok(SessionConfig)`: Parsed file, or defaults if the file does not exist
    /// - `Err(MindsageError::Io)`: Failed to read the file
    /// - `Err(MindsageError::Serialization)`: Invalid TOML
    pub fn load_file(&self) -> Result<SessionConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigService] No config file at {}, using defaults",
                self.path.display()
            );
            return Ok(SessionConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config = toml::from_str(&content)?;
        tracing::debug!("[ConfigService] Loaded {}", self.path.display());
        Ok(config)
    }

    /// Loads the file and applies the process environment.
    pub fn load(&self) -> Result<SessionConfig> {
        let config = self.load_file()?;
        Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
    }

    /// Writes `config` to the file, creating the parent directory.
    pub fn save(&self, config: &SessionConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, content)?;
        tracing::info!("[ConfigService] Saved {}", self.path.display());
        Ok(())
    }
}

/// Applies environment overrides read through `lookup`.
///
/// Blank values are ignored.
pub fn apply_env_overrides<F>(mut config: SessionConfig, lookup: F) -> SessionConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(network) = get(ENV_NETWORK) {
        config.endpoint_class = EndpointClass::from_network(&network);
    }
    if let Some(host) = get(ENV_HOST) {
        config.host = Some(host.trim().to_string());
    }
    if let Some(service_id) = get(ENV_SERVICE_ID) {
        config.service_id = service_id.trim().to_string();
    }
    config
}

/// Rejects configurations the session layer cannot run with.
pub fn validate(config: &SessionConfig) -> Result<()> {
    if config.service_id.trim().is_empty() {
        return Err(MindsageError::config("service_id must not be empty"));
    }
    let host = config.host();
    if !(host.starts_with("http://") || host.starts_with("https://")) {
        return Err(MindsageError::config(format!(
            "host must be an http(s) URL, got '{}'",
            host
        )));
    }
    Ok(())
}
