//! Path management for MindSage files.
//!
//! Everything lives under the platform config directory resolved by `dirs`.

use mindsage_core::error::{MindsageError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "mindsage";

/// Path management for MindSage.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/mindsage/          # Config directory (XDG on Linux)
/// ├── config.toml              # Session configuration
/// └── identity.json            # Persisted credential
/// ```
pub struct MindsagePaths;

impl MindsagePaths {
    /// Returns the MindSage configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/mindsage/`)
    /// - `Err(MindsageError::Config)`: Could not determine the platform config directory
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| MindsageError::config("Cannot find config directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted credential.
    ///
    /// # Security Note
    ///
    /// The file holds a bearer token and is written with mode 600 on Unix.
    pub fn identity_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("identity.json"))
    }
}
