pub mod config;
pub mod probe;
pub mod session;
pub mod therapy;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use mindsage_application::SessionManager;
use mindsage_core::OpResult;
use mindsage_core::config::{EndpointClass, SessionConfig};
use mindsage_infrastructure::config_service::{self, ConfigService};
use mindsage_infrastructure::{FileIdentityClientFactory, MindsagePaths};
use mindsage_interaction::{HttpActorBinder, HttpChannelTransport};
use std::path::PathBuf;
use std::sync::Arc;

/// Options shared by every command.
pub struct GlobalOptions {
    pub config_path: Option<PathBuf>,
    pub network: Option<String>,
}

impl GlobalOptions {
    pub fn config_service(&self) -> Result<ConfigService> {
        match &self.config_path {
            Some(path) => Ok(ConfigService::with_path(path.clone())),
            None => ConfigService::new().context("Failed to resolve config path"),
        }
    }

    /// Resolves the configuration: flags > environment > file > defaults.
    pub fn load_config(&self) -> Result<SessionConfig> {
        let service = self.config_service()?;
        let mut config = service
            .load()
            .with_context(|| format!("Failed to load {}", service.path().display()))?;
        if let Some(network) = &self.network {
            config.endpoint_class = EndpointClass::from_network(network);
        }
        config_service::validate(&config)?;
        Ok(config)
    }
}

/// Wires a session manager with the file identity and HTTP bindings.
pub fn session_manager(options: &GlobalOptions) -> Result<SessionManager> {
    let config = options.load_config()?;
    let identity_path = MindsagePaths::identity_file()?;
    tracing::debug!(
        "[CLI] {} via {} (identity file {})",
        config.service_id,
        config.host(),
        identity_path.display()
    );
    Ok(SessionManager::new(
        config,
        Arc::new(FileIdentityClientFactory::with_path(identity_path)),
        Arc::new(HttpChannelTransport::new()),
        Arc::new(HttpActorBinder::new()),
    ))
}

/// Restores the session and fails unless it is authenticated.
pub async fn signed_in_manager(options: &GlobalOptions) -> Result<SessionManager> {
    let manager = session_manager(options)?;
    let phase = manager.initialize().await;
    if !phase.is_authenticated() {
        anyhow::bail!("Not signed in. Run `mindsage login` first.");
    }
    Ok(manager)
}

/// Turns a failed envelope into an error carrying its message and kind.
pub fn into_anyhow<T>(result: OpResult<T>) -> Result<T> {
    if let (Some(message), Some(kind)) = (result.error_message(), result.error_kind()) {
        anyhow::bail!("{} ({:?})", message, kind);
    }
    result.into_result().map_err(anyhow::Error::msg)
}

/// Formats an optional timestamp for display.
pub fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
