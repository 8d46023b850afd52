//! File-backed identity client.
//!
//! A credential stored at `~/.config/mindsage/identity.json` acts as the
//! persisted authentication state. There is no browser flow: login succeeds
//! only when a valid credential file is already present.

use crate::paths::MindsagePaths;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mindsage_core::config::{ClientOptions, LoginOptions};
use mindsage_core::error::Result;
use mindsage_core::identity::{Credential, IdentityClient, IdentityClientFactory, LoginOutcome};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const INTERACTIVE_LOGIN_UNAVAILABLE: &str = "interactive login requires a browser";

/// On-disk layout of the credential file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredIdentity {
    credential: Credential,
    saved_at: DateTime<Utc>,
}

/// Identity client reading a persisted credential from disk.
pub struct FileIdentityClient {
    path: PathBuf,
    options: ClientOptions,
}

impl FileIdentityClient {
    pub fn new(path: PathBuf, options: ClientOptions) -> Self {
        Self { path, options }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Persists `credential`, replacing any existing one.
    pub async fn store(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let stored = StoredIdentity {
            credential: credential.clone(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        tokio::fs::write(&self.path, json).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, permissions).await?;
        }

        tracing::info!(
            "[FileIdentityClient] Stored credential for {}",
            credential.principal()
        );
        Ok(())
    }

    /// Reads the credential; missing, unreadable or expired files yield `None`.
    async fn load(&self) -> Option<Credential> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(
                    "[FileIdentityClient] Failed to read {}: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        let stored: StoredIdentity = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(
                    "[FileIdentityClient] Ignoring malformed credential file {}: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        if stored.credential.is_expired_at(Utc::now()) {
            tracing::info!(
                "[FileIdentityClient] Credential for {} has expired",
                stored.credential.principal()
            );
            return None;
        }
        Some(stored.credential)
    }
}

#[async_trait]
impl IdentityClient for FileIdentityClient {
    async fn is_authenticated(&self) -> bool {
        self.load().await.is_some()
    }

    async fn identity(&self) -> Option<Credential> {
        self.load().await
    }

    async fn login(&self, options: &LoginOptions) -> LoginOutcome {
        match self.load().await {
            Some(credential) => {
                tracing::info!(
                    "[FileIdentityClient] Using stored credential for {}",
                    credential.principal()
                );
                LoginOutcome::LoggedIn
            }
            None => {
                tracing::debug!(
                    "[FileIdentityClient] No stored credential, cannot open {}",
                    options.identity_provider
                );
                LoginOutcome::Failed(INTERACTIVE_LOGIN_UNAVAILABLE.to_string())
            }
        }
    }

    async fn logout(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!("[FileIdentityClient] Removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Creates [`FileIdentityClient`]s for one credential file.
pub struct FileIdentityClientFactory {
    path: PathBuf,
}

impl FileIdentityClientFactory {
    /// Factory for the default credential file.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: MindsagePaths::identity_file()?,
        })
    }

    /// Factory with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl IdentityClientFactory for FileIdentityClientFactory {
    async fn create(&self, options: &ClientOptions) -> Result<Arc<dyn IdentityClient>> {
        tracing::debug!(
            "[FileIdentityClient] Creating client for {} (idle logout disabled: {})",
            self.path.display(),
            options.disable_idle
        );
        Ok(Arc::new(FileIdentityClient::new(
            self.path.clone(),
            options.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use mindsage_core::config::SessionConfig;
    use mindsage_core::identity::Principal;
    use tempfile::TempDir;

    fn client(dir: &TempDir) -> FileIdentityClient {
        FileIdentityClient::new(
            dir.path().join("identity.json"),
            ClientOptions { disable_idle: true },
        )
    }

    #[tokio::test]
    async fn test_missing_file_is_unauthenticated() {
        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir);

        assert!(!client.is_authenticated().await);
        assert!(client.identity().await.is_none());
    }

    #[tokio::test]
    async fn test_store_then_identity() {
        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir);
        let credential = Credential::new(Principal::new("2ibo7-dia"), "delegation", None);

        client.store(&credential).await.unwrap();

        assert!(client.is_authenticated().await);
        assert_eq!(client.identity().await, Some(credential));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stored_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir);
        client.store(&Credential::anonymous()).await.unwrap();

        let mode = std::fs::metadata(client.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_expired_credential_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir);
        let expired = Credential::new(
            Principal::new("2ibo7-dia"),
            "delegation",
            Some(Utc::now() - Duration::hours(1)),
        );
        client.store(&expired).await.unwrap();

        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_malformed_file_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir);
        std::fs::write(client.path(), "{ not json").unwrap();

        assert!(client.identity().await.is_none());
    }

    #[tokio::test]
    async fn test_login_without_credential_fails() {
        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir);

        let outcome = client.login(&SessionConfig::default().login_options()).await;
        assert_eq!(
            outcome,
            LoginOutcome::Failed(INTERACTIVE_LOGIN_UNAVAILABLE.to_string())
        );
    }

    #[tokio::test]
    async fn test_login_with_stored_credential_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir);
        client.store(&Credential::anonymous()).await.unwrap();

        let outcome = client.login(&SessionConfig::default().login_options()).await;
        assert!(outcome.is_logged_in());
    }

    #[tokio::test]
    async fn test_logout_removes_file_and_is_repeatable() {
        let temp_dir = TempDir::new().unwrap();
        let client = client(&temp_dir);
        client.store(&Credential::anonymous()).await.unwrap();

        client.logout().await.unwrap();
        assert!(!client.path().exists());
        client.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_factory_uses_configured_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("identity.json");
        let factory = FileIdentityClientFactory::with_path(path.clone());

        FileIdentityClient::new(path, ClientOptions { disable_idle: true })
            .store(&Credential::anonymous())
            .await
            .unwrap();
        let created = factory
            .create(&ClientOptions { disable_idle: false })
            .await
            .unwrap();

        assert!(created.is_authenticated().await);
    }
}
