//! Identity client contract.

use super::model::Credential;
use crate::config::{ClientOptions, LoginOptions};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Outcome of an interactive login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    /// The user closed or abandoned the provider flow.
    Cancelled,
    /// The provider reported an error.
    Failed(String),
}

impl LoginOutcome {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn)
    }
}

/// Client for the delegated identity provider.
///
/// Implementations persist the authentication state between runs; the session
/// layer only reads it through this trait.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Returns whether a persisted, still valid credential exists.
    async fn is_authenticated(&self) -> bool;

    /// Returns the current credential, if any.
    async fn identity(&self) -> Option<Credential>;

    /// Runs the interactive provider flow.
    async fn login(&self, options: &LoginOptions) -> LoginOutcome;

    /// Invalidates the provider-side session and the persisted credential.
    async fn logout(&self) -> Result<()>;
}

/// Creates identity clients.
#[async_trait]
pub trait IdentityClientFactory: Send + Sync {
    async fn create(&self, options: &ClientOptions) -> Result<Arc<dyn IdentityClient>>;
}
