//! Session state model.

use mindsage_core::channel::TrustStatus;
use mindsage_core::error::MindsageError;
use mindsage_core::identity::{Credential, Principal};
use mindsage_core::therapy::UserProfile;
use serde::Serialize;

/// Lifecycle phase of a session manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Initializing,
    Unauthenticated,
    AuthenticatedNoProfile,
    AuthenticatedWithProfile,
    LoggingOut,
}

impl SessionPhase {
    pub fn is_authenticated(&self) -> bool {
        matches!(
            self,
            Self::AuthenticatedNoProfile | Self::AuthenticatedWithProfile
        )
    }

    /// Whether a lifecycle transition is currently running.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Initializing | Self::LoggingOut)
    }
}

/// Snapshot of the session as seen by a presentation layer.
///
/// Invariant: `authenticated == false` implies `credential`, `principal_id`
/// and `user_profile` are all `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub authenticated: bool,
    #[serde(skip)]
    pub credential: Option<Credential>,
    pub principal_id: Option<Principal>,
    pub channel_ready: bool,
    pub channel_trust: Option<TrustStatus>,
    pub user_profile: Option<UserProfile>,
    pub loading: bool,
}

impl SessionState {
    /// Drops everything tied to an identity, keeping the loading flag.
    pub(crate) fn clear_identity(&mut self) {
        *self = Self {
            loading: self.loading,
            ..Self::default()
        };
    }

    /// Whether the channel runs without a verified trust anchor.
    pub fn is_degraded(&self) -> bool {
        self.channel_trust == Some(TrustStatus::Unverified)
    }

    /// Warning to surface while the channel is degraded.
    pub fn degradation(&self) -> Option<MindsageError> {
        self.is_degraded().then(|| {
            MindsageError::ChannelUnverified(
                "root key could not be fetched, responses are not verified".to_string(),
            )
        })
    }
}
