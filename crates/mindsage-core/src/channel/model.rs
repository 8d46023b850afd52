//! Channel model.

use crate::identity::Credential;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Serializable summary of a [`TrustAnchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustStatus {
    Pinned,
    Fetched,
    /// Degraded mode: the channel works but responses are not verified.
    Unverified,
}

/// Root-of-trust state of a channel.
#[derive(Clone, PartialEq, Eq)]
pub enum TrustAnchor {
    /// Production endpoint; the anchor is known ahead of time.
    Pinned,
    /// Development endpoint; the anchor was fetched during bootstrap.
    Fetched(Vec<u8>),
    /// Bootstrap exhausted its attempts; responses cannot be verified.
    Unverified { attempts: u32, last_error: String },
}

impl TrustAnchor {
    pub fn is_verified(&self) -> bool {
        !matches!(self, Self::Unverified { .. })
    }

    pub fn status(&self) -> TrustStatus {
        match self {
            Self::Pinned => TrustStatus::Pinned,
            Self::Fetched(_) => TrustStatus::Fetched,
            Self::Unverified { .. } => TrustStatus::Unverified,
        }
    }

    /// Key fetched during bootstrap. `None` for pinned and unverified anchors.
    pub fn root_key(&self) -> Option<&[u8]> {
        match self {
            Self::Fetched(key) => Some(key),
            _ => None,
        }
    }
}

impl std::fmt::Debug for TrustAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pinned => f.write_str("Pinned"),
            Self::Fetched(key) => write!(f, "Fetched({} bytes)", key.len()),
            Self::Unverified {
                attempts,
                last_error,
            } => f
                .debug_struct("Unverified")
                .field("attempts", attempts)
                .field("last_error", last_error)
                .finish(),
        }
    }
}

/// How much optional configuration a channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelProfile {
    /// Primary construction with every configured setting.
    Full,
    /// Fallback construction with optional settings dropped.
    Minimal,
}

/// Optional transport settings. Empty on minimal channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSettings {
    pub request_timeout: Option<Duration>,
    pub ingress_expiry: Option<Duration>,
}

/// Ready-to-use transport binding for one credential.
///
/// Immutable once built. A fresh channel is built on every init or login
/// cycle and never reused across identities.
#[derive(Debug, Clone)]
pub struct Channel {
    host: String,
    service_id: String,
    credential: Credential,
    trust: TrustAnchor,
    profile: ChannelProfile,
    settings: ChannelSettings,
}

impl Channel {
    pub fn new(
        host: impl Into<String>,
        service_id: impl Into<String>,
        credential: Credential,
        trust: TrustAnchor,
        profile: ChannelProfile,
        settings: ChannelSettings,
    ) -> Self {
        Self {
            host: host.into(),
            service_id: service_id.into(),
            credential,
            trust,
            profile,
            settings,
        }
    }

    /// Builds the minimal counterpart of this channel: same credential, host
    /// and trust anchor, optional settings dropped.
    pub fn to_minimal(&self) -> Self {
        Self {
            profile: ChannelProfile::Minimal,
            settings: ChannelSettings::default(),
            ..self.clone()
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn trust(&self) -> &TrustAnchor {
        &self.trust
    }

    pub fn profile(&self) -> ChannelProfile {
        self.profile
    }

    pub fn settings(&self) -> &ChannelSettings {
        &self.settings
    }
}
