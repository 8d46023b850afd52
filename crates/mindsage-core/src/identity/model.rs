//! Principal and credential models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Textual form of the anonymous principal.
pub const ANONYMOUS_PRINCIPAL: &str = "2vxsx-fae";

/// Stable identifier of an authenticated party.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS_PRINCIPAL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_PRINCIPAL
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Verifiable identity handle issued by the identity provider.
///
/// Owned by the identity client. The session layer only clones it and never
/// changes it; the token is opaque and must not be logged.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    principal: Principal,
    token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(
        principal: Principal,
        token: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            principal,
            token: token.into(),
            expires_at,
        }
    }

    /// Credential that authenticates as nobody.
    pub fn anonymous() -> Self {
        Self::new(Principal::anonymous(), String::new(), None)
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

// Keep the token out of logs and panics.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("principal", &self.principal)
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
