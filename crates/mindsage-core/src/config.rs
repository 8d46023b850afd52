//! Session configuration model.
//!
//! Everything the session layer needs to know about its environment is carried
//! here explicitly; no component reads environment variables on its own.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PRODUCTION_HOST: &str = "https://ic0.app";
pub const DEVELOPMENT_HOST: &str = "http://127.0.0.1:4943";
pub const DEFAULT_IDENTITY_PROVIDER: &str = "https://identity.ic0.app/#authorize";
pub const DEFAULT_SERVICE_ID: &str = "uxrrr-q7777-77774-qaaaq-cai";

/// Maximum delegation lifetime requested at login (7 days).
pub const DEFAULT_MAX_TIME_TO_LIVE_SECS: u64 = 7 * 24 * 60 * 60;

pub const DEFAULT_REGISTRATION_TIMEOUT_MS: u64 = 10_000;
pub const MIN_REGISTRATION_TIMEOUT_MS: u64 = 10_000;
pub const MAX_REGISTRATION_TIMEOUT_MS: u64 = 15_000;

/// Classification of the remote endpoint.
///
/// Development endpoints do not ship a known trust anchor, so every channel
/// built against them performs a trust bootstrap first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EndpointClass {
    Production,
    #[default]
    Development,
}

impl EndpointClass {
    /// Maps a network name (`ic`, `local`, ...) to an endpoint class.
    pub fn from_network(network: &str) -> Self {
        if network.trim().eq_ignore_ascii_case("ic") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn default_host(&self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_HOST,
            Self::Development => DEVELOPMENT_HOST,
        }
    }

    pub fn requires_trust_bootstrap(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Retry policy for the trust bootstrap fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapPolicy {
    #[serde(default = "default_bootstrap_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_bootstrap_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_bootstrap_attempts() -> u32 {
    3
}

fn default_bootstrap_delay_ms() -> u64 {
    1_000
}

impl Default for BootstrapPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_bootstrap_attempts(),
            retry_delay_ms: default_bootstrap_delay_ms(),
        }
    }
}

impl BootstrapPolicy {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// At least one attempt is always made.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Options used when the identity client is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// Disables idle-timeout logout inside the identity client.
    pub disable_idle: bool,
}

/// Options passed to every interactive login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOptions {
    pub identity_provider: String,
    pub max_time_to_live: Duration,
}

/// Root configuration for a session manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub endpoint_class: EndpointClass,
    /// Overrides the endpoint class default host.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_service_id")]
    pub service_id: String,
    #[serde(default = "default_identity_provider")]
    pub identity_provider: String,
    #[serde(default = "default_max_time_to_live_secs")]
    pub max_time_to_live_secs: u64,
    #[serde(default = "default_disable_idle")]
    pub disable_idle: bool,
    #[serde(default = "default_registration_timeout_ms")]
    pub registration_timeout_ms: u64,
    #[serde(default)]
    pub bootstrap: BootstrapPolicy,
    /// Optional per-request timeout applied to fully configured channels.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// Optional ingress expiry applied to fully configured channels.
    #[serde(default)]
    pub ingress_expiry_secs: Option<u64>,
}

fn default_service_id() -> String {
    DEFAULT_SERVICE_ID.to_string()
}

fn default_identity_provider() -> String {
    DEFAULT_IDENTITY_PROVIDER.to_string()
}

fn default_max_time_to_live_secs() -> u64 {
    DEFAULT_MAX_TIME_TO_LIVE_SECS
}

fn default_disable_idle() -> bool {
    true
}

fn default_registration_timeout_ms() -> u64 {
    DEFAULT_REGISTRATION_TIMEOUT_MS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint_class: EndpointClass::default(),
            host: None,
            service_id: default_service_id(),
            identity_provider: default_identity_provider(),
            max_time_to_live_secs: default_max_time_to_live_secs(),
            disable_idle: default_disable_idle(),
            registration_timeout_ms: default_registration_timeout_ms(),
            bootstrap: BootstrapPolicy::default(),
            request_timeout_ms: None,
            ingress_expiry_secs: None,
        }
    }
}

impl SessionConfig {
    /// Convenience constructor for an endpoint class with all defaults.
    pub fn for_endpoint(endpoint_class: EndpointClass) -> Self {
        Self {
            endpoint_class,
            ..Self::default()
        }
    }

    /// Effective host: explicit override or the endpoint class default.
    pub fn host(&self) -> &str {
        self.host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| self.endpoint_class.default_host())
    }

    /// Registration deadline, clamped to the supported 10–15 s window.
    pub fn registration_timeout(&self) -> Duration {
        Duration::from_millis(
            self.registration_timeout_ms
                .clamp(MIN_REGISTRATION_TIMEOUT_MS, MAX_REGISTRATION_TIMEOUT_MS),
        )
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn ingress_expiry(&self) -> Option<Duration> {
        self.ingress_expiry_secs.map(Duration::from_secs)
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            disable_idle: self.disable_idle,
        }
    }

    pub fn login_options(&self) -> LoginOptions {
        LoginOptions {
            identity_provider: self.identity_provider.clone(),
            max_time_to_live: Duration::from_secs(self.max_time_to_live_secs),
        }
    }
}
