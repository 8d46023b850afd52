//! Channel construction with trust bootstrap.

use mindsage_core::channel::{
    Channel, ChannelProfile, ChannelSettings, ChannelTransport, TrustAnchor,
};
use mindsage_core::config::SessionConfig;
use mindsage_core::identity::Credential;
use std::sync::Arc;

/// Builds ready-to-use channels bound to a credential.
///
/// Development endpoints fetch their trust anchor with bounded retries. When
/// every attempt fails the channel is still returned, marked
/// [`TrustAnchor::Unverified`], so the session can continue in degraded mode.
/// Production endpoints skip the fetch.
pub struct ChannelBuilder {
    config: SessionConfig,
    transport: Arc<dyn ChannelTransport>,
}

impl ChannelBuilder {
    pub fn new(config: SessionConfig, transport: Arc<dyn ChannelTransport>) -> Self {
        Self { config, transport }
    }

    /// Builds a fully configured channel for `credential`.
    pub async fn build(&self, credential: Credential) -> Channel {
        let trust = if self.config.endpoint_class.requires_trust_bootstrap() {
            self.bootstrap_trust().await
        } else {
            TrustAnchor::Pinned
        };

        tracing::debug!(
            "[ChannelBuilder] Channel ready for {} at {} (trust: {:?})",
            credential.principal(),
            self.config.host(),
            trust.status()
        );

        Channel::new(
            self.config.host(),
            self.config.service_id.clone(),
            credential,
            trust,
            ChannelProfile::Full,
            ChannelSettings {
                request_timeout: self.config.request_timeout(),
                ingress_expiry: self.config.ingress_expiry(),
            },
        )
    }

    async fn bootstrap_trust(&self) -> TrustAnchor {
        let host = self.config.host();
        let attempts = self.config.bootstrap.attempts();
        let delay = self.config.bootstrap.retry_delay();
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.transport.fetch_root_key(host).await {
                Ok(root_key) => {
                    tracing::info!(
                        "[ChannelBuilder] Fetched root key from {} (attempt {}/{})",
                        host,
                        attempt,
                        attempts
                    );
                    return TrustAnchor::Fetched(root_key);
                }
                Err(e) => {
                    tracing::warn!(
                        "[ChannelBuilder] Root key fetch failed (attempt {}/{}): {}",
                        attempt,
                        attempts,
                        e
                    );
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        tracing::warn!(
            "[ChannelBuilder] Could not fetch root key after {} attempts, continuing with an unverified channel",
            attempts
        );
        TrustAnchor::Unverified {
            attempts,
            last_error,
        }
    }
}
