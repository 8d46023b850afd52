//! Trust bootstrap over HTTP.
//!
//! Development replicas publish their root key on the status endpoint.

use crate::http_error::{map_http_status, map_reqwest_error};
use async_trait::async_trait;
use mindsage_core::channel::ChannelTransport;
use mindsage_core::remote::{TransportError, TransportErrorCode};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const STATUS_PATH: &str = "api/v2/status";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    root_key: Option<Vec<u8>>,
}

/// Fetches root keys from a replica's status endpoint.
pub struct HttpChannelTransport {
    client: Client,
}

impl HttpChannelTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpChannelTransport {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn status_url(host: &str) -> String {
    format!("{}/{}", host.trim_end_matches('/'), STATUS_PATH)
}

#[async_trait]
impl ChannelTransport for HttpChannelTransport {
    async fn fetch_root_key(&self, host: &str) -> Result<Vec<u8>, TransportError> {
        let url = status_url(host);
        tracing::debug!("[HttpTransport] GET {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| map_reqwest_error("Root key fetch failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_status(status, &body));
        }

        let parsed: StatusResponse = response
            .json()
            .await
            .map_err(|e| map_reqwest_error("Failed to parse status response", e))?;

        match parsed.root_key {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(TransportError::new(
                TransportErrorCode::Protocol,
                "Status response did not include a root key",
            )),
        }
    }
}
