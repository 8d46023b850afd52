//! Therapy service actor over an HTTP/JSON gateway.
//!
//! Every method is a `POST {host}/api/v2/canister/{service_id}/call/{method}`
//! with the positional arguments as a JSON array. The reply is either
//! `{"Ok": <payload>}` or `{"Err": "<reason>"}`.
//!
//! Channels whose anchor was fetched during bootstrap pin it on every call
//! through the `x-root-key` header; the gateway rejects calls pinned to a key
//! other than its own, so a replica restarted under a new key is reported
//! as a verification failure instead of answering unverified.

use crate::http_error::{map_http_status, map_reqwest_error};
use async_trait::async_trait;
use mindsage_core::channel::{ActorBinder, Channel, ChannelProfile, ChannelSettings, TrustAnchor};
use mindsage_core::identity::Credential;
use mindsage_core::remote::{ServiceError, ServiceResult, TransportError};
use mindsage_core::therapy::{
    EndSessionRequest, ProgressReport, TherapyService, TherapySession, UserProfile,
};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Longest ingress expiry a replica accepts.
pub const MAX_INGRESS_EXPIRY: Duration = Duration::from_secs(5 * 60);

const REQUEST_ID_HEADER: &str = "x-request-id";
const INGRESS_EXPIRY_HEADER: &str = "x-ingress-expiry";
const ROOT_KEY_HEADER: &str = "x-root-key";

/// Reply envelope of every call.
#[derive(Debug, Deserialize)]
enum CallReply<T> {
    Ok(T),
    Err(String),
}

impl<T> From<CallReply<T>> for ServiceResult<T> {
    fn from(reply: CallReply<T>) -> Self {
        match reply {
            CallReply::Ok(value) => Ok(value),
            CallReply::Err(reason) => Err(ServiceError::Rejected(reason)),
        }
    }
}

/// Typed proxy for one service, authenticated as one principal.
pub struct HttpTherapyActor {
    client: Client,
    call_base: Url,
    credential: Credential,
    ingress_expiry: Option<Duration>,
    /// Hex-encoded fetched root key.
    root_key: Option<String>,
}

impl HttpTherapyActor {
    fn from_channel(channel: &Channel) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(channel.settings())?,
            call_base: call_base_url(channel.host(), channel.service_id())?,
            credential: channel.credential().clone(),
            ingress_expiry: channel.settings().ingress_expiry,
            root_key: root_key_pin(channel.trust()),
        })
    }

    fn method_url(&self, method: &str) -> Result<Url, TransportError> {
        self.call_base
            .join(method)
            .map_err(|e| TransportError::misconfigured(format!("Invalid method URL: {e}")))
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, args: Value) -> ServiceResult<T> {
        let url = self.method_url(method)?;
        let request_id = Uuid::new_v4();
        tracing::debug!(
            "[HttpTherapyActor] {} as {} (request {})",
            method,
            self.credential.principal(),
            request_id
        );

        let mut request = self
            .client
            .post(url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(&args);
        if !self.credential.principal().is_anonymous() {
            request = request.bearer_auth(self.credential.token());
        }
        if let Some(expiry) = self.ingress_expiry {
            request = request.header(INGRESS_EXPIRY_HEADER, expiry.as_secs().to_string());
        }
        if let Some(root_key) = &self.root_key {
            request = request.header(ROOT_KEY_HEADER, root_key.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_reqwest_error(&format!("Call to {method} failed"), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_status(status, &body).into());
        }

        let reply: CallReply<T> = response
            .json()
            .await
            .map_err(|e| map_reqwest_error(&format!("Failed to parse {method} reply"), e))?;
        reply.into()
    }
}

#[async_trait]
impl TherapyService for HttpTherapyActor {
    async fn register_user(&self, username: &str) -> ServiceResult<UserProfile> {
        self.call("register_user", json!([username])).await
    }

    async fn get_user_profile(&self) -> ServiceResult<UserProfile> {
        self.call("get_user_profile", json!([])).await
    }

    async fn update_last_active(&self) -> ServiceResult<()> {
        self.call("update_last_active", json!([])).await
    }

    async fn get_user_sessions(&self) -> ServiceResult<Vec<TherapySession>> {
        self.call("get_user_sessions", json!([])).await
    }

    async fn generate_user_progress_report(&self) -> ServiceResult<ProgressReport> {
        self.call("generate_user_progress_report", json!([])).await
    }

    async fn start_therapy_session(
        &self,
        session_type: &str,
        stress_before: u8,
    ) -> ServiceResult<String> {
        self.call("start_therapy_session", json!([session_type, stress_before]))
            .await
    }

    async fn end_therapy_session(
        &self,
        request: &EndSessionRequest,
    ) -> ServiceResult<TherapySession> {
        self.call("end_therapy_session", end_session_args(request))
            .await
    }

    async fn get_cbt_reflection(&self, thought: &str) -> ServiceResult<String> {
        self.call("get_cbt_reflection", json!([thought])).await
    }

    async fn get_total_sessions(&self) -> ServiceResult<u64> {
        self.call("get_total_sessions", json!([])).await
    }

    async fn get_total_users(&self) -> ServiceResult<u64> {
        self.call("get_total_users", json!([])).await
    }
}

fn end_session_args(request: &EndSessionRequest) -> Value {
    json!([
        request.session_id,
        request.duration_minutes,
        request.stress_after,
        request.notes,
        request.pitch,
        request.tempo,
    ])
}

/// Header value pinning a fetched anchor. Pinned anchors are known to the
/// gateway already and unverified ones have nothing to pin.
fn root_key_pin(trust: &TrustAnchor) -> Option<String> {
    trust
        .root_key()
        .map(|key| key.iter().map(|b| format!("{b:02x}")).collect())
}

/// Base URL that method names are joined onto. Ends with a slash.
pub(crate) fn call_base_url(host: &str, service_id: &str) -> Result<Url, TransportError> {
    let host = Url::parse(host)
        .map_err(|e| TransportError::misconfigured(format!("Invalid host '{host}': {e}")))?;
    if !matches!(host.scheme(), "http" | "https") {
        return Err(TransportError::misconfigured(format!(
            "Unsupported host scheme '{}'",
            host.scheme()
        )));
    }
    if service_id.trim().is_empty() {
        return Err(TransportError::misconfigured("Service id is empty"));
    }

    let base = format!(
        "{}/api/v2/canister/{}/call/",
        host.as_str().trim_end_matches('/'),
        service_id.trim()
    );
    Url::parse(&base).map_err(|e| TransportError::misconfigured(format!("Invalid call URL: {e}")))
}

fn build_client(settings: &ChannelSettings) -> Result<Client, TransportError> {
    if let Some(expiry) = settings.ingress_expiry {
        if expiry.is_zero() || expiry > MAX_INGRESS_EXPIRY {
            return Err(TransportError::misconfigured(format!(
                "Ingress expiry of {}s is outside 1..={}s",
                expiry.as_secs(),
                MAX_INGRESS_EXPIRY.as_secs()
            )));
        }
    }

    let mut builder = Client::builder();
    if let Some(timeout) = settings.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| map_reqwest_error("Failed to build HTTP client", e))
}

/// Binds channels to [`HttpTherapyActor`]s.
#[derive(Debug, Default)]
pub struct HttpActorBinder;

impl HttpActorBinder {
    pub fn new() -> Self {
        Self
    }
}

impl ActorBinder for HttpActorBinder {
    fn bind(&self, channel: &Channel) -> Result<Arc<dyn TherapyService>, TransportError> {
        let actor = HttpTherapyActor::from_channel(channel)?;

        if !channel.trust().is_verified() {
            tracing::warn!(
                "[HttpTherapyActor] Binding {} over an unverified channel",
                channel.service_id()
            );
        }
        if channel.profile() == ChannelProfile::Minimal {
            tracing::debug!("[HttpTherapyActor] Using minimal channel settings");
        }

        Ok(Arc::new(actor))
    }
}
