//! Mapping of HTTP failures onto transport errors.

use mindsage_core::remote::{TransportError, TransportErrorCode};
use reqwest::StatusCode;

/// Maps a reqwest failure, attaching a structured code when the cause is known.
pub(crate) fn map_reqwest_error(context: &str, err: reqwest::Error) -> TransportError {
    let message = format!("{context}: {err}");
    if err.is_timeout() {
        TransportError::new(TransportErrorCode::Timeout, message)
    } else if err.is_connect() {
        TransportError::new(TransportErrorCode::Network, message)
    } else if err.is_decode() {
        TransportError::new(TransportErrorCode::Protocol, message)
    } else if err.is_builder() {
        TransportError::misconfigured(message)
    } else {
        TransportError::unclassified(message)
    }
}

/// Maps a non-success HTTP status.
///
/// Only gateway timeouts carry a code; other bodies are left for message
/// classification since replicas report verification failures as text.
pub(crate) fn map_http_status(status: StatusCode, body: &str) -> TransportError {
    let message = if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {}", body.trim())
    };
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            TransportError::new(TransportErrorCode::Timeout, message)
        }
        _ => TransportError::unclassified(message),
    }
}
