//! Classification of remote outcomes into the session error taxonomy.
//!
//! Structured transport codes are trusted first. Message patterns are only a
//! fallback for transports that cannot report a code.

use mindsage_core::error::MindsageError;
use mindsage_core::remote::{ServiceError, ServiceResult, TransportError, TransportErrorCode};
use mindsage_core::OpResult;
use once_cell::sync::Lazy;
use regex::Regex;

static VERIFICATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)certificate verification failed|signature could not be verified|invalid (?:certificate|signature)|root key (?:mismatch|not (?:found|trusted))",
    )
    .expect("verification pattern is valid")
});

static TIMEOUT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\btim(?:ed|e)[ -]?out\b|deadline (?:exceeded|expired)")
        .expect("timeout pattern is valid")
});

/// Maps a transport failure to a user-facing error for `operation`.
pub fn classify_transport(operation: &str, err: &TransportError) -> MindsageError {
    match err.code {
        Some(TransportErrorCode::CertificateVerification)
        | Some(TransportErrorCode::SignatureVerification) => {
            MindsageError::verification(err.message.clone())
        }
        Some(TransportErrorCode::Timeout) => MindsageError::timeout(operation),
        Some(_) => transport_failure(operation, err),
        None if VERIFICATION_PATTERN.is_match(&err.message) => {
            MindsageError::verification(err.message.clone())
        }
        None if TIMEOUT_PATTERN.is_match(&err.message) => MindsageError::timeout(operation),
        None => transport_failure(operation, err),
    }
}

fn transport_failure(operation: &str, err: &TransportError) -> MindsageError {
    if err.message.trim().is_empty() {
        MindsageError::transport(format!("{} failed", operation))
    } else {
        MindsageError::transport(err.message.clone())
    }
}

/// Maps any remote failure to a user-facing error for `operation`.
pub fn classify_service_error(operation: &str, err: &ServiceError) -> MindsageError {
    match err {
        ServiceError::Rejected(reason) => MindsageError::rejected(reason.clone()),
        ServiceError::Transport(transport) => classify_transport(operation, transport),
    }
}

/// Wraps a remote outcome into the normalized envelope, logging failures.
pub fn normalize<T>(operation: &str, outcome: ServiceResult<T>) -> OpResult<T> {
    match outcome {
        Ok(data) => OpResult::ok(data),
        Err(e) => {
            let error = classify_service_error(operation, &e);
            match &e {
                ServiceError::Rejected(reason) => {
                    tracing::info!("[SessionManager] {} rejected: {}", operation, reason)
                }
                ServiceError::Transport(transport) if error.is_remote() => tracing::error!(
                    "[SessionManager] {} failed ({:?}): {}",
                    operation,
                    error.kind(),
                    transport
                ),
                ServiceError::Transport(transport) => tracing::warn!(
                    "[SessionManager] {} abandoned ({:?}): {}",
                    operation,
                    error.kind(),
                    transport
                ),
            }
            OpResult::fail(&error)
        }
    }
}
