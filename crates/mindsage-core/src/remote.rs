//! Failure types reported by the remote side of a channel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured failure code attached by a transport when it knows the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorCode {
    CertificateVerification,
    SignatureVerification,
    Timeout,
    Network,
    Protocol,
    /// The channel could not be turned into a working client.
    Misconfigured,
}

/// Network or protocol failure raised while talking to the service.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct TransportError {
    pub code: Option<TransportErrorCode>,
    pub message: String,
}

impl TransportError {
    pub fn new(code: TransportErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// A failure whose cause is only known from its message.
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self::new(TransportErrorCode::Misconfigured, message)
    }
}

/// Failure of a single remote operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service answered with an explicit failure payload.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result of a single remote operation.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
