//! Error types for the MindSage client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when the service identity could not be verified.
pub const VERIFICATION_FAILURE_MESSAGE: &str = "Could not verify the service's identity. \
     If you are using a development endpoint, make sure it is running and try signing in again.";

/// Coarse classification of a [`MindsageError`].
///
/// Serialized alongside failed results so a presentation layer can branch on
/// the kind without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotAuthenticated,
    ChannelUnverified,
    ActorUnavailable,
    RemoteRejected,
    TransportFailure,
    VerificationFailure,
    Timeout,
    InvalidInput,
    Config,
    Io,
    Serialization,
    Internal,
}

/// A shared error type for the entire MindSage client.
///
/// The first group of variants is the session taxonomy surfaced to callers;
/// the rest covers configuration and storage concerns.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MindsageError {
    /// No credential, or no actor has ever been bound for this session
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Trust bootstrap exhausted its attempts; the channel runs unverified
    #[error("Channel trust could not be verified: {0}")]
    ChannelUnverified(String),

    /// Primary and fallback actor binding both failed
    #[error("Service connection unavailable. Please sign in again.")]
    ActorUnavailable,

    /// The remote service answered with an explicit failure payload
    #[error("{0}")]
    RemoteRejected(String),

    /// Network or protocol failure while talking to the service
    #[error("{0}")]
    TransportFailure(String),

    /// Signature or certificate mismatch reported by the transport
    #[error("{}", VERIFICATION_FAILURE_MESSAGE)]
    VerificationFailure { detail: String },

    /// Client-side deadline expired; the remote side may still complete
    #[error("{operation} timed out. The service may still finish the request, please check again shortly.")]
    Timeout { operation: String },

    /// Input rejected locally before any remote call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MindsageError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a RemoteRejected error
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::RemoteRejected(reason.into())
    }

    /// Creates a TransportFailure error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportFailure(message.into())
    }

    /// Creates a VerificationFailure error
    pub fn verification(detail: impl Into<String>) -> Self {
        Self::VerificationFailure {
            detail: detail.into(),
        }
    }

    /// Creates a Timeout error for the named operation
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthenticated => ErrorKind::NotAuthenticated,
            Self::ChannelUnverified(_) => ErrorKind::ChannelUnverified,
            Self::ActorUnavailable => ErrorKind::ActorUnavailable,
            Self::RemoteRejected(_) => ErrorKind::RemoteRejected,
            Self::TransportFailure(_) => ErrorKind::TransportFailure,
            Self::VerificationFailure { .. } => ErrorKind::VerificationFailure,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Config(_) => ErrorKind::Config,
            Self::Io { .. } => ErrorKind::Io,
            Self::Serialization { .. } => ErrorKind::Serialization,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Check if this is a NotAuthenticated error
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }

    /// Check if this is a Timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if this error came back from the remote service rather than
    /// being produced locally.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::RemoteRejected(_) | Self::TransportFailure(_) | Self::VerificationFailure { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MindsageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MindsageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MindsageError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MindsageError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for MindsageError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<String> for MindsageError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, MindsageError>`.
pub type Result<T> = std::result::Result<T, MindsageError>;
