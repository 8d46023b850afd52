//! Domain layer for the MindSage session client.
//!
//! Holds the models, the error taxonomy and the traits that the
//! infrastructure, interaction and application crates plug into.

pub mod channel;
pub mod config;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod remote;
pub mod therapy;

// Re-export common types
pub use envelope::OpResult;
pub use error::{ErrorKind, MindsageError, Result};
