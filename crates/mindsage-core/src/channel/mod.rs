//! Channel domain module.
//!
//! A channel is the configured transport binding used to reach the remote
//! service on behalf of one credential.
//!
//! # Module Structure
//!
//! - `model`: `Channel`, its trust anchor and optional settings
//! - `transport`: traits for the trust bootstrap fetch and actor binding

mod model;
mod transport;

// Re-export public API
pub use model::{Channel, ChannelProfile, ChannelSettings, TrustAnchor, TrustStatus};
pub use transport::{ActorBinder, ChannelTransport};
