//! Identity domain module.
//!
//! # Module Structure
//!
//! - `model`: principal and credential types
//! - `client`: the identity client contract consumed by the session layer
//!
//! # Usage
//!
//! ```ignore
//! use mindsage_core::identity::{Credential, IdentityClient, LoginOutcome};
//! ```

mod client;
mod model;

// Re-export public API
pub use client::{IdentityClient, IdentityClientFactory, LoginOutcome};
pub use model::{ANONYMOUS_PRINCIPAL, Credential, Principal};
