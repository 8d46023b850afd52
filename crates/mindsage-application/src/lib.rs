//! Application layer for MindSage.
//!
//! This crate turns an identity credential into a bound remote actor and
//! exposes the therapy operations through [`SessionManager`], with every
//! outcome normalized into an [`OpResult`](mindsage_core::OpResult).

pub mod actor_factory;
pub mod channel_builder;
pub mod classify;
pub mod session;

pub use actor_factory::{ActorBinding, ActorFactory};
pub use channel_builder::ChannelBuilder;
pub use classify::{classify_service_error, classify_transport, normalize};
pub use session::{SessionManager, SessionPhase, SessionState};
