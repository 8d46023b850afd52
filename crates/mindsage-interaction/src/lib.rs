//! HTTP bindings for the MindSage remote service.
//!
//! Implements the channel and actor seams from `mindsage-core` over an
//! HTTP/JSON gateway using `reqwest`.

mod http_error;

pub mod http_actor;
pub mod http_transport;

pub use http_actor::{HttpActorBinder, HttpTherapyActor};
pub use http_transport::HttpChannelTransport;
