//! Transport seams used while building a channel and binding an actor.

use super::model::Channel;
use crate::remote::TransportError;
use crate::therapy::TherapyService;
use async_trait::async_trait;
use std::sync::Arc;

/// Fetches the root-of-trust artifact from a non-production endpoint.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    async fn fetch_root_key(&self, host: &str) -> Result<Vec<u8>, TransportError>;
}

/// Binds a channel to the therapy service's typed interface.
pub trait ActorBinder: Send + Sync {
    fn bind(&self, channel: &Channel) -> Result<Arc<dyn TherapyService>, TransportError>;
}
