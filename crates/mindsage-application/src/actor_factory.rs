//! Remote actor binding with a single fallback.

use mindsage_core::channel::{ActorBinder, Channel, ChannelProfile};
use mindsage_core::remote::TransportError;
use mindsage_core::therapy::TherapyService;
use std::fmt;
use std::sync::Arc;

/// Outcome of binding a channel to the therapy service.
pub enum ActorBinding {
    /// Bound with the fully configured channel.
    Primary(Arc<dyn TherapyService>),
    /// Primary bind failed; bound with the minimal channel.
    Fallback(Arc<dyn TherapyService>),
    /// Both binds failed. No further retries until the next login cycle.
    Unavailable {
        primary: TransportError,
        fallback: TransportError,
    },
}

impl ActorBinding {
    pub fn actor(&self) -> Option<Arc<dyn TherapyService>> {
        match self {
            Self::Primary(actor) | Self::Fallback(actor) => Some(actor.clone()),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable { .. })
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Primary(_) => "primary",
            Self::Fallback(_) => "fallback",
            Self::Unavailable { .. } => "unavailable",
        }
    }
}

impl fmt::Debug for ActorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(_) => f.write_str("Primary"),
            Self::Fallback(_) => f.write_str("Fallback"),
            Self::Unavailable { primary, fallback } => f
                .debug_struct("Unavailable")
                .field("primary", primary)
                .field("fallback", fallback)
                .finish(),
        }
    }
}

/// Binds channels to typed actors.
///
/// The fallback path is not a plain repeat of the primary one: it binds the
/// channel's minimal counterpart (see [`Channel::to_minimal`]), which drops
/// the optional transport settings most likely to be misconfigured.
pub struct ActorFactory {
    binder: Arc<dyn ActorBinder>,
}

impl ActorFactory {
    pub fn new(binder: Arc<dyn ActorBinder>) -> Self {
        Self { binder }
    }

    pub fn bind(&self, channel: &Channel) -> ActorBinding {
        let primary = match self.binder.bind(channel) {
            Ok(actor) => {
                tracing::info!(
                    "[ActorFactory] Bound actor for {}",
                    channel.credential().principal()
                );
                return ActorBinding::Primary(actor);
            }
            Err(e) => e,
        };

        tracing::warn!(
            "[ActorFactory] Primary bind failed: {}. Attempting fallback with a minimal channel",
            primary
        );

        let minimal = match channel.profile() {
            ChannelProfile::Full => channel.to_minimal(),
            ChannelProfile::Minimal => channel.clone(),
        };

        match self.binder.bind(&minimal) {
            Ok(actor) => {
                tracing::info!("[ActorFactory] Fallback actor bound");
                ActorBinding::Fallback(actor)
            }
            Err(fallback) => {
                tracing::error!(
                    "[ActorFactory] Fallback bind also failed: {}. Domain calls will report the actor as unavailable",
                    fallback
                );
                ActorBinding::Unavailable { primary, fallback }
            }
        }
    }
}
