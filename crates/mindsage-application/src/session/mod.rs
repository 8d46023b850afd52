//! Session lifecycle services.
//!
//! # Module Structure
//!
//! - `state`: `SessionState` and the lifecycle `SessionPhase`
//! - `manager`: the `SessionManager` state machine and domain operations

mod manager;
mod state;

pub use manager::SessionManager;
pub use state::{SessionPhase, SessionState};
