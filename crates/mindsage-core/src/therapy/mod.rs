//! Therapy domain module.
//!
//! # Module Structure
//!
//! - `model`: profiles, therapy sessions, voice analysis and progress reports
//! - `service`: the remote service contract (`TherapyService`)

mod model;
mod service;

// Re-export public API
pub use model::{EndSessionRequest, ProgressReport, TherapySession, UserProfile, VoiceAnalysis};
pub use service::TherapyService;
