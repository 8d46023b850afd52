//! Therapy domain models.
//!
//! Field names on the wire follow the remote interface (`user_principal`,
//! `stress_level_before`, ...); Rust names follow the session vocabulary.
//! Timestamps are nanoseconds since the Unix epoch.

use crate::identity::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn nanos_to_utc(nanos: u64) -> Option<DateTime<Utc>> {
    i64::try_from(nanos).ok().map(DateTime::from_timestamp_nanos)
}

/// Registered user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub principal: Principal,
    pub username: String,
    pub created_at: u64,
    #[serde(rename = "last_active")]
    pub last_active_at: u64,
    pub session_count: u32,
    pub total_sessions: u32,
}

impl UserProfile {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        nanos_to_utc(self.created_at)
    }

    pub fn last_active_at_utc(&self) -> Option<DateTime<Utc>> {
        nanos_to_utc(self.last_active_at)
    }
}

/// Voice metrics captured during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceAnalysis {
    pub pitch: f32,
    pub tempo: f32,
    pub emotion: String,
    pub stress_indicators: Vec<String>,
}

/// A completed therapy session. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapySession {
    pub id: String,
    #[serde(rename = "user_principal")]
    pub principal: Principal,
    pub session_type: String,
    pub timestamp: u64,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    #[serde(rename = "stress_level_before")]
    pub stress_before: u8,
    #[serde(rename = "stress_level_after")]
    pub stress_after: u8,
    pub notes: String,
    #[serde(rename = "voice_analysis")]
    pub voice_metrics: VoiceAnalysis,
}

impl TherapySession {
    /// Positive when stress went down over the session.
    pub fn stress_reduction(&self) -> i16 {
        i16::from(self.stress_before) - i16::from(self.stress_after)
    }

    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        nanos_to_utc(self.timestamp)
    }
}

/// Arguments of the "end session" call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndSessionRequest {
    pub session_id: String,
    pub duration_minutes: u32,
    pub stress_after: u8,
    pub notes: String,
    pub pitch: f32,
    pub tempo: f32,
}

/// Aggregated progress over all of a user's sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    #[serde(rename = "user_principal")]
    pub principal: Principal,
    pub total_sessions: u32,
    pub avg_stress_reduction: f32,
    pub trend: String,
    pub recommendations: Vec<String>,
    pub generated_at: u64,
}

impl ProgressReport {
    pub fn generated_at_utc(&self) -> Option<DateTime<Utc>> {
        nanos_to_utc(self.generated_at)
    }
}
