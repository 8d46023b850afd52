//! Remote therapy service contract.

use super::model::{EndSessionRequest, ProgressReport, TherapySession, UserProfile};
use crate::remote::ServiceResult;
use async_trait::async_trait;

/// Typed proxy for the remote therapy service ("actor").
///
/// Every call either returns the payload, an explicit rejection from the
/// service, or a transport failure. The caller identity is carried by the
/// channel the actor was bound to.
#[async_trait]
pub trait TherapyService: Send + Sync {
    async fn register_user(&self, username: &str) -> ServiceResult<UserProfile>;

    async fn get_user_profile(&self) -> ServiceResult<UserProfile>;

    async fn update_last_active(&self) -> ServiceResult<()>;

    /// Sessions in insertion order.
    async fn get_user_sessions(&self) -> ServiceResult<Vec<TherapySession>>;

    async fn generate_user_progress_report(&self) -> ServiceResult<ProgressReport>;

    /// Allocates a session id; the session itself is created by `end_therapy_session`.
    async fn start_therapy_session(
        &self,
        session_type: &str,
        stress_before: u8,
    ) -> ServiceResult<String>;

    async fn end_therapy_session(&self, request: &EndSessionRequest)
    -> ServiceResult<TherapySession>;

    async fn get_cbt_reflection(&self, thought: &str) -> ServiceResult<String>;

    async fn get_total_sessions(&self) -> ServiceResult<u64>;

    async fn get_total_users(&self) -> ServiceResult<u64>;
}
