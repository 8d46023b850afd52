use super::state::{SessionPhase, SessionState};
use crate::actor_factory::ActorFactory;
use crate::channel_builder::ChannelBuilder;
use crate::classify::normalize;
use mindsage_core::OpResult;
use mindsage_core::channel::{ActorBinder, ChannelTransport, TrustStatus};
use mindsage_core::config::SessionConfig;
use mindsage_core::error::{MindsageError, Result};
use mindsage_core::identity::{
    Credential, IdentityClient, IdentityClientFactory, LoginOutcome, Principal,
};
use mindsage_core::remote::ServiceResult;
use mindsage_core::therapy::{
    EndSessionRequest, ProgressReport, TherapyService, TherapySession, UserProfile,
};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

struct SessionInner {
    phase: SessionPhase,
    state: SessionState,
    /// Rebuilt on every successful init; never mutated in place.
    actor: Option<Arc<dyn TherapyService>>,
}

/// Owns the authentication state machine and the bound remote actor.
///
/// `SessionManager` is responsible for:
/// - Turning a persisted credential into a channel and a bound actor
/// - Driving login and logout through the identity client
/// - Exposing the therapy operations, each returning a normalized [`OpResult`]
///
/// # Concurrency
///
/// Domain operations may run concurrently once an actor is bound. Lifecycle
/// transitions (`initialize`, `login`, `logout`) are not serialized against
/// each other; callers must keep at most one of them in flight.
pub struct SessionManager {
    config: SessionConfig,
    identity_factory: Arc<dyn IdentityClientFactory>,
    identity_client: RwLock<Option<Arc<dyn IdentityClient>>>,
    channel_builder: ChannelBuilder,
    actor_factory: ActorFactory,
    inner: RwLock<SessionInner>,
}

impl SessionManager {
    /// Creates a new `SessionManager`.
    ///
    /// Nothing is contacted until [`initialize`](Self::initialize) runs.
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint, login and timeout settings
    /// * `identity_factory` - Creates the identity client on first use
    /// * `transport` - Performs the trust bootstrap fetch
    /// * `binder` - Binds channels to the therapy service
    pub fn new(
        config: SessionConfig,
        identity_factory: Arc<dyn IdentityClientFactory>,
        transport: Arc<dyn ChannelTransport>,
        binder: Arc<dyn ActorBinder>,
    ) -> Self {
        Self {
            channel_builder: ChannelBuilder::new(config.clone(), transport),
            actor_factory: ActorFactory::new(binder),
            config,
            identity_factory,
            identity_client: RwLock::new(None),
            inner: RwLock::new(SessionInner {
                phase: SessionPhase::Uninitialized,
                state: SessionState::default(),
                actor: None,
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ============================================================================
    // State accessors
    // ============================================================================

    pub async fn phase(&self) -> SessionPhase {
        self.inner.read().await.phase
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.read().await.state.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.state.authenticated
    }

    pub async fn user_profile(&self) -> Option<UserProfile> {
        self.inner.read().await.state.user_profile.clone()
    }

    pub async fn loading(&self) -> bool {
        self.inner.read().await.state.loading
    }

    pub async fn principal(&self) -> Option<Principal> {
        self.inner.read().await.state.principal_id.clone()
    }

    pub async fn credential(&self) -> Option<Credential> {
        self.inner.read().await.state.credential.clone()
    }

    pub async fn channel_trust(&self) -> Option<TrustStatus> {
        self.inner.read().await.state.channel_trust
    }

    pub async fn has_actor(&self) -> bool {
        self.inner.read().await.actor.is_some()
    }

    // ============================================================================
    // Lifecycle transitions
    // ============================================================================

    /// Restores a persisted session, if any.
    ///
    /// Settles in `Unauthenticated` when there is no credential. Otherwise
    /// builds a fresh channel, binds an actor and tries to fetch the profile;
    /// a missing profile is not an error and settles in
    /// `AuthenticatedNoProfile`. Safe to call repeatedly.
    pub async fn initialize(&self) -> SessionPhase {
        self.begin_transition(SessionPhase::Initializing).await;
        let phase = self.run_initialize().await;
        self.finish_transition(phase).await;
        tracing::info!("[SessionManager] Initialization settled in {:?}", phase);
        phase
    }

    async fn run_initialize(&self) -> SessionPhase {
        let Some(client) = self.ensure_identity_client().await else {
            self.clear_session().await;
            return SessionPhase::Unauthenticated;
        };

        if !client.is_authenticated().await {
            tracing::debug!("[SessionManager] No persisted credential");
            self.clear_session().await;
            return SessionPhase::Unauthenticated;
        }

        let Some(credential) = client.identity().await else {
            tracing::warn!("[SessionManager] Identity client reported authenticated without a credential");
            self.clear_session().await;
            return SessionPhase::Unauthenticated;
        };
        let principal = credential.principal().clone();
        tracing::info!("[SessionManager] Restoring session for {}", principal);

        let channel = self.channel_builder.build(credential.clone()).await;
        let trust = channel.trust().status();
        let binding = self.actor_factory.bind(&channel);
        if !binding.is_available() {
            tracing::warn!(
                "[SessionManager] Signed in as {} without a service connection",
                principal
            );
        }
        let actor = binding.actor();

        {
            let mut inner = self.inner.write().await;
            inner.state = SessionState {
                authenticated: true,
                credential: Some(credential),
                principal_id: Some(principal.clone()),
                channel_ready: true,
                channel_trust: Some(trust),
                user_profile: None,
                loading: true,
            };
            inner.actor = actor.clone();
        }

        let Some(actor) = actor else {
            return SessionPhase::AuthenticatedNoProfile;
        };

        match actor.get_user_profile().await {
            Ok(profile) => {
                self.inner.write().await.state.user_profile = Some(profile);
                SessionPhase::AuthenticatedWithProfile
            }
            Err(e) => {
                tracing::debug!("[SessionManager] User not registered yet: {}", e);
                SessionPhase::AuthenticatedNoProfile
            }
        }
    }

    /// Runs the interactive login and, on success, the full initialization.
    ///
    /// Returns `false` on cancellation or provider error. A session that was
    /// not authenticated settles in `Unauthenticated` with no partial state;
    /// an authenticated one is left as it was.
    pub async fn login(&self) -> bool {
        let Some(client) = self.ensure_identity_client().await else {
            self.finish_transition(SessionPhase::Unauthenticated).await;
            return false;
        };

        let prior_phase = self.phase().await;
        self.set_loading(true).await;
        let outcome = client.login(&self.config.login_options()).await;

        match outcome {
            LoginOutcome::LoggedIn => {
                tracing::info!("[SessionManager] Login succeeded, re-initializing");
                return self.initialize().await.is_authenticated();
            }
            LoginOutcome::Cancelled => tracing::info!("[SessionManager] Login cancelled"),
            LoginOutcome::Failed(reason) => {
                tracing::warn!("[SessionManager] Login failed: {}", reason)
            }
        }

        if prior_phase.is_authenticated() {
            self.finish_transition(prior_phase).await;
        } else {
            self.clear_session().await;
            self.finish_transition(SessionPhase::Unauthenticated).await;
        }
        false
    }

    /// Ends the session.
    ///
    /// Local state is cleared even when the provider-side logout fails.
    pub async fn logout(&self) {
        self.begin_transition(SessionPhase::LoggingOut).await;

        let client = self.identity_client.read().await.clone();
        if let Some(client) = client {
            if let Err(e) = client.logout().await {
                tracing::warn!(
                    "[SessionManager] Provider logout failed, clearing local session anyway: {}",
                    e
                );
            }
        }

        self.clear_session().await;
        self.finish_transition(SessionPhase::Unauthenticated).await;
        tracing::info!("[SessionManager] Logged out");
    }

    async fn ensure_identity_client(&self) -> Option<Arc<dyn IdentityClient>> {
        if let Some(client) = self.identity_client.read().await.as_ref() {
            return Some(client.clone());
        }

        match self
            .identity_factory
            .create(&self.config.client_options())
            .await
        {
            Ok(client) => {
                *self.identity_client.write().await = Some(client.clone());
                Some(client)
            }
            Err(e) => {
                tracing::error!("[SessionManager] Failed to create identity client: {}", e);
                None
            }
        }
    }

    async fn begin_transition(&self, phase: SessionPhase) {
        let mut inner = self.inner.write().await;
        inner.phase = phase;
        inner.state.loading = true;
    }

    async fn finish_transition(&self, phase: SessionPhase) {
        let mut inner = self.inner.write().await;
        inner.phase = phase;
        inner.state.loading = false;
    }

    async fn set_loading(&self, loading: bool) {
        self.inner.write().await.state.loading = loading;
    }

    async fn clear_session(&self) {
        let mut inner = self.inner.write().await;
        inner.state.clear_identity();
        inner.actor = None;
    }

    // ============================================================================
    // Domain operations
    // ============================================================================

    /// Returns the bound actor or the reason there is none.
    async fn bound_actor(&self) -> Result<Arc<dyn TherapyService>> {
        let inner = self.inner.read().await;
        match &inner.actor {
            Some(actor) => Ok(actor.clone()),
            None if inner.state.authenticated => Err(MindsageError::ActorUnavailable),
            None => Err(MindsageError::NotAuthenticated),
        }
    }

    async fn call<T, F, Fut>(&self, operation: &str, f: F) -> OpResult<T>
    where
        F: FnOnce(Arc<dyn TherapyService>) -> Fut,
        Fut: Future<Output = ServiceResult<T>>,
    {
        match self.bound_actor().await {
            Ok(actor) => normalize(operation, f(actor).await),
            Err(e) => {
                if e.is_not_authenticated() {
                    tracing::debug!("[SessionManager] {} refused: {}", operation, e);
                } else {
                    tracing::warn!("[SessionManager] {} refused: {}", operation, e);
                }
                OpResult::fail(&e)
            }
        }
    }

    /// Stores a profile returned for the current session.
    async fn store_profile(&self, profile: UserProfile) {
        let mut inner = self.inner.write().await;
        if !inner.state.authenticated {
            tracing::debug!("[SessionManager] Dropping profile for a session that has ended");
            return;
        }
        inner.state.user_profile = Some(profile);
        if !inner.phase.is_transitioning() {
            inner.phase = SessionPhase::AuthenticatedWithProfile;
        }
    }

    /// Registers the current principal under `username`.
    ///
    /// Blank names are rejected locally. The remote call races a deadline;
    /// on expiry the call is abandoned client-side and reported as a timeout,
    /// although the service may still complete it.
    pub async fn register_user(&self, username: &str) -> OpResult<UserProfile> {
        const OPERATION: &str = "Registration";

        let actor = match self.bound_actor().await {
            Ok(actor) => actor,
            Err(e) => return OpResult::fail(&e),
        };

        let username = username.trim();
        if username.is_empty() {
            return OpResult::fail(&MindsageError::invalid_input("Username must not be empty"));
        }

        let deadline = self.config.registration_timeout();
        let outcome = match tokio::time::timeout(deadline, actor.register_user(username)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(
                    "[SessionManager] Registration abandoned after {:?}",
                    deadline
                );
                return OpResult::fail(&MindsageError::timeout(OPERATION));
            }
        };

        let result = normalize(OPERATION, outcome);
        if let Some(profile) = result.data() {
            tracing::info!("[SessionManager] Registered user {}", profile.username);
            self.store_profile(profile.clone()).await;
        }
        result
    }

    /// Re-queries the profile of the current principal and stores it.
    pub async fn refresh_profile(&self) -> OpResult<UserProfile> {
        let result = self
            .call("Profile refresh", |actor| async move {
                actor.get_user_profile().await
            })
            .await;
        if let Some(profile) = result.data() {
            self.store_profile(profile.clone()).await;
        }
        result
    }

    pub async fn update_last_active(&self) -> OpResult<()> {
        self.call("Update last active", |actor| async move {
            actor.update_last_active().await
        })
        .await
    }

    /// Lists the user's sessions in insertion order.
    pub async fn get_user_sessions(&self) -> OpResult<Vec<TherapySession>> {
        self.call("Get sessions", |actor| async move {
            actor.get_user_sessions().await
        })
        .await
    }

    pub async fn generate_progress_report(&self) -> OpResult<ProgressReport> {
        self.call("Generate progress report", |actor| async move {
            actor.generate_user_progress_report().await
        })
        .await
    }

    /// Allocates a session id for a new therapy session.
    pub async fn start_therapy_session(
        &self,
        session_type: &str,
        stress_before: u8,
    ) -> OpResult<String> {
        let session_type = session_type.to_string();
        self.call("Start therapy session", |actor| async move {
            actor
                .start_therapy_session(&session_type, stress_before)
                .await
        })
        .await
    }

    /// Completes a therapy session.
    ///
    /// On success the profile is refreshed exactly once; a failed refresh is
    /// logged and does not affect the returned result.
    pub async fn end_therapy_session(&self, request: EndSessionRequest) -> OpResult<TherapySession> {
        const OPERATION: &str = "End therapy session";

        let actor = match self.bound_actor().await {
            Ok(actor) => actor,
            Err(e) => return OpResult::fail(&e),
        };

        let result = normalize(OPERATION, actor.end_therapy_session(&request).await);
        if result.is_success() {
            match actor.get_user_profile().await {
                Ok(profile) => self.store_profile(profile).await,
                Err(e) => tracing::warn!(
                    "[SessionManager] Could not refresh profile after session {}: {}",
                    request.session_id,
                    e
                ),
            }
        }
        result
    }

    pub async fn get_cbt_reflection(&self, thought: &str) -> OpResult<String> {
        let thought = thought.to_string();
        self.call("Get CBT reflection", |actor| async move {
            actor.get_cbt_reflection(&thought).await
        })
        .await
    }

    pub async fn get_total_sessions(&self) -> OpResult<u64> {
        self.call("Get total sessions", |actor| async move {
            actor.get_total_sessions().await
        })
        .await
    }

    pub async fn get_total_users(&self) -> OpResult<u64> {
        self.call("Get total users", |actor| async move {
            actor.get_total_users().await
        })
        .await
    }
}
