//! In-memory doubles for the session manager seams.

#![allow(dead_code)]

use async_trait::async_trait;
use mindsage_application::SessionManager;
use mindsage_core::channel::{
    ActorBinder, Channel, ChannelProfile, ChannelSettings, ChannelTransport,
};
use mindsage_core::config::{ClientOptions, LoginOptions, SessionConfig};
use mindsage_core::error::{MindsageError, Result};
use mindsage_core::identity::{
    Credential, IdentityClient, IdentityClientFactory, LoginOutcome, Principal,
};
use mindsage_core::remote::{ServiceError, ServiceResult, TransportError, TransportErrorCode};
use mindsage_core::therapy::{
    EndSessionRequest, ProgressReport, TherapyService, TherapySession, UserProfile, VoiceAnalysis,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ALICE: &str = "2ibo7-dia";

pub fn alice() -> Credential {
    Credential::new(Principal::new(ALICE), "alice-delegation", None)
}

// ============================================================================
// Identity
// ============================================================================

pub struct MockIdentityClient {
    credential: Mutex<Option<Credential>>,
    login_credential: Credential,
    login_outcome: Mutex<LoginOutcome>,
    logout_fails: AtomicBool,
    pub login_calls: Mutex<Vec<LoginOptions>>,
    pub logout_calls: AtomicUsize,
}

impl MockIdentityClient {
    /// Client without a persisted credential; logging in yields `alice`.
    pub fn signed_out() -> Self {
        Self {
            credential: Mutex::new(None),
            login_credential: alice(),
            login_outcome: Mutex::new(LoginOutcome::LoggedIn),
            logout_fails: AtomicBool::new(false),
            login_calls: Mutex::new(Vec::new()),
            logout_calls: AtomicUsize::new(0),
        }
    }

    /// Client with a persisted `alice` credential.
    pub fn signed_in() -> Self {
        let client = Self::signed_out();
        *client.credential.lock().unwrap() = Some(alice());
        client
    }

    pub fn set_login_outcome(&self, outcome: LoginOutcome) {
        *self.login_outcome.lock().unwrap() = outcome;
    }

    pub fn set_logout_fails(&self, fails: bool) {
        self.logout_fails.store(fails, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityClient for MockIdentityClient {
    async fn is_authenticated(&self) -> bool {
        self.credential.lock().unwrap().is_some()
    }

    async fn identity(&self) -> Option<Credential> {
        self.credential.lock().unwrap().clone()
    }

    async fn login(&self, options: &LoginOptions) -> LoginOutcome {
        self.login_calls.lock().unwrap().push(options.clone());
        let outcome = self.login_outcome.lock().unwrap().clone();
        if outcome.is_logged_in() {
            *self.credential.lock().unwrap() = Some(self.login_credential.clone());
        }
        outcome
    }

    async fn logout(&self) -> Result<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.logout_fails.load(Ordering::SeqCst) {
            return Err(MindsageError::transport("identity provider unreachable"));
        }
        *self.credential.lock().unwrap() = None;
        Ok(())
    }
}

/// Hands out one shared client, optionally failing the first creations.
pub struct MockIdentityFactory {
    client: Arc<MockIdentityClient>,
    failures_left: AtomicUsize,
    pub create_calls: Mutex<Vec<ClientOptions>>,
}

impl MockIdentityFactory {
    pub fn new(client: Arc<MockIdentityClient>) -> Self {
        Self {
            client,
            failures_left: AtomicUsize::new(0),
            create_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_first(client: Arc<MockIdentityClient>, failures: usize) -> Self {
        let factory = Self::new(client);
        factory.failures_left.store(failures, Ordering::SeqCst);
        factory
    }
}

#[async_trait]
impl IdentityClientFactory for MockIdentityFactory {
    async fn create(&self, options: &ClientOptions) -> Result<Arc<dyn IdentityClient>> {
        self.create_calls.lock().unwrap().push(options.clone());
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(MindsageError::internal("identity storage unavailable"));
        }
        Ok(self.client.clone())
    }
}

// ============================================================================
// Channel
// ============================================================================

/// Fails the first `failures` root key fetches.
pub struct MockTransport {
    failures: usize,
    pub fetches: AtomicUsize,
}

impl MockTransport {
    pub fn reliable() -> Self {
        Self::failing(0)
    }

    pub fn unreachable() -> Self {
        Self::failing(usize::MAX)
    }

    pub fn failing(failures: usize) -> Self {
        Self {
            failures,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelTransport for MockTransport {
    async fn fetch_root_key(&self, _host: &str) -> std::result::Result<Vec<u8>, TransportError> {
        let attempt = self.fetches.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            Err(TransportError::new(
                TransportErrorCode::Network,
                "connection refused",
            ))
        } else {
            Ok(vec![0x30, 0x81])
        }
    }
}

/// Channel seen by the binder, minus the credential token.
#[derive(Debug, Clone, PartialEq)]
pub struct BindRecord {
    pub principal: Principal,
    pub host: String,
    pub profile: ChannelProfile,
    pub settings: ChannelSettings,
}

pub struct MockBinder {
    backend: Arc<InMemoryBackend>,
    fail_full: bool,
    fail_minimal: bool,
    pub binds: Mutex<Vec<BindRecord>>,
}

impl MockBinder {
    pub fn new(backend: Arc<InMemoryBackend>) -> Self {
        Self::scripted(backend, false, false)
    }

    pub fn scripted(backend: Arc<InMemoryBackend>, fail_full: bool, fail_minimal: bool) -> Self {
        Self {
            backend,
            fail_full,
            fail_minimal,
            binds: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<BindRecord> {
        self.binds.lock().unwrap().clone()
    }
}

impl ActorBinder for MockBinder {
    fn bind(&self, channel: &Channel) -> std::result::Result<Arc<dyn TherapyService>, TransportError> {
        self.binds.lock().unwrap().push(BindRecord {
            principal: channel.credential().principal().clone(),
            host: channel.host().to_string(),
            profile: channel.profile(),
            settings: channel.settings().clone(),
        });
        let fail = match channel.profile() {
            ChannelProfile::Full => self.fail_full,
            ChannelProfile::Minimal => self.fail_minimal,
        };
        if fail {
            return Err(TransportError::misconfigured("invalid ingress expiry"));
        }
        Ok(Arc::new(BackendActor {
            backend: self.backend.clone(),
            caller: channel.credential().principal().clone(),
        }))
    }
}

// ============================================================================
// Therapy service
// ============================================================================

#[derive(Default)]
struct BackendState {
    users: HashMap<Principal, UserProfile>,
    sessions: Vec<TherapySession>,
    started: HashMap<String, (String, u8)>,
    next_session: u64,
    clock: u64,
}

/// Shared in-memory therapy service with per-method call counters.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
    calls: Mutex<HashMap<&'static str, usize>>,
    register_delay: Mutex<Option<Duration>>,
    profile_reads_fail: AtomicBool,
    transport_error: Mutex<Option<TransportError>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn set_register_delay(&self, delay: Duration) {
        *self.register_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_profile_reads_fail(&self, fail: bool) {
        self.profile_reads_fail.store(fail, Ordering::SeqCst);
    }

    /// Makes every call fail at the transport level.
    pub fn set_transport_error(&self, error: TransportError) {
        *self.transport_error.lock().unwrap() = Some(error);
    }

    pub fn seed_user(&self, principal: Principal, username: &str) {
        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let now = state.clock;
        state.users.insert(
            principal.clone(),
            UserProfile {
                principal,
                username: username.to_string(),
                created_at: now,
                last_active_at: now,
                session_count: 0,
                total_sessions: 0,
            },
        );
    }

    fn enter(&self, method: &'static str) -> ServiceResult<()> {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;
        match self.transport_error.lock().unwrap().clone() {
            Some(error) => Err(ServiceError::Transport(error)),
            None => Ok(()),
        }
    }
}

fn not_found() -> ServiceError {
    ServiceError::Rejected("User not found".to_string())
}

fn emotion(pitch: f32, tempo: f32) -> &'static str {
    if pitch > 250.0 && tempo > 180.0 {
        "High stress"
    } else if pitch < 180.0 && tempo < 100.0 {
        "Possible depression"
    } else {
        "Neutral"
    }
}

struct BackendActor {
    backend: Arc<InMemoryBackend>,
    caller: Principal,
}

#[async_trait]
impl TherapyService for BackendActor {
    async fn register_user(&self, username: &str) -> ServiceResult<UserProfile> {
        self.backend.enter("register_user")?;
        let delay = *self.backend.register_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.backend.state.lock().unwrap();
        if state.users.contains_key(&self.caller) {
            return Err(ServiceError::Rejected("User already registered".to_string()));
        }
        state.clock += 1;
        let profile = UserProfile {
            principal: self.caller.clone(),
            username: username.to_string(),
            created_at: state.clock,
            last_active_at: state.clock,
            session_count: 0,
            total_sessions: 0,
        };
        state.users.insert(self.caller.clone(), profile.clone());
        Ok(profile)
    }

    async fn get_user_profile(&self) -> ServiceResult<UserProfile> {
        self.backend.enter("get_user_profile")?;
        if self.backend.profile_reads_fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport(TransportError::new(
                TransportErrorCode::Network,
                "connection reset by peer",
            )));
        }
        let state = self.backend.state.lock().unwrap();
        state.users.get(&self.caller).cloned().ok_or_else(not_found)
    }

    async fn update_last_active(&self) -> ServiceResult<()> {
        self.backend.enter("update_last_active")?;
        let mut state = self.backend.state.lock().unwrap();
        state.clock += 1;
        let now = state.clock;
        let profile = state.users.get_mut(&self.caller).ok_or_else(not_found)?;
        profile.last_active_at = now;
        Ok(())
    }

    async fn get_user_sessions(&self) -> ServiceResult<Vec<TherapySession>> {
        self.backend.enter("get_user_sessions")?;
        let state = self.backend.state.lock().unwrap();
        Ok(state
            .sessions
            .iter()
            .filter(|s| s.principal == self.caller)
            .cloned()
            .collect())
    }

    async fn generate_user_progress_report(&self) -> ServiceResult<ProgressReport> {
        self.backend.enter("generate_user_progress_report")?;
        let mut state = self.backend.state.lock().unwrap();
        if !state.users.contains_key(&self.caller) {
            return Err(not_found());
        }
        let reductions: Vec<f32> = state
            .sessions
            .iter()
            .filter(|s| s.principal == self.caller)
            .map(|s| f32::from(s.stress_reduction()))
            .collect();
        let avg = if reductions.is_empty() {
            0.0
        } else {
            reductions.iter().sum::<f32>() / reductions.len() as f32
        };
        state.clock += 1;
        Ok(ProgressReport {
            principal: self.caller.clone(),
            total_sessions: reductions.len() as u32,
            avg_stress_reduction: avg,
            trend: if avg > 0.0 { "Improving" } else { "Stable" }.to_string(),
            recommendations: vec!["Keep a regular practice".to_string()],
            generated_at: state.clock,
        })
    }

    async fn start_therapy_session(
        &self,
        session_type: &str,
        stress_before: u8,
    ) -> ServiceResult<String> {
        self.backend.enter("start_therapy_session")?;
        let mut state = self.backend.state.lock().unwrap();
        if !state.users.contains_key(&self.caller) {
            return Err(not_found());
        }
        state.next_session += 1;
        let id = format!("session_{}", state.next_session);
        state
            .started
            .insert(id.clone(), (session_type.to_string(), stress_before));
        Ok(id)
    }

    async fn end_therapy_session(
        &self,
        request: &EndSessionRequest,
    ) -> ServiceResult<TherapySession> {
        self.backend.enter("end_therapy_session")?;
        let mut state = self.backend.state.lock().unwrap();
        let (session_type, stress_before) = state
            .started
            .remove(&request.session_id)
            .ok_or_else(|| ServiceError::Rejected("Session not found".to_string()))?;
        state.clock += 1;
        let now = state.clock;
        let profile = state.users.get_mut(&self.caller).ok_or_else(not_found)?;
        profile.session_count += 1;
        profile.total_sessions += 1;
        profile.last_active_at = now;
        let session = TherapySession {
            id: request.session_id.clone(),
            principal: self.caller.clone(),
            session_type,
            timestamp: now,
            duration_minutes: request.duration_minutes,
            stress_before,
            stress_after: request.stress_after,
            notes: request.notes.clone(),
            voice_metrics: VoiceAnalysis {
                pitch: request.pitch,
                tempo: request.tempo,
                emotion: emotion(request.pitch, request.tempo).to_string(),
                stress_indicators: Vec::new(),
            },
        };
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn get_cbt_reflection(&self, thought: &str) -> ServiceResult<String> {
        self.backend.enter("get_cbt_reflection")?;
        Ok(if thought.contains("I'm a failure") {
            "Try to reframe: Everyone fails sometimes. What did you learn?".to_string()
        } else {
            "Reflect: Is this thought helping you or hurting you?".to_string()
        })
    }

    async fn get_total_sessions(&self) -> ServiceResult<u64> {
        self.backend.enter("get_total_sessions")?;
        Ok(self.backend.state.lock().unwrap().sessions.len() as u64)
    }

    async fn get_total_users(&self) -> ServiceResult<u64> {
        self.backend.enter("get_total_users")?;
        Ok(self.backend.state.lock().unwrap().users.len() as u64)
    }
}

// ============================================================================
// Harness
// ============================================================================

/// All doubles wired into one manager.
pub struct Harness {
    pub identity: Arc<MockIdentityClient>,
    pub factory: Arc<MockIdentityFactory>,
    pub transport: Arc<MockTransport>,
    pub backend: Arc<InMemoryBackend>,
    pub binder: Arc<MockBinder>,
    pub manager: SessionManager,
}

pub struct HarnessBuilder {
    config: SessionConfig,
    identity: MockIdentityClient,
    factory_failures: usize,
    transport: MockTransport,
    fail_full_bind: bool,
    fail_minimal_bind: bool,
    backend: InMemoryBackend,
}

impl HarnessBuilder {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            identity: MockIdentityClient::signed_in(),
            factory_failures: 0,
            transport: MockTransport::reliable(),
            fail_full_bind: false,
            fail_minimal_bind: false,
            backend: InMemoryBackend::new(),
        }
    }

    pub fn identity(mut self, identity: MockIdentityClient) -> Self {
        self.identity = identity;
        self
    }

    pub fn factory_failures(mut self, failures: usize) -> Self {
        self.factory_failures = failures;
        self
    }

    pub fn transport(mut self, transport: MockTransport) -> Self {
        self.transport = transport;
        self
    }

    pub fn failing_binds(mut self, full: bool, minimal: bool) -> Self {
        self.fail_full_bind = full;
        self.fail_minimal_bind = minimal;
        self
    }

    pub fn backend(mut self, backend: InMemoryBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn build(self) -> Harness {
        let identity = Arc::new(self.identity);
        let factory = Arc::new(MockIdentityFactory::failing_first(
            identity.clone(),
            self.factory_failures,
        ));
        let transport = Arc::new(self.transport);
        let backend = Arc::new(self.backend);
        let binder = Arc::new(MockBinder::scripted(
            backend.clone(),
            self.fail_full_bind,
            self.fail_minimal_bind,
        ));
        let manager = SessionManager::new(
            self.config,
            factory.clone(),
            transport.clone(),
            binder.clone(),
        );
        Harness {
            identity,
            factory,
            transport,
            backend,
            binder,
            manager,
        }
    }
}
