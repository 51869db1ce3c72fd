//! Shared fakes for gate tests

#![allow(dead_code)]

use async_trait::async_trait;
use portal_gate::access_control::Role;
use portal_gate::config::{GateConfig, PortalConfig};
use portal_gate::error::{IdentityError, ProfileError, SupabaseError};
use portal_gate::gate::{AccessGate, ExternalNavigator};
use portal_gate::identity::{IdentityProvider, Session};
use portal_gate::profile::{Profile, ProfileStore};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// =============================================================================
// Identity
// =============================================================================

/// Identity provider returning a fixed answer and counting calls
pub struct FakeIdentity {
    session: Option<Session>,
    unavailable: bool,
    calls: AtomicUsize,
}

impl FakeIdentity {
    pub fn signed_in(session: Session) -> Arc<Self> {
        Arc::new(Self {
            session: Some(session),
            unavailable: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self {
            session: None,
            unavailable: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            session: None,
            unavailable: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn current_session(&self) -> Result<Option<Session>, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(IdentityError::Unavailable(SupabaseError::Api {
                status: 503,
                message: "auth down".into(),
            }));
        }
        Ok(self.session.clone())
    }

    fn provider_type(&self) -> &'static str {
        "fake"
    }
}

// =============================================================================
// Profiles
// =============================================================================

/// In-memory profile store with optional failures and held lookups
#[derive(Default)]
pub struct FakeProfileStore {
    profiles: Mutex<HashMap<String, Profile>>,
    failing: bool,
    holds: Mutex<HashMap<String, Arc<Notify>>>,
    calls: AtomicUsize,
}

impl FakeProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with(self, user_id: &str, role: Role, onboarding_completed: bool) -> Self {
        self.insert(Profile::new(user_id, role, onboarding_completed));
        self
    }

    pub fn insert(&self, profile: Profile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.auth_user_id.clone(), profile);
    }

    /// Make lookups for `user_id` wait until the returned notify fires
    pub fn hold(&self, user_id: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.holds
            .lock()
            .unwrap()
            .insert(user_id.to_string(), notify.clone());
        notify
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn profile_for(&self, session: &Session) -> Result<Option<Profile>, ProfileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let hold = self.holds.lock().unwrap().get(session.user_id()).cloned();
        if let Some(notify) = hold {
            notify.notified().await;
        }

        if self.failing {
            return Err(ProfileError::Lookup(SupabaseError::Api {
                status: 500,
                message: "relation \"profiles\" does not exist".into(),
            }));
        }

        Ok(self.profiles.lock().unwrap().get(session.user_id()).cloned())
    }

    fn store_type(&self) -> &'static str {
        "fake"
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// Navigator recording every external navigation
#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl ExternalNavigator for RecordingNavigator {
    fn navigate_external(&self, url: &str) {
        self.visits.lock().unwrap().push(url.to_string());
    }
}

// =============================================================================
// Gate construction
// =============================================================================

pub struct Harness {
    pub gate: Arc<AccessGate>,
    pub identity: Arc<FakeIdentity>,
    pub store: Arc<FakeProfileStore>,
    pub navigator: Arc<RecordingNavigator>,
}

pub fn harness(identity: Arc<FakeIdentity>, store: FakeProfileStore) -> Harness {
    harness_with(identity, store, GateConfig::default())
}

pub fn harness_with(
    identity: Arc<FakeIdentity>,
    store: FakeProfileStore,
    gate_config: GateConfig,
) -> Harness {
    let store = Arc::new(store);
    let navigator = Arc::new(RecordingNavigator::default());
    let gate = AccessGate::new(
        identity.clone(),
        store.clone(),
        &PortalConfig::default(),
        &gate_config,
    )
    .with_navigator(navigator.clone());

    Harness {
        gate: Arc::new(gate),
        identity,
        store,
        navigator,
    }
}

pub fn session(user_id: &str) -> Session {
    Session::new(user_id, format!("token-{user_id}"))
}

// =============================================================================
// Log capture
// =============================================================================

/// Shared buffer collecting formatted log output
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture logs on the current thread until the guard drops
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
