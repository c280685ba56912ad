// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: a scriptable controller and record builders.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Once};

use crate::controller::{Controller, ControllerFuture, ServiceCredentials};
use crate::error::SyncError;
use crate::snapshot::{AgentSession, Endpoint, ServiceKey};

static INIT: Once = Once::new();

/// Install the rustls crypto provider (needed for reqwest even on plain HTTP).
pub fn ensure_crypto_provider() {
    INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Build an endpoint with the given annotations.
pub fn endpoint(name: &str, kind: &str, configured: bool, annotations: &[(&str, &str)]) -> Endpoint {
    Endpoint {
        name: name.to_owned(),
        endpoint_type: kind.to_owned(),
        configured,
        annotations: annotations_of(annotations),
    }
}

/// Build an agent session.
pub fn session(name: &str, connected_at: i64, endpoints: Vec<Endpoint>) -> AgentSession {
    AgentSession { name: name.to_owned(), connected_at, endpoints }
}

pub fn annotations_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

pub fn accepted(types: &[&str]) -> HashSet<String> {
    types.iter().map(|t| (*t).to_owned()).collect()
}

/// URL the fake controller hands out for `key`.
pub fn fake_url(key: &ServiceKey) -> String {
    format!("https://{}.{}.example/{}", key.agent_name, key.endpoint_name, key.endpoint_type)
}

/// Token the fake controller hands out for `key`.
pub fn fake_token(key: &ServiceKey) -> String {
    format!("token-{key}")
}

#[derive(Default)]
struct FakeState {
    agents: Vec<AgentSession>,
    list_error: Option<SyncError>,
    credential_failures: HashSet<ServiceKey>,
}

#[derive(Default)]
struct FakeInner {
    state: Mutex<FakeState>,
    hang_listing: AtomicBool,
    list_calls: AtomicU32,
    credential_calls: AtomicU32,
}

/// In-memory [`Controller`] whose responses are set by the test.
///
/// Clones share state, so a test can keep one handle while the synchronizer
/// owns another.
#[derive(Clone, Default)]
pub struct FakeController {
    inner: Arc<FakeInner>,
}

impl FakeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agents(agents: Vec<AgentSession>) -> Self {
        let fake = Self::new();
        fake.set_agents(agents);
        fake
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_agents(&self, agents: Vec<AgentSession>) {
        self.state().agents = agents;
    }

    /// Make agent listing fail with `err` until [`Self::clear_failures`].
    pub fn fail_listing(&self, err: SyncError) {
        self.state().list_error = Some(err);
    }

    /// Make credential generation for `key` fail until [`Self::clear_failures`].
    pub fn fail_credentials_for(&self, key: ServiceKey) {
        self.state().credential_failures.insert(key);
    }

    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.list_error = None;
        state.credential_failures.clear();
    }

    /// Make agent listing never complete.
    pub fn hang_listing(&self) {
        self.inner.hang_listing.store(true, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> u32 {
        self.inner.list_calls.load(Ordering::SeqCst)
    }

    pub fn credential_calls(&self) -> u32 {
        self.inner.credential_calls.load(Ordering::SeqCst)
    }
}

impl Controller for FakeController {
    fn list_connected_agents(&self) -> ControllerFuture<'_, Vec<AgentSession>> {
        Box::pin(async move {
            self.inner.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.inner.hang_listing.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            let state = self.state();
            let result = match state.list_error {
                Some(ref err) => Err(err.clone()),
                None => Ok(state.agents.clone()),
            };
            result
        })
    }

    fn fetch_credentials<'a>(
        &'a self,
        key: &'a ServiceKey,
    ) -> ControllerFuture<'a, ServiceCredentials> {
        Box::pin(async move {
            self.inner.credential_calls.fetch_add(1, Ordering::SeqCst);
            if self.state().credential_failures.contains(key) {
                return Err(SyncError::Protocol(format!(
                    "fetching service credentials: http status 500 for {key}"
                )));
            }
            Ok(ServiceCredentials { url: fake_url(key), token: fake_token(key) })
        })
    }
}
