//! Scripted backend and fixtures shared by transport, api and session tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::watch;

use super::transport::{HttpBackend, OutboundRequest, RawResponse, Transport, TransportError};
use super::types::{Role, User};
use crate::state::session::SessionState;
use crate::util::persistence::MemoryStore;

pub const BASE_URL: &str = "http://portal.test/api";

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<OutboundRequest>>,
    observer: Mutex<Option<watch::Receiver<SessionState>>>,
    observed: Mutex<Vec<SessionState>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_json(&self, status: u16, body: &Value) {
        self.push_raw(status, &body.to_string());
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .expect("responses mutex should lock")
            .push_back(Ok(RawResponse { status, body: body.as_bytes().to_vec() }));
    }

    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().expect("responses mutex should lock").push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().expect("requests mutex should lock").clone()
    }

    /// Record the session state seen at the moment each request executes.
    pub fn observe(&self, rx: watch::Receiver<SessionState>) {
        *self.observer.lock().expect("observer mutex should lock") = Some(rx);
    }

    pub fn observed(&self) -> Vec<SessionState> {
        self.observed.lock().expect("observed mutex should lock").clone()
    }
}

#[async_trait::async_trait]
impl HttpBackend for ScriptedBackend {
    async fn execute(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        if let Some(rx) = self.observer.lock().expect("observer mutex should lock").as_ref() {
            let state = rx.borrow().clone();
            self.observed.lock().expect("observed mutex should lock").push(state);
        }
        self.requests.lock().expect("requests mutex should lock").push(request);
        self.responses
            .lock()
            .expect("responses mutex should lock")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".to_owned())))
    }
}

pub fn transport(backend: &Arc<ScriptedBackend>, store: &Arc<MemoryStore>) -> Arc<Transport> {
    Arc::new(Transport::new(BASE_URL, Duration::from_secs(10), backend.clone(), store.clone()))
}

pub fn ok(data: Value) -> Value {
    json!({ "success": true, "message": "ok", "data": data })
}

pub fn user(role: Role) -> User {
    let (id, name) = match role {
        Role::Admin => ("a1", "Admin"),
        _ => ("u1", "Ana"),
    };
    User { id: id.to_owned(), name: name.to_owned(), email: format!("{id}@example.com"), role }
}

pub fn user_json(user: &User) -> Value {
    serde_json::to_value(user).expect("user should serialize")
}
