//! Session store: authentication state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`SessionStore`] per app, shared by `Arc`. Route guards and user-aware
//! components read its state through a `watch` channel so they recompute on
//! every transition. Every write goes through a named async transition, and
//! transitions hold `transition` for their whole read-modify-write of the
//! persisted token/user pair, so at most one is in flight at a time.
//!
//! ERROR HANDLING
//! ==============
//! `initialize` and `refresh_current_user` treat every failure as "not
//! authenticated". Navigation after a server-side rejection belongs to the
//! shell via [`run_expiry_listener`], never to this store.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, broadcast, watch};

use crate::net::api::Api;
use crate::net::transport::{ApiError, AuthEvent};
use crate::net::types::User;
use crate::util::auth::LOGIN_PATH;
use crate::util::persistence::{self, KeyValueStore, TOKEN_KEY, USER_KEY};

/// Authentication lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Process start, before `initialize` ran.
    #[default]
    Uninitialized,
    /// A persisted token is being validated.
    Loading,
    Authenticated(User),
    Anonymous,
}

impl SessionState {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// True until the first validation settled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Uninitialized | Self::Loading)
    }
}

/// Point-in-time view of the session record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub current_user: Option<User>,
    pub credential_token: Option<String>,
    /// True only when a user and a token are both present.
    pub is_authenticated: bool,
    pub is_loading: bool,
}

pub struct SessionStore {
    api: Api,
    state: watch::Sender<SessionState>,
    transition: Mutex<()>,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Api) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self { api, state, transition: Mutex::new(()) }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        let state = self.state();
        let credential_token = self.store().get(TOKEN_KEY);
        let current_user = state.user().cloned();
        Session {
            is_authenticated: current_user.is_some() && credential_token.is_some(),
            is_loading: state.is_pending(),
            current_user,
            credential_token,
        }
    }

    /// Validate a persisted token, if any, with the "who am I" call.
    pub async fn initialize(&self) {
        let _guard = self.transition.lock().await;

        if self.store().get(TOKEN_KEY).is_none() {
            persistence::clear_credentials(self.store());
            self.set(SessionState::Anonymous);
            return;
        }

        self.set(SessionState::Loading);
        match self.api.current_user().await {
            Ok(user) => self.authenticate(user),
            Err(e) => self.reject("initialize", &e),
        }
    }

    /// Adopt credentials the caller already validated upstream.
    pub async fn login(&self, token: &str, user: User) {
        let _guard = self.transition.lock().await;
        self.store().set(TOKEN_KEY, token);
        tracing::info!(user_id = %user.id, role = ?user.role, "signed in");
        self.authenticate(user);
    }

    /// Drop credentials. Calling this while anonymous changes nothing.
    pub async fn logout(&self) {
        let _guard = self.transition.lock().await;
        persistence::clear_credentials(self.store());
        self.set(SessionState::Anonymous);
    }

    /// Re-run "who am I". Returns whether the session is still authenticated.
    pub async fn refresh_current_user(&self) -> bool {
        let _guard = self.transition.lock().await;
        match self.api.current_user().await {
            Ok(user) => {
                self.authenticate(user);
                true
            }
            Err(e) => {
                self.reject("refresh", &e);
                false
            }
        }
    }

    /// Server rejected the credential on some call. The transport already
    /// cleared storage; this settles the state.
    pub async fn expire(&self) {
        let _guard = self.transition.lock().await;
        persistence::clear_credentials(self.store());
        self.set(SessionState::Anonymous);
    }

    fn store(&self) -> &dyn KeyValueStore {
        self.api.transport().store().as_ref()
    }

    fn authenticate(&self, user: User) {
        persistence::save_json(self.store(), USER_KEY, &user);
        self.set(SessionState::Authenticated(user));
    }

    fn reject(&self, phase: &'static str, error: &ApiError) {
        match error {
            ApiError::Transport(e) => tracing::warn!(phase, error = %e, "session validation unreachable"),
            other => tracing::info!(phase, error = %other, "session validation rejected"),
        }
        persistence::clear_credentials(self.store());
        self.set(SessionState::Anonymous);
    }

    fn set(&self, next: SessionState) {
        let to = state_name(&next);
        let previous = self.state.send_replace(next);
        tracing::debug!(from = state_name(&previous), to, "session transition");
    }
}

fn state_name(state: &SessionState) -> &'static str {
    match state {
        SessionState::Uninitialized => "uninitialized",
        SessionState::Loading => "loading",
        SessionState::Authenticated(_) => "authenticated",
        SessionState::Anonymous => "anonymous",
    }
}

/// Expire the session and ask the shell to navigate to login, once per
/// [`AuthEvent`]. Runs until the transport is dropped.
pub async fn run_expiry_listener<F>(mut events: broadcast::Receiver<AuthEvent>, session: Arc<SessionStore>, on_expired: F)
where
    F: Fn(&'static str),
{
    loop {
        match events.recv().await {
            Ok(AuthEvent::Unauthorized { path }) => {
                tracing::info!(%path, "credential rejected by server");
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "auth events lagged; expiring once");
            }
            Err(RecvError::Closed) => break,
        }
        session.expire().await;
        on_expired(LOGIN_PATH);
    }
}
