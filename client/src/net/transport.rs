//! Authenticated transport every API call goes through.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` builds typed requests on top of [`Transport::send`]. The transport
//! attaches the persisted bearer token, normalizes every body into an
//! [`envelope::Envelope`], and reacts to `401` by clearing the persisted
//! credentials and broadcasting [`AuthEvent::Unauthorized`]. Navigation is
//! left to whoever subscribes (the app shell), so this module never touches
//! the browser location.
//!
//! ERROR HANDLING
//! ==============
//! Network failures and timeouts surface as [`TransportError`]; failure
//! envelopes as [`ApiError::Application`]; `401` as [`ApiError::Unauthorized`]
//! after the global side effect has already fired.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::sync::Arc;
use std::time::Duration;

use envelope::{DEFAULT_ERROR_MESSAGE, Envelope, Success};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::util::persistence::{self, KeyValueStore, TOKEN_KEY};

/// Per-call wait used when the config does not override it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Status the backend uses for a missing, invalid, or expired credential.
pub const UNAUTHORIZED_STATUS: u16 = 401;

/// Shown for a `401` whose body does not explain itself.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

pub(crate) const AUTH_EVENT_CAPACITY: usize = 16;

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A fully resolved request handed to an [`HttpBackend`].
#[derive(Clone, Debug, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl OutboundRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body as received from the network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

// =============================================================================
// ERRORS
// =============================================================================

/// No server envelope is available: the call never completed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

/// Everything a view-model can get back from an API call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The server answered with `success: false`.
    #[error("{message}")]
    Application { status: u16, message: String, errors: Vec<String> },
    /// The credential was rejected; the session has already been torn down.
    /// `message` is the server's explanation, when the body carried one.
    #[error("authorization rejected")]
    Unauthorized { message: Option<String> },
    /// The body could not be normalized into an envelope or typed payload.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Text suitable for an inline error or toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(TransportError::Timeout(_)) => "The server took too long to respond.".to_owned(),
            Self::Transport(_) => "Could not reach the server. Check your connection.".to_owned(),
            Self::Application { message, .. } => message.clone(),
            Self::Unauthorized { message: Some(message) } => message.clone(),
            Self::Unauthorized { message: None } => SESSION_EXPIRED_MESSAGE.to_owned(),
            Self::Malformed(_) => DEFAULT_ERROR_MESSAGE.to_owned(),
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Emitted once per `401` response, whichever call received it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    Unauthorized { path: String },
}

// =============================================================================
// BACKEND SEAM
// =============================================================================

/// Executes one resolved request. Implementations own timeouts and map
/// expiry to [`TransportError::Timeout`].
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait HttpBackend: Send + Sync {
    async fn execute(&self, request: OutboundRequest) -> Result<RawResponse, TransportError>;
}

// =============================================================================
// TRANSPORT
// =============================================================================

pub struct Transport {
    base_url: String,
    timeout: Duration,
    backend: Arc<dyn HttpBackend>,
    store: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<AuthEvent>,
}

impl Transport {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        backend: Arc<dyn HttpBackend>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Self { base_url: base_url.into(), timeout, backend, store, events }
    }

    /// Receive [`AuthEvent`]s emitted after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Durable storage the bearer token is read from.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Send one request and normalize the reply.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]. A `401` also clears the persisted credentials and
    /// broadcasts [`AuthEvent::Unauthorized`] before the error is returned.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: &[(&str, String)],
    ) -> Result<Success, ApiError> {
        let request = self.build_request(method, path, body, query);
        tracing::debug!(method = method.as_str(), path, "api request");

        let response = self.backend.execute(request).await.map_err(|e| {
            tracing::warn!(method = method.as_str(), path, error = %e, "api transport failure");
            ApiError::from(e)
        })?;

        if response.status == UNAUTHORIZED_STATUS {
            self.handle_unauthorized(path);
            return Err(ApiError::Unauthorized { message: rejection_message(&response.body) });
        }

        match Envelope::parse(&response.body) {
            Ok(Envelope::Success(success)) => Ok(success),
            Ok(Envelope::Failure(failure)) => {
                let message = failure.message();
                tracing::debug!(path, status = response.status, %message, "api failure envelope");
                Err(ApiError::Application { status: response.status, message, errors: failure.errors })
            }
            Err(e) => {
                tracing::warn!(path, status = response.status, error = %e, "malformed api response");
                Err(ApiError::Malformed(e.to_string()))
            }
        }
    }

    /// `send` plus typed decoding of the success payload.
    ///
    /// # Errors
    ///
    /// As [`Transport::send`], plus [`ApiError::Malformed`] when the payload
    /// does not match `T`.
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        let success = self.send(method, path, body, query).await?;
        success.decode().map_err(|e| {
            tracing::warn!(path, error = %e, "api payload did not match expected shape");
            ApiError::Malformed(e.to_string())
        })
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: &[(&str, String)],
    ) -> OutboundRequest {
        let mut headers = vec![("Accept".to_owned(), "application/json".to_owned())];
        if let Some(token) = self.store.get(TOKEN_KEY) {
            headers.push(("Authorization".to_owned(), bearer(&token)));
        }
        OutboundRequest {
            method,
            url: join_url(&self.base_url, path),
            query: query.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect(),
            headers,
            body,
            timeout: self.timeout,
        }
    }

    fn handle_unauthorized(&self, path: &str) {
        tracing::info!(path, "credential rejected; clearing persisted session");
        persistence::clear_credentials(self.store.as_ref());
        // No subscribers is fine: nothing is mounted to navigate yet.
        let _ = self.events.send(AuthEvent::Unauthorized { path: path.to_owned() });
    }
}

/// Explanation carried by a `401` failure envelope, if any.
fn rejection_message(body: &[u8]) -> Option<String> {
    match Envelope::parse(body) {
        Ok(Envelope::Failure(failure)) => {
            let explained = failure.message.as_deref().is_some_and(|m| !m.trim().is_empty()) || !failure.errors.is_empty();
            explained.then(|| failure.message())
        }
        _ => None,
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
