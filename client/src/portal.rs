//! Wiring of transport, session store and read cache into one handle.
//!
//! The app shell builds a single [`Portal`] and provides it as context; pages
//! clone it cheaply and never construct their own transport.

#[cfg(test)]
#[path = "portal_test.rs"]
mod portal_test;

use std::sync::Arc;

use crate::config::PortalConfig;
use crate::net::api::Api;
use crate::net::http;
use crate::net::transport::{ApiError, HttpBackend, Transport, TransportError};
use crate::net::types::{LoginRequest, User};
use crate::state::cache::ReadCache;
use crate::state::session::SessionStore;
use crate::util::persistence::KeyValueStore;

#[derive(Clone)]
pub struct Portal {
    pub api: Api,
    pub session: Arc<SessionStore>,
    pub cache: Arc<ReadCache>,
    pub config: Arc<PortalConfig>,
}

impl Portal {
    #[must_use]
    pub fn new(config: PortalConfig, backend: Arc<dyn HttpBackend>, store: Arc<dyn KeyValueStore>) -> Self {
        let transport = Arc::new(Transport::new(
            config.api_base_url.clone(),
            config.request_timeout,
            backend,
            store,
        ));
        let api = Api::new(transport);
        Self {
            session: Arc::new(SessionStore::new(api.clone())),
            api,
            cache: Arc::new(ReadCache::new()),
            config: Arc::new(config),
        }
    }

    /// Build from the environment with the target's default backend and store.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if no HTTP backend is available.
    pub fn from_env() -> Result<Self, TransportError> {
        let config = PortalConfig::from_env();
        tracing::info!(api = %config.api_base_url, timeout_secs = config.request_timeout.as_secs(), "portal configured");
        Ok(Self::new(config, http::default_backend()?, default_store()))
    }

    /// Authenticate with credentials and adopt the returned session.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the login call; the session is left untouched.
    pub async fn sign_in(&self, credentials: &LoginRequest) -> Result<User, ApiError> {
        let reply = self.api.login(credentials).await?;
        self.cache.clear();
        self.session.login(&reply.token, reply.user.clone()).await;
        Ok(reply.user)
    }

    pub async fn sign_out(&self) {
        self.session.logout().await;
        self.cache.clear();
    }
}

fn default_store() -> Arc<dyn KeyValueStore> {
    #[cfg(feature = "csr")]
    {
        Arc::new(crate::util::persistence::LocalStore)
    }
    #[cfg(not(feature = "csr"))]
    {
        Arc::new(crate::util::persistence::MemoryStore::new())
    }
}
