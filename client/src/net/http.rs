//! Concrete [`HttpBackend`]s.
//!
//! Browser (`csr`): `gloo-net` fetch raced against a `gloo-timers` timeout.
//! Native: `reqwest` with the per-request timeout. Both classify expiry as
//! [`TransportError::Timeout`] so callers can tell it apart from a server
//! failure envelope.

use std::sync::Arc;

use super::transport::{HttpBackend, TransportError};
#[cfg(any(not(target_arch = "wasm32"), feature = "csr"))]
use super::transport::{Method, OutboundRequest, RawResponse};

#[cfg(not(target_arch = "wasm32"))]
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Pick the backend for the current target.
///
/// # Errors
///
/// Returns [`TransportError::ClientBuild`] if the native client cannot be
/// constructed, or on a wasm build without the `csr` feature.
pub fn default_backend() -> Result<Arc<dyn HttpBackend>, TransportError> {
    #[cfg(all(target_arch = "wasm32", feature = "csr"))]
    {
        Ok(Arc::new(GlooBackend))
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "csr")))]
    {
        Err(TransportError::ClientBuild("browser backend requires the `csr` feature".to_owned()))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Ok(Arc::new(ReqwestBackend::new()?))
    }
}

// =============================================================================
// NATIVE
// =============================================================================

#[cfg(not(target_arch = "wasm32"))]
pub struct ReqwestBackend {
    http: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReqwestBackend {
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the TLS stack fails to initialize.
    pub fn new() -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn classify_reqwest(error: &reqwest::Error, timeout: std::time::Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(timeout)
    } else if error.is_builder() {
        TransportError::InvalidRequest(error.to_string())
    } else {
        TransportError::Network(error.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait::async_trait]
impl HttpBackend for ReqwestBackend {
    async fn execute(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .http
            .request(reqwest_method(request.method), &request.url)
            .timeout(request.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_reqwest(&e, request.timeout))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest(&e, request.timeout))?;
        Ok(RawResponse { status, body: body.to_vec() })
    }
}

// =============================================================================
// BROWSER
// =============================================================================

#[cfg(all(target_arch = "wasm32", feature = "csr"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooBackend;

#[cfg(all(target_arch = "wasm32", feature = "csr"))]
impl GlooBackend {
    async fn fetch(request: OutboundRequest) -> Result<RawResponse, TransportError> {
        use gloo_net::http::Request;

        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Patch => Request::patch(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        if !request.query.is_empty() {
            builder = builder.query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = match &request.body {
            Some(body) => {
                builder
                    .json(body)
                    .map_err(|e| TransportError::InvalidRequest(e.to_string()))?
                    .send()
                    .await
            }
            None => builder.send().await,
        }
        .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .binary()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

#[cfg(all(target_arch = "wasm32", feature = "csr"))]
#[async_trait::async_trait(?Send)]
impl HttpBackend for GlooBackend {
    async fn execute(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        use futures::future::{Either, select};

        let timeout = request.timeout;
        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        let fetch = Box::pin(Self::fetch(request));
        let timer = gloo_timers::future::TimeoutFuture::new(millis);

        match select(fetch, timer).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(TransportError::Timeout(timeout)),
        }
    }
}
