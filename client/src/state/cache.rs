//! Page-level read cache keyed by resource + query parameters.
//!
//! Reads go through [`fetch_page`]; mutations go through [`run_mutation`],
//! which drops every cached page of the touched resource on success. Callers
//! then re-fetch whatever they display.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::list::QueryKey;
use crate::net::transport::ApiError;
use crate::net::types::Page;

pub const POLICIES: &str = "policies";
pub const NOTIFICATIONS: &str = "notifications";
pub const DOCUMENTS: &str = "documents";

#[derive(Debug, Default)]
pub struct ReadCache {
    entries: Mutex<HashMap<QueryKey, Value>>,
}

impl ReadCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<Page<T>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let value = entries.get(key)?.clone();
        drop(entries);
        serde_json::from_value(value).ok()
    }

    pub fn insert<T: Serialize>(&self, key: QueryKey, page: &Page<T>) {
        match serde_json::to_value(page) {
            Ok(value) => {
                self.entries
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key, value);
            }
            Err(e) => tracing::warn!(resource = key.resource, error = %e, "page not cacheable"),
        }
    }

    /// Drop every cached page of `resource`. Returns how many were dropped.
    pub fn invalidate(&self, resource: &str) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|key, _| key.resource != resource);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Serve `key` from cache, or run `fetch` and cache its result.
///
/// # Errors
///
/// Propagates the error of `fetch`; failures are never cached.
pub async fn fetch_page<T, F, Fut>(cache: &ReadCache, key: QueryKey, fetch: F) -> Result<Page<T>, ApiError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    if let Some(hit) = cache.get(&key) {
        return Ok(hit);
    }
    let page = fetch().await?;
    cache.insert(key, &page);
    Ok(page)
}

/// Run a mutation and invalidate `resource` if it succeeded.
///
/// # Errors
///
/// Propagates the error of `mutation`; the cache is left untouched.
pub async fn run_mutation<R, F, Fut>(cache: &ReadCache, resource: &'static str, mutation: F) -> Result<R, ApiError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<R, ApiError>>,
{
    let output = mutation().await?;
    let dropped = cache.invalidate(resource);
    tracing::debug!(resource, dropped, "read cache invalidated");
    Ok(output)
}
