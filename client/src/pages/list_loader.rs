//! Shared read flow for list pages.
//!
//! Loads go through the read cache and land in the page's `ListState`
//! signal. A page flips its `alive` flag on cleanup; results that arrive
//! afterwards are dropped instead of written into unmounted state, and
//! results for a query the page has since moved away from are ignored.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::net::api::Api;
use crate::net::transport::ApiError;
use crate::net::types::Page;
use crate::portal::Portal;
use crate::state::list::{ListQuery, ListState};

/// Flag cleared when the calling component unmounts.
pub(crate) fn alive_flag() -> Arc<AtomicBool> {
    let alive = Arc::new(AtomicBool::new(true));
    let on_unmount = alive.clone();
    on_cleanup(move || on_unmount.store(false, Ordering::Relaxed));
    alive
}

pub(crate) fn spawn_list_load<T, F, Fut>(
    portal: &Portal,
    resource: &'static str,
    state: RwSignal<ListState<T>>,
    alive: Arc<AtomicBool>,
    query: ListQuery,
    fetch: F,
) where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
    F: FnOnce(Api, ListQuery) -> Fut + 'static,
    Fut: Future<Output = Result<Page<T>, ApiError>> + 'static,
{
    state.update(|s| s.begin(query.clone()));

    #[cfg(feature = "csr")]
    {
        let api = portal.api.clone();
        let cache = portal.cache.clone();
        leptos::task::spawn_local(async move {
            let key = query.key(resource);
            let requested = query.clone();
            let result = crate::state::cache::fetch_page(&cache, key, move || fetch(api, query)).await;
            if !alive.load(Ordering::Relaxed) {
                tracing::debug!(resource, "dropping list result for unmounted page");
                return;
            }
            if !state.try_update(|s| s.finish(&requested, result)).unwrap_or(false) {
                tracing::debug!(resource, page = requested.page, "dropping list result for superseded query");
            }
        });
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (portal, resource, alive, fetch);
    }
}
