//! Paged list state shared by the policy, notification and document pages.
//!
//! DESIGN
//! ======
//! A page view-model is a [`ListQuery`] plus the last result. Rendering reads
//! [`ListState::view`], which folds loading/error/empty/populated into one
//! enum so every page handles the same four cases.

#[cfg(test)]
#[path = "list_test.rs"]
mod list_test;

use crate::net::transport::ApiError;
use crate::net::types::Page;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pagination and filter parameters of one read.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListQuery {
    /// 1-based.
    pub page: u32,
    pub limit: u32,
    pub filter: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { page: 1, limit: DEFAULT_PAGE_SIZE, filter: None }
    }
}

impl ListQuery {
    /// Change the filter and go back to the first page.
    #[must_use]
    pub fn with_filter(&self, filter: Option<String>) -> Self {
        let filter = filter.filter(|f| !f.is_empty());
        Self { page: 1, limit: self.limit, filter }
    }

    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self { page: page.max(1), ..self.clone() }
    }

    /// Cache key of this query for `resource`.
    #[must_use]
    pub fn key(&self, resource: &'static str) -> QueryKey {
        QueryKey { resource, query: self.clone() }
    }
}

/// Read-cache key: resource name plus every parameter that shapes the result.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: &'static str,
    pub query: ListQuery,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListState<T> {
    pub query: ListQuery,
    pub loading: bool,
    pub error: Option<String>,
    pub page: Option<Page<T>>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self { query: ListQuery::default(), loading: false, error: None, page: None }
    }
}

/// What a list page should render right now.
#[derive(Debug, PartialEq)]
pub enum ListView<'a, T> {
    Loading,
    Error(&'a str),
    Empty,
    Populated(&'a Page<T>),
}

impl<T> ListState<T> {
    /// Start a read for `query`. Keeps the previous page on screen.
    pub fn begin(&mut self, query: ListQuery) {
        self.query = query;
        self.loading = true;
        self.error = None;
    }

    /// Apply the result of a read for `query`. Results for a query that is
    /// no longer current are dropped; returns whether `result` was applied.
    pub fn finish(&mut self, query: &ListQuery, result: Result<Page<T>, ApiError>) -> bool {
        if *query != self.query {
            return false;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.page = Some(page);
                self.error = None;
            }
            Err(e) => self.error = Some(e.user_message()),
        }
        true
    }

    #[must_use]
    pub fn view(&self) -> ListView<'_, T> {
        if let Some(error) = self.error.as_deref() {
            return ListView::Error(error);
        }
        match &self.page {
            None => ListView::Loading,
            Some(page) if page.items.is_empty() => ListView::Empty,
            Some(page) => ListView::Populated(page),
        }
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.query.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page
            .as_ref()
            .is_some_and(|page| self.query.page < page.total_pages())
    }
}
