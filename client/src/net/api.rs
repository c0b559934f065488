//! Typed endpoint façade over [`Transport`].
//!
//! Each method is a thin mapping from a typed request to one transport call.
//! Path and query construction live in small free functions so they can be
//! unit-tested without a network.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde::de::IgnoredAny;

use super::transport::{ApiError, Method, Transport};
use super::types::{Document, DownloadLink, LoginRequest, LoginResponse, Notification, Page, Policy, User};
use crate::state::list::ListQuery;

/// Cheap, cloneable handle to the portal API.
#[derive(Clone)]
pub struct Api {
    transport: Arc<Transport>,
}

fn notification_read_endpoint(id: &str) -> String {
    format!("/notifications/{id}/read")
}

fn document_download_endpoint(id: &str) -> String {
    format!("/documents/{id}/download")
}

/// `page`/`limit` plus the optional filter under `filter_param`.
fn list_params(query: &ListQuery, filter_param: &'static str) -> Vec<(&'static str, String)> {
    let mut params = vec![("page", query.page.to_string()), ("limit", query.limit.to_string())];
    if let Some(filter) = query.filter.as_deref().filter(|f| !f.is_empty()) {
        params.push((filter_param, filter.to_owned()));
    }
    params
}

impl Api {
    #[must_use]
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; rejected credentials arrive as `Application` or `Unauthorized`.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.transport
            .request(Method::Post, "/auth/login", Some(credentials), &[])
            .await
    }

    /// `GET /auth/me`, the "who am I" validation call.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.transport
            .request::<(), _>(Method::Get, "/auth/me", None, &[])
            .await
    }

    /// `GET /policies?page&limit&status`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn list_policies(&self, query: &ListQuery) -> Result<Page<Policy>, ApiError> {
        self.transport
            .request::<(), _>(Method::Get, "/policies", None, &list_params(query, "status"))
            .await
    }

    /// `GET /notifications?page&limit&unread`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn list_notifications(&self, query: &ListQuery) -> Result<Page<Notification>, ApiError> {
        self.transport
            .request::<(), _>(Method::Get, "/notifications", None, &list_params(query, "unread"))
            .await
    }

    /// `PATCH /notifications/{id}/read`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn mark_notification_read(&self, id: &str) -> Result<(), ApiError> {
        self.transport
            .request::<(), IgnoredAny>(Method::Patch, &notification_read_endpoint(id), None, &[])
            .await
            .map(|_| ())
    }

    /// `PATCH /notifications/read-all`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        self.transport
            .request::<(), IgnoredAny>(Method::Patch, "/notifications/read-all", None, &[])
            .await
            .map(|_| ())
    }

    /// `GET /documents?page&limit&kind`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn list_documents(&self, query: &ListQuery) -> Result<Page<Document>, ApiError> {
        self.transport
            .request::<(), _>(Method::Get, "/documents", None, &list_params(query, "kind"))
            .await
    }

    /// `GET /documents/{id}/download`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    pub async fn document_download(&self, id: &str) -> Result<DownloadLink, ApiError> {
        self.transport
            .request::<(), _>(Method::Get, &document_download_endpoint(id), None, &[])
            .await
    }
}
