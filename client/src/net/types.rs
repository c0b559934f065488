//! Wire DTOs for the portal REST API.
//!
//! DESIGN
//! ======
//! These are the strict shapes decoded out of a success envelope's `data`.
//! Optional wire fields are `Option`/`#[serde(default)]` here and nowhere
//! else, so views never chase fallbacks through untyped JSON.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Coarse capability classifier gating UI regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Client,
    Admin,
    /// A role this client build does not know about.
    #[serde(other)]
    Unknown,
}

/// An authenticated user as returned by `/auth/me` and `/auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Credentials posted to `/auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// One page of a list read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    /// Only present on notification reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<u64>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 0;
        }
        u32::try_from(self.total.div_ceil(u64::from(self.limit))).unwrap_or(u32::MAX)
    }
}

/// Lifecycle status of an insurance policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    Active,
    Pending,
    Expired,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl PolicyStatus {
    /// Query-string value accepted by the `status` filter.
    #[must_use]
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Pending => "PENDING",
            Self::Expired => "EXPIRED",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Pending => "Pending",
            Self::Expired => "Expired",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub policy_number: String,
    pub status: PolicyStatus,
    /// Product display name (e.g. "Comprehensive").
    pub product_name: String,
    /// Vehicle summary, e.g. plate or make/model.
    #[serde(default)]
    pub vehicle: Option<String>,
    /// Premium in minor currency units.
    pub premium_cents: i64,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub file_name: String,
    /// Document category, e.g. `POLICY`, `CLAIM`, `INVOICE`.
    pub kind: String,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    pub uploaded_at: String,
}

/// Short-lived link returned by `/documents/{id}/download`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DownloadLink {
    pub url: String,
    #[serde(default)]
    pub file_name: Option<String>,
}
