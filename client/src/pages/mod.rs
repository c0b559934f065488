//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each protected page wraps its content in `RoleGuard` and `PortalLayout`
//! and loads data through `list_loader`, which routes reads via the cache.

pub mod dashboard;
pub mod documents;
pub(crate) mod list_loader;
pub mod login;
pub mod notifications;
pub mod policies;
