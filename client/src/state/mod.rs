//! Application state modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` owns the authentication lifecycle; `cache` and `list` hold the
//! read side shared by list pages.

pub mod cache;
pub mod list;
pub mod session;
