//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the authenticated shell and the route guard while
//! reading shared state from Leptos context providers.

pub mod layout;
pub mod role_guard;
