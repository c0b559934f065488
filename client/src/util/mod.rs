//! Pure helpers shared across the client.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` holds the route decision table and navigation paths; `persistence`
//! keeps browser storage behind a trait so the session code runs natively.

pub mod auth;
pub mod persistence;
