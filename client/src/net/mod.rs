//! Networking modules for the portal REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` owns bearer injection, envelope normalization and the `401`
//! side effect; `http` provides the concrete backends; `api` maps typed
//! requests onto the transport; `types` defines the wire schema.

pub mod api;
pub mod http;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;
