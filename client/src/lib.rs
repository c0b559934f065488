//! # portal-client
//!
//! Leptos + WASM frontend for the auto-insurance customer portal.
//!
//! This crate contains the HTTP transport and endpoint façade, the session
//! store and route guard, the read cache and list view-models, and the pages
//! that render them. Everything below `pages`/`components`/`app` is plain
//! async Rust and runs natively under `cargo test`.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod portal;
pub mod state;
pub mod util;

/// Browser entry point: set up logging, build the portal and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    use leptos::prelude::*;

    use crate::app::App;

    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    match portal::Portal::from_env() {
        Ok(portal) => leptos::mount::mount_to_body(move || view! { <App portal=portal.clone()/> }),
        Err(e) => tracing::error!(error = %e, "portal startup failed"),
    }
}
