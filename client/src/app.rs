//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` receives the one [`Portal`] built at startup and exposes two
//! contexts: the portal itself and an `RwSignal<SessionState>` mirroring the
//! session store. In the browser it also starts the background tasks that
//! keep that mirror current:
//!
//! - session bootstrap (`initialize`) on load
//! - the expiry listener reacting to transport 401 events
//! - periodic revalidation of the signed-in user

use leptos::prelude::*;
use leptos_meta::{Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::layout::PRODUCT_NAME;
use crate::pages::dashboard::{AdminHomePage, ClientHomePage, RootPage};
use crate::pages::documents::DocumentsPage;
use crate::pages::login::LoginPage;
use crate::pages::notifications::NotificationsPage;
use crate::pages::policies::{AdminPoliciesPage, ClientPoliciesPage};
use crate::portal::Portal;
#[cfg(feature = "csr")]
use crate::state::session::SessionState;

/// Root application component.
#[component]
pub fn App(portal: Portal) -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(portal.session.state());
    provide_context(session);
    provide_context(portal.clone());

    #[cfg(feature = "csr")]
    start_session_tasks(&portal, session);

    view! {
        <Stylesheet id="leptos" href="/pkg/portal.css"/>
        <Title text=PRODUCT_NAME/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=RootPage/>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=(StaticSegment("client"), StaticSegment("dashboard")) view=ClientHomePage/>
                <Route path=(StaticSegment("client"), StaticSegment("policies")) view=ClientPoliciesPage/>
                <Route path=(StaticSegment("client"), StaticSegment("notifications")) view=NotificationsPage/>
                <Route path=(StaticSegment("client"), StaticSegment("documents")) view=DocumentsPage/>
                <Route path=(StaticSegment("admin"), StaticSegment("dashboard")) view=AdminHomePage/>
                <Route path=(StaticSegment("admin"), StaticSegment("policies")) view=AdminPoliciesPage/>
            </Routes>
        </Router>
    }
}

// =============================================================================
// BACKGROUND TASKS
// =============================================================================

#[cfg(feature = "csr")]
fn start_session_tasks(portal: &Portal, session: RwSignal<SessionState>) {
    use leptos::task::spawn_local;

    use crate::state::session::run_expiry_listener;

    // Mirror store transitions into the reactive signal.
    let mut states = portal.session.subscribe();
    spawn_local(async move {
        loop {
            let state = states.borrow_and_update().clone();
            session.set(state);
            if states.changed().await.is_err() {
                break;
            }
        }
    });

    // Subscribed before bootstrap so a 401 during `initialize` is not missed.
    let events = portal.api.transport().subscribe();
    let cache = portal.cache.clone();
    spawn_local(run_expiry_listener(events, portal.session.clone(), move |path| {
        cache.clear();
        let Some(window) = web_sys::window() else {
            return;
        };
        let location = window.location();
        // A rejected sign-in on the login page keeps its error message.
        if location.pathname().is_ok_and(|current| current == path) {
            return;
        }
        let _ = location.set_href(path);
    }));

    let portal = portal.clone();
    spawn_local(async move {
        portal.session.initialize().await;
        loop {
            gloo_timers::future::sleep(portal.config.revalidate_interval).await;
            if portal.session.state().user().is_none() {
                continue;
            }
            if !portal.session.refresh_current_user().await {
                tracing::info!("session revalidation failed");
            }
        }
    });
}
