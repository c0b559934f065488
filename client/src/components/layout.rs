//! Authenticated shell: role-aware sidebar plus a topbar with sign-out.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages render inside `PortalLayout` after `RoleGuard` admits them, so the
//! session signal always holds a user here. Navigation entries depend only on
//! that user's role.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::types::Role;
use crate::portal::Portal;
use crate::state::session::SessionState;
use crate::util::auth::{ADMIN_HOME_PATH, CLIENT_HOME_PATH, LOGIN_PATH};

pub const PRODUCT_NAME: &str = "AutoSeguro";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

const CLIENT_NAV: &[NavItem] = &[
    NavItem { label: "Dashboard", href: CLIENT_HOME_PATH },
    NavItem { label: "Policies", href: "/client/policies" },
    NavItem { label: "Documents", href: "/client/documents" },
    NavItem { label: "Notifications", href: "/client/notifications" },
];

const ADMIN_NAV: &[NavItem] = &[
    NavItem { label: "Dashboard", href: ADMIN_HOME_PATH },
    NavItem { label: "Policies", href: "/admin/policies" },
];

/// Sidebar entries for `role`.
pub fn nav_items(role: Role) -> &'static [NavItem] {
    match role {
        Role::Client => CLIENT_NAV,
        Role::Admin => ADMIN_NAV,
        Role::Unknown => &[],
    }
}

/// Short label for the topbar role chip.
pub(crate) fn role_label(role: Role) -> &'static str {
    match role {
        Role::Client => "Client",
        Role::Admin => "Administrator",
        Role::Unknown => "",
    }
}

#[component]
pub fn PortalLayout(children: Children) -> impl IntoView {
    view! {
        <div class="portal-layout">
            <Sidebar/>
            <div class="portal-layout__main">
                <Topbar/>
                <main class="portal-layout__content">{children()}</main>
            </div>
        </div>
    }
}

#[component]
fn Sidebar() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let items = move || session.with(|s| s.user().map_or(&[][..], |user| nav_items(user.role)));

    view! {
        <nav class="sidebar">
            <span class="sidebar__brand">{PRODUCT_NAME}</span>
            <ul class="sidebar__items">
                {move || {
                    items()
                        .iter()
                        .map(|item| {
                            view! {
                                <li>
                                    <a class="sidebar__link" href=item.href>{item.label}</a>
                                </li>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </ul>
        </nav>
    }
}

#[component]
fn Topbar() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let portal = expect_context::<Portal>();
    let navigate = use_navigate();
    let busy = RwSignal::new(false);

    let user_name = move || session.with(|s| s.user().map(|u| u.name.clone()).unwrap_or_default());
    let user_role = move || session.with(|s| s.user().map_or("", |u| role_label(u.role)));

    let on_logout = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let portal = portal.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                portal.sign_out().await;
                busy.set(false);
                navigate(LOGIN_PATH, NavigateOptions { replace: true, ..NavigateOptions::default() });
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&portal, &navigate, LOGIN_PATH, NavigateOptions::default());
        }
    };

    view! {
        <header class="topbar">
            <div class="topbar__user">
                <span class="topbar__name">{user_name}</span>
                <span class="topbar__role">{user_role}</span>
            </div>
            <button class="btn topbar__logout" on:click=on_logout disabled=move || busy.get()>
                "Sign out"
            </button>
        </header>
    }
}
