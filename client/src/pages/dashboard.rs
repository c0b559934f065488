//! Role landing pages and the `/` dispatcher.
//!
//! SYSTEM CONTEXT
//! ==============
//! `/` waits for the session to settle, then forwards to login or the role
//! home. The two home pages show headline counts read through the same cached
//! list endpoints the section pages use, so opening a section right after the
//! dashboard is served from cache.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::layout::{NavItem, PortalLayout, nav_items};
use crate::components::role_guard::RoleGuard;
use crate::net::types::{Notification, Policy, PolicyStatus, Role};
use crate::pages::list_loader::{alive_flag, spawn_list_load};
use crate::portal::Portal;
use crate::state::cache::{NOTIFICATIONS, POLICIES};
use crate::state::list::{ListQuery, ListState};
use crate::state::session::SessionState;
use crate::util::auth::{ADMIN_ONLY, CLIENT_ONLY, root_destination};

/// Heading for a signed-in user's home page.
pub(crate) fn greeting(name: &str) -> String {
    let first = name.split_whitespace().next().unwrap_or_default();
    if first.is_empty() { "Welcome".to_owned() } else { format!("Welcome, {first}") }
}

/// Count shown on a summary card; `None` until the read completes.
pub(crate) fn summary_count<T>(state: &ListState<T>) -> String {
    match (&state.page, &state.error) {
        (_, Some(_)) => "-".to_owned(),
        (Some(page), None) => page.total.to_string(),
        (None, None) => "...".to_owned(),
    }
}

#[component]
pub fn RootPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let navigate = use_navigate();

    Effect::new(move || {
        if let Some(path) = session.with(root_destination) {
            navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    view! { <div class="page-placeholder">"Loading..."</div> }
}

#[component]
pub fn ClientHomePage() -> impl IntoView {
    view! {
        <RoleGuard roles=CLIENT_ONLY>
            <PortalLayout>
                <ClientHome/>
            </PortalLayout>
        </RoleGuard>
    }
}

#[component]
pub fn AdminHomePage() -> impl IntoView {
    view! {
        <RoleGuard roles=ADMIN_ONLY>
            <PortalLayout>
                <AdminHome/>
            </PortalLayout>
        </RoleGuard>
    }
}

#[component]
fn ClientHome() -> impl IntoView {
    let portal = expect_context::<Portal>();
    let session = expect_context::<RwSignal<SessionState>>();
    let alive = alive_flag();

    let active = RwSignal::new(ListState::<Policy>::default());
    let unread = RwSignal::new(ListState::<Notification>::default());

    spawn_list_load(
        &portal,
        POLICIES,
        active,
        alive.clone(),
        ListQuery::default().with_filter(Some(PolicyStatus::Active.as_query().to_owned())),
        |api, query| async move { api.list_policies(&query).await },
    );
    spawn_list_load(
        &portal,
        NOTIFICATIONS,
        unread,
        alive,
        ListQuery::default().with_filter(Some("true".to_owned())),
        |api, query| async move { api.list_notifications(&query).await },
    );

    view! {
        <section class="dashboard">
            <h1 class="dashboard__title">
                {move || session.with(|s| greeting(s.user().map_or("", |u| u.name.as_str())))}
            </h1>
            <div class="dashboard__cards">
                <SummaryCard label="Active policies" href="/client/policies" value=Signal::derive(move || active.with(summary_count))/>
                <SummaryCard label="Unread notifications" href="/client/notifications" value=Signal::derive(move || unread.with(summary_count))/>
            </div>
            <QuickLinks items=nav_items(Role::Client)/>
        </section>
    }
}

#[component]
fn AdminHome() -> impl IntoView {
    let portal = expect_context::<Portal>();
    let session = expect_context::<RwSignal<SessionState>>();
    let alive = alive_flag();

    let all = RwSignal::new(ListState::<Policy>::default());
    let pending = RwSignal::new(ListState::<Policy>::default());

    spawn_list_load(&portal, POLICIES, all, alive.clone(), ListQuery::default(), |api, query| async move {
        api.list_policies(&query).await
    });
    spawn_list_load(
        &portal,
        POLICIES,
        pending,
        alive,
        ListQuery::default().with_filter(Some(PolicyStatus::Pending.as_query().to_owned())),
        |api, query| async move { api.list_policies(&query).await },
    );

    view! {
        <section class="dashboard">
            <h1 class="dashboard__title">
                {move || session.with(|s| greeting(s.user().map_or("", |u| u.name.as_str())))}
            </h1>
            <div class="dashboard__cards">
                <SummaryCard label="Policies" href="/admin/policies" value=Signal::derive(move || all.with(summary_count))/>
                <SummaryCard label="Pending review" href="/admin/policies" value=Signal::derive(move || pending.with(summary_count))/>
            </div>
            <QuickLinks items=nav_items(Role::Admin)/>
        </section>
    }
}

#[component]
fn SummaryCard(label: &'static str, href: &'static str, value: Signal<String>) -> impl IntoView {
    view! {
        <a class="summary-card" href=href>
            <span class="summary-card__value">{move || value.get()}</span>
            <span class="summary-card__label">{label}</span>
        </a>
    }
}

#[component]
fn QuickLinks(items: &'static [NavItem]) -> impl IntoView {
    view! {
        <ul class="quick-links">
            {items
                .iter()
                .skip(1)
                .map(|item| view! { <li><a href=item.href>{item.label}</a></li> })
                .collect::<Vec<_>>()}
        </ul>
    }
}
