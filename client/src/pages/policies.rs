//! Policy list pages for clients and administrators.
//!
//! Both routes render the same paged table; the backend scopes results to the
//! caller, so only the guard's role set differs.

#[cfg(test)]
#[path = "policies_test.rs"]
mod policies_test;

use leptos::prelude::*;

use crate::components::layout::PortalLayout;
use crate::components::role_guard::RoleGuard;
use crate::net::types::{Policy, PolicyStatus};
use crate::pages::list_loader::{alive_flag, spawn_list_load};
use crate::portal::Portal;
use crate::state::cache::POLICIES;
use crate::state::list::{ListQuery, ListState, ListView};
use crate::util::auth::{ADMIN_ONLY, CLIENT_ONLY};

/// Options of the status filter; an empty value means "all".
pub(crate) const STATUS_FILTERS: &[(&str, &str)] = &[
    ("", "All statuses"),
    ("ACTIVE", "Active"),
    ("PENDING", "Pending"),
    ("EXPIRED", "Expired"),
    ("CANCELLED", "Cancelled"),
];

/// Render minor units as `1,234.56`.
pub(crate) fn format_premium(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let units = (abs / 100).to_string();

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{:02}", abs % 100)
}

/// CSS modifier for a status badge.
pub(crate) fn status_class(status: PolicyStatus) -> &'static str {
    match status {
        PolicyStatus::Active => "badge badge--ok",
        PolicyStatus::Pending => "badge badge--warn",
        PolicyStatus::Expired | PolicyStatus::Cancelled => "badge badge--muted",
        PolicyStatus::Unknown => "badge",
    }
}

#[component]
pub fn ClientPoliciesPage() -> impl IntoView {
    view! {
        <RoleGuard roles=CLIENT_ONLY>
            <PortalLayout>
                <PolicyList title="My policies"/>
            </PortalLayout>
        </RoleGuard>
    }
}

#[component]
pub fn AdminPoliciesPage() -> impl IntoView {
    view! {
        <RoleGuard roles=ADMIN_ONLY>
            <PortalLayout>
                <PolicyList title="All policies"/>
            </PortalLayout>
        </RoleGuard>
    }
}

#[component]
fn PolicyList(title: &'static str) -> impl IntoView {
    let portal = expect_context::<Portal>();
    let state = RwSignal::new(ListState::<Policy>::default());
    let alive = alive_flag();

    let load = Callback::new(move |query: ListQuery| {
        spawn_list_load(&portal, POLICIES, state, alive.clone(), query, |api, query| async move {
            api.list_policies(&query).await
        });
    });
    load.run(ListQuery::default());

    let on_filter = move |ev| {
        let value = event_target_value(&ev);
        load.run(state.with_untracked(|s| s.query.with_filter(Some(value))));
    };
    let on_previous = move |_| load.run(state.with_untracked(|s| s.query.with_page(s.query.page.saturating_sub(1))));
    let on_next = move |_| load.run(state.with_untracked(|s| s.query.with_page(s.query.page + 1)));

    view! {
        <section class="list-page">
            <header class="list-page__header">
                <h1>{title}</h1>
                <select class="list-page__filter" on:change=on_filter>
                    {STATUS_FILTERS
                        .iter()
                        .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                        .collect::<Vec<_>>()}
                </select>
            </header>
            {move || {
                state.with(|s| match s.view() {
                    ListView::Loading => view! { <p class="list-page__status">"Loading policies..."</p> }.into_any(),
                    ListView::Error(message) => view! { <p class="list-page__error">{message.to_owned()}</p> }.into_any(),
                    ListView::Empty => view! { <p class="list-page__status">"No policies found."</p> }.into_any(),
                    ListView::Populated(page) => {
                        let rows = page.items.iter().cloned().map(policy_row).collect::<Vec<_>>();
                        view! {
                            <table class="list-table">
                                <thead>
                                    <tr>
                                        <th>"Policy"</th>
                                        <th>"Product"</th>
                                        <th>"Vehicle"</th>
                                        <th>"Status"</th>
                                        <th>"Premium"</th>
                                        <th>"Period"</th>
                                    </tr>
                                </thead>
                                <tbody>{rows}</tbody>
                            </table>
                        }
                        .into_any()
                    }
                })
            }}
            <footer class="pager">
                <button class="btn" on:click=on_previous disabled=move || state.with(|s| s.loading || !s.has_previous())>
                    "Previous"
                </button>
                <span class="pager__position">{move || state.with(|s| s.query.page)}</span>
                <button class="btn" on:click=on_next disabled=move || state.with(|s| s.loading || !s.has_next())>
                    "Next"
                </button>
            </footer>
        </section>
    }
}

fn policy_row(policy: Policy) -> impl IntoView {
    let period = format!("{} to {}", policy.start_date, policy.end_date);
    view! {
        <tr>
            <td>{policy.policy_number}</td>
            <td>{policy.product_name}</td>
            <td>{policy.vehicle.unwrap_or_default()}</td>
            <td><span class=status_class(policy.status)>{policy.status.label()}</span></td>
            <td>{format_premium(policy.premium_cents)}</td>
            <td>{period}</td>
        </tr>
    }
}
