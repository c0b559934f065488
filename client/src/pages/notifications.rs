//! Client notifications with read/unread filter and mark-as-read actions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Marking runs through `run_mutation`, which drops every cached notification
//! page on success; the page then reloads its current query from the server.
//! A failed mark leaves the list as it was and shows the server's message.

#[cfg(test)]
#[path = "notifications_test.rs"]
mod notifications_test;

use leptos::prelude::*;

use crate::components::layout::PortalLayout;
use crate::components::role_guard::RoleGuard;
use crate::net::types::Notification;
use crate::pages::list_loader::{alive_flag, spawn_list_load};
use crate::portal::Portal;
use crate::state::cache::NOTIFICATIONS;
use crate::state::list::{ListQuery, ListState, ListView};
use crate::util::auth::CLIENT_ONLY;

pub(crate) const UNREAD_FILTERS: &[(&str, &str)] = &[("", "All"), ("true", "Unread"), ("false", "Read")];

const BADGE_CAP: u64 = 99;

/// Badge text for the unread counter; hidden at zero.
pub(crate) fn unread_badge(count: Option<u64>) -> Option<String> {
    match count {
        None | Some(0) => None,
        Some(n) if n > BADGE_CAP => Some(format!("{BADGE_CAP}+")),
        Some(n) => Some(n.to_string()),
    }
}

/// Whether the "mark all" action has anything to do.
pub(crate) fn can_mark_all(state: &ListState<Notification>) -> bool {
    state.page.as_ref().is_some_and(|page| match page.unread_count {
        Some(count) => count > 0,
        None => page.items.iter().any(|n| !n.read),
    })
}

#[component]
pub fn NotificationsPage() -> impl IntoView {
    view! {
        <RoleGuard roles=CLIENT_ONLY>
            <PortalLayout>
                <NotificationList/>
            </PortalLayout>
        </RoleGuard>
    }
}

/// Marking target.
#[derive(Clone, Debug)]
#[cfg_attr(not(feature = "csr"), allow(dead_code))]
enum Mark {
    One(String),
    All,
}

#[component]
fn NotificationList() -> impl IntoView {
    let portal = expect_context::<Portal>();
    let state = RwSignal::new(ListState::<Notification>::default());
    let action_error = RwSignal::new(None::<String>);
    let marking = RwSignal::new(false);
    let alive = alive_flag();

    let load_portal = portal.clone();
    let load = Callback::new(move |query: ListQuery| {
        spawn_list_load(&load_portal, NOTIFICATIONS, state, alive.clone(), query, |api, query| async move {
            api.list_notifications(&query).await
        });
    });
    load.run(ListQuery::default());

    let mark = Callback::new(move |target: Mark| {
        if marking.get_untracked() {
            return;
        }
        marking.set(true);
        action_error.set(None);

        #[cfg(feature = "csr")]
        {
            let portal = portal.clone();
            leptos::task::spawn_local(async move {
                let api = portal.api.clone();
                let result = crate::state::cache::run_mutation(&portal.cache, NOTIFICATIONS, || async move {
                    match target {
                        Mark::One(id) => api.mark_notification_read(&id).await,
                        Mark::All => api.mark_all_notifications_read().await,
                    }
                })
                .await;
                marking.set(false);
                match result {
                    Ok(()) => load.run(state.get_untracked().query),
                    Err(e) => action_error.set(Some(e.user_message())),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&portal, target);
        }
    });

    let on_filter = move |ev| {
        let value = event_target_value(&ev);
        load.run(state.with_untracked(|s| s.query.with_filter(Some(value))));
    };
    let on_previous = move |_| load.run(state.with_untracked(|s| s.query.with_page(s.query.page.saturating_sub(1))));
    let on_next = move |_| load.run(state.with_untracked(|s| s.query.with_page(s.query.page + 1)));

    view! {
        <section class="list-page">
            <header class="list-page__header">
                <h1>
                    "Notifications"
                    {move || {
                        state
                            .with(|s| unread_badge(s.page.as_ref().and_then(|p| p.unread_count)))
                            .map(|badge| view! { <span class="badge badge--count">{badge}</span> })
                    }}
                </h1>
                <select class="list-page__filter" on:change=on_filter>
                    {UNREAD_FILTERS
                        .iter()
                        .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                        .collect::<Vec<_>>()}
                </select>
                <button
                    class="btn"
                    on:click=move |_| mark.run(Mark::All)
                    disabled=move || marking.get() || !state.with(can_mark_all)
                >
                    "Mark all as read"
                </button>
            </header>
            <Show when=move || action_error.get().is_some()>
                <p class="list-page__error">{move || action_error.get().unwrap_or_default()}</p>
            </Show>
            {move || {
                state.with(|s| match s.view() {
                    ListView::Loading => view! { <p class="list-page__status">"Loading notifications..."</p> }.into_any(),
                    ListView::Error(message) => view! { <p class="list-page__error">{message.to_owned()}</p> }.into_any(),
                    ListView::Empty => view! { <p class="list-page__status">"You're all caught up."</p> }.into_any(),
                    ListView::Populated(page) => {
                        let items = page
                            .items
                            .iter()
                            .cloned()
                            .map(|n| notification_item(n, mark, marking))
                            .collect::<Vec<_>>();
                        view! { <ul class="notification-list">{items}</ul> }.into_any()
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

fn notification_item(notification: Notification, mark: Callback<Mark>, marking: RwSignal<bool>) -> impl IntoView {
    let class = if notification.read { "notification" } else { "notification notification--unread" };
    let unread = !notification.read;
    let id = notification.id;
    view! {
        <li class=class>
            <div class="notification__body">
                <strong>{notification.title}</strong>
                <p>{notification.message}</p>
                <time>{notification.created_at}</time>
            </div>
            <Show when=move || unread>
                {
                    let id = id.clone();
                    view! {
                        <button
                            class="btn btn--small"
                            on:click=move |_| mark.run(Mark::One(id.clone()))
                            disabled=move || marking.get()
                        >
                            "Mark as read"
                        </button>
                    }
                }
            </Show>
        </li>
    }
}
