//! Client documents: paged list filtered by kind, with download links.
//!
//! Download URLs are short-lived, so they are requested on click and opened
//! in a new tab instead of being rendered into the list.

#[cfg(test)]
#[path = "documents_test.rs"]
mod documents_test;

use leptos::prelude::*;

use crate::components::layout::PortalLayout;
use crate::components::role_guard::RoleGuard;
use crate::net::types::Document;
use crate::pages::list_loader::{alive_flag, spawn_list_load};
use crate::portal::Portal;
use crate::state::cache::DOCUMENTS;
use crate::state::list::{ListQuery, ListState, ListView};
use crate::util::auth::CLIENT_ONLY;

pub(crate) const KIND_FILTERS: &[(&str, &str)] = &[
    ("", "All documents"),
    ("POLICY", "Policies"),
    ("CLAIM", "Claims"),
    ("INVOICE", "Invoices"),
];

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;

/// Human-readable file size; `-` when unknown.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn format_size(bytes: Option<u64>) -> String {
    match bytes {
        None => "-".to_owned(),
        Some(b) if b < KIB => format!("{b} B"),
        Some(b) if b < MIB => format!("{:.1} KB", b as f64 / KIB as f64),
        Some(b) => format!("{:.1} MB", b as f64 / MIB as f64),
    }
}

/// Display label of a document kind.
pub(crate) fn kind_label(kind: &str) -> &str {
    KIND_FILTERS
        .iter()
        .skip(1)
        .find(|(value, _)| value.eq_ignore_ascii_case(kind))
        .map_or(kind, |(_, label)| *label)
}

#[component]
pub fn DocumentsPage() -> impl IntoView {
    view! {
        <RoleGuard roles=CLIENT_ONLY>
            <PortalLayout>
                <DocumentList/>
            </PortalLayout>
        </RoleGuard>
    }
}

#[component]
fn DocumentList() -> impl IntoView {
    let portal = expect_context::<Portal>();
    let state = RwSignal::new(ListState::<Document>::default());
    let download_error = RwSignal::new(None::<String>);
    let alive = alive_flag();

    let load_portal = portal.clone();
    let load = Callback::new(move |query: ListQuery| {
        spawn_list_load(&load_portal, DOCUMENTS, state, alive.clone(), query, |api, query| async move {
            api.list_documents(&query).await
        });
    });
    load.run(ListQuery::default());

    let download = Callback::new(move |id: String| {
        download_error.set(None);

        #[cfg(feature = "csr")]
        {
            let api = portal.api.clone();
            leptos::task::spawn_local(async move {
                match api.document_download(&id).await {
                    Ok(link) => {
                        let opened = web_sys::window().map(|w| w.open_with_url_and_target(&link.url, "_blank"));
                        if !matches!(opened, Some(Ok(_))) {
                            tracing::warn!(document = %id, "could not open download window");
                            download_error.set(Some("Could not open the download.".to_owned()));
                        }
                    }
                    Err(e) => download_error.set(Some(e.user_message())),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&portal, id);
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
                <h1>"Documents"</h1>
                <select class="list-page__filter" on:change=on_filter>
                    {KIND_FILTERS
                        .iter()
                        .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                        .collect::<Vec<_>>()}
                </select>
            </header>
            <Show when=move || download_error.get().is_some()>
                <p class="list-page__error">{move || download_error.get().unwrap_or_default()}</p>
            </Show>
            {move || {
                state.with(|s| match s.view() {
                    ListView::Loading => view! { <p class="list-page__status">"Loading documents..."</p> }.into_any(),
                    ListView::Error(message) => view! { <p class="list-page__error">{message.to_owned()}</p> }.into_any(),
                    ListView::Empty => view! { <p class="list-page__status">"No documents yet."</p> }.into_any(),
                    ListView::Populated(page) => {
                        let rows = page.items.iter().cloned().map(|d| document_row(d, download)).collect::<Vec<_>>();
                        view! {
                            <table class="list-table">
                                <thead>
                                    <tr>
                                        <th>"File"</th>
                                        <th>"Type"</th>
                                        <th>"Size"</th>
                                        <th>"Uploaded"</th>
                                        <th></th>
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

fn document_row(document: Document, download: Callback<String>) -> impl IntoView {
    let kind = kind_label(&document.kind).to_owned();
    let id = document.id;
    view! {
        <tr>
            <td>{document.file_name}</td>
            <td>{kind}</td>
            <td>{format_size(document.size_bytes)}</td>
            <td>{document.uploaded_at}</td>
            <td>
                <button class="btn btn--small" on:click=move |_| download.run(id.clone())>
                    "Download"
                </button>
            </td>
        </tr>
    }
}
