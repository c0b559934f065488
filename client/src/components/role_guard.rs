//! Route guard that renders its children only for permitted roles.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps every protected page. The decision comes from
//! `util::auth::evaluate` and is recomputed whenever the session signal
//! changes, so a mid-visit logout or expiry redirects without a reload.

#[cfg(test)]
#[path = "role_guard_test.rs"]
mod role_guard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::session::SessionState;
use crate::util::auth::{AccessRequirement, Decision, evaluate};

#[component]
pub fn RoleGuard(roles: AccessRequirement, children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| session.with(|state| evaluate(state, roles)));

    Effect::new(move || {
        if let Some(path) = decision.get().redirect_path() {
            navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    view! {
        <Show
            when=move || decision.get() == Decision::Render
            fallback=move || view! { <div class="page-placeholder">{move || placeholder_text(decision.get())}</div> }
        >
            {children()}
        </Show>
    }
}

/// Text shown in place of guarded content.
pub(crate) fn placeholder_text(decision: Decision) -> &'static str {
    match decision {
        Decision::Loading | Decision::Render => "Loading...",
        _ => "Redirecting...",
    }
}
