//! Route guard decisions and well-known navigation paths.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route applies the same decision table, so it lives here as
//! a pure function. `components::role_guard` re-runs it reactively whenever
//! the session signal changes.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::Role;
use crate::state::session::SessionState;

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const CLIENT_HOME_PATH: &str = "/client/dashboard";
pub const ADMIN_HOME_PATH: &str = "/admin/dashboard";

/// Roles permitted to view a protected region.
pub type AccessRequirement = &'static [Role];

pub const CLIENT_ONLY: AccessRequirement = &[Role::Client];
pub const ADMIN_ONLY: AccessRequirement = &[Role::Admin];
pub const ANY_ROLE: AccessRequirement = &[Role::Client, Role::Admin];

/// Outcome of evaluating a route against the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Session not settled yet; show a placeholder, do not redirect.
    Loading,
    Render,
    RedirectToLogin,
    RedirectToRoleHome(&'static str),
    RedirectToRoot,
}

impl Decision {
    /// Target path for redirect decisions.
    #[must_use]
    pub fn redirect_path(self) -> Option<&'static str> {
        match self {
            Self::Loading | Self::Render => None,
            Self::RedirectToLogin => Some(LOGIN_PATH),
            Self::RedirectToRoleHome(path) => Some(path),
            Self::RedirectToRoot => Some(ROOT_PATH),
        }
    }
}

/// Landing route for a role, if it has one.
#[must_use]
pub fn role_home(role: Role) -> Option<&'static str> {
    match role {
        Role::Client => Some(CLIENT_HOME_PATH),
        Role::Admin => Some(ADMIN_HOME_PATH),
        Role::Unknown => None,
    }
}

/// Decide whether `state` may view a region requiring one of `required`.
#[must_use]
pub fn evaluate(state: &SessionState, required: &[Role]) -> Decision {
    let user = match state {
        SessionState::Uninitialized | SessionState::Loading => return Decision::Loading,
        SessionState::Anonymous => return Decision::RedirectToLogin,
        SessionState::Authenticated(user) => user,
    };

    if required.contains(&user.role) {
        return Decision::Render;
    }
    match role_home(user.role) {
        Some(home) => Decision::RedirectToRoleHome(home),
        None => Decision::RedirectToRoot,
    }
}

/// Where `/` sends the visitor once the session has settled.
#[must_use]
pub fn root_destination(state: &SessionState) -> Option<&'static str> {
    match state {
        SessionState::Uninitialized | SessionState::Loading => None,
        SessionState::Anonymous => Some(LOGIN_PATH),
        SessionState::Authenticated(user) => Some(role_home(user.role).unwrap_or(LOGIN_PATH)),
    }
}
