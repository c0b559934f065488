use super::*;
use crate::util::auth::{ADMIN_HOME_PATH, CLIENT_ONLY, evaluate};

#[test]
fn placeholder_text_while_session_settles() {
    assert_eq!(placeholder_text(Decision::Loading), "Loading...");
    assert_eq!(placeholder_text(evaluate(&SessionState::Uninitialized, CLIENT_ONLY)), "Loading...");
}

#[test]
fn placeholder_text_for_redirects() {
    assert_eq!(placeholder_text(Decision::RedirectToLogin), "Redirecting...");
    assert_eq!(placeholder_text(Decision::RedirectToRoleHome(ADMIN_HOME_PATH)), "Redirecting...");
    assert_eq!(placeholder_text(Decision::RedirectToRoot), "Redirecting...");
}
