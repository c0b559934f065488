use super::*;
use crate::net::transport::ApiError;
use crate::net::types::Page;

#[test]
fn greeting_uses_first_name() {
    assert_eq!(greeting("Ana Souza"), "Welcome, Ana");
    assert_eq!(greeting("  Bruno "), "Welcome, Bruno");
}

#[test]
fn greeting_without_name() {
    assert_eq!(greeting(""), "Welcome");
    assert_eq!(greeting("   "), "Welcome");
}

#[test]
fn summary_count_follows_read_progress() {
    let mut state = ListState::<u32>::default();
    assert_eq!(summary_count(&state), "...");

    state.begin(ListQuery::default());
    state.finish(&ListQuery::default(), Ok(Page { items: vec![1, 2], total: 12, page: 1, limit: 10, unread_count: None }));
    assert_eq!(summary_count(&state), "12");

    state.begin(ListQuery::default());
    state.finish(&ListQuery::default(), Err(ApiError::Malformed("bad".to_owned())));
    assert_eq!(summary_count(&state), "-");
}
