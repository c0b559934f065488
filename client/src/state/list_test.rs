use super::*;
use crate::net::transport::TransportError;
use std::time::Duration;

fn page(items: Vec<u32>, total: u64) -> Page<u32> {
    Page { items, total, page: 1, limit: DEFAULT_PAGE_SIZE, unread_count: None }
}

#[test]
fn fresh_state_renders_loading() {
    let state = ListState::<u32>::default();
    assert_eq!(state.view(), ListView::Loading);
}

#[test]
fn empty_page_renders_empty() {
    let mut state = ListState::default();
    state.begin(ListQuery::default());
    state.finish(&ListQuery::default(), Ok(page(Vec::new(), 0)));
    assert!(!state.loading);
    assert_eq!(state.view(), ListView::Empty);
}

#[test]
fn populated_page_renders_items() {
    let mut state = ListState::default();
    state.finish(&ListQuery::default(), Ok(page(vec![1, 2], 2)));
    assert!(matches!(state.view(), ListView::Populated(p) if p.items == vec![1, 2]));
}

#[test]
fn error_keeps_previous_page_but_renders_error() {
    let mut state = ListState::default();
    state.finish(&ListQuery::default(), Ok(page(vec![1], 1)));
    state.begin(ListQuery::default().with_page(2));
    state.finish(&ListQuery::default().with_page(2), Err(ApiError::Transport(TransportError::Timeout(Duration::from_secs(10)))));
    assert_eq!(state.view(), ListView::Error("The server took too long to respond."));
    assert!(state.page.is_some());
}

#[test]
fn begin_clears_previous_error() {
    let mut state = ListState::<u32>::default();
    state.finish(&ListQuery::default(), Err(ApiError::Malformed("x".to_owned())));
    state.begin(ListQuery::default());
    assert!(state.loading);
    assert_eq!(state.error, None);
}

#[test]
fn with_filter_resets_page_and_drops_blank() {
    let query = ListQuery::default().with_page(3);
    let filtered = query.with_filter(Some("ACTIVE".to_owned()));
    assert_eq!(filtered.page, 1);
    assert_eq!(filtered.filter.as_deref(), Some("ACTIVE"));
    assert_eq!(query.with_filter(Some(String::new())).filter, None);
}

#[test]
fn with_page_clamps_to_first() {
    assert_eq!(ListQuery::default().with_page(0).page, 1);
}

#[test]
fn keys_differ_by_parameters() {
    let base = ListQuery::default();
    assert_ne!(base.key("policies"), base.with_page(2).key("policies"));
    assert_ne!(base.key("policies"), base.key("documents"));
    assert_eq!(base.key("policies"), ListQuery::default().key("policies"));
}

#[test]
fn pagination_flags() {
    let mut state = ListState::default();
    state.finish(&ListQuery::default(), Ok(page(vec![1], 25)));
    assert!(!state.has_previous());
    assert!(state.has_next());
    state.query = state.query.with_page(3);
    assert!(state.has_previous());
    assert!(!state.has_next());
}

#[test]
fn finish_for_superseded_query_is_dropped() {
    let all = ListQuery::default();
    let active = all.with_filter(Some("ACTIVE".to_owned()));
    let mut state = ListState::default();
    state.begin(all.clone());
    state.begin(active.clone());

    assert!(!state.finish(&all, Ok(page(vec![1, 2, 3], 3))));
    assert!(state.loading);
    assert_eq!(state.view(), ListView::Loading);

    assert!(state.finish(&active, Ok(page(vec![2], 1))));
    assert!(!state.loading);
    assert!(matches!(state.view(), ListView::Populated(p) if p.items == vec![2]));
}

#[test]
fn stale_error_does_not_replace_current_page() {
    let first = ListQuery::default();
    let second = first.with_page(2);
    let mut state = ListState::default();
    state.begin(first.clone());
    state.begin(second.clone());
    state.finish(&second, Ok(page(vec![11], 12)));

    assert!(!state.finish(&first, Err(ApiError::Malformed("late".to_owned()))));
    assert_eq!(state.error, None);
    assert!(matches!(state.view(), ListView::Populated(p) if p.items == vec![11]));
}
