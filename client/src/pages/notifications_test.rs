use super::*;
use crate::net::types::Page;

fn notification(id: &str, read: bool) -> Notification {
    Notification {
        id: id.to_owned(),
        title: "Payment received".to_owned(),
        message: "Thanks!".to_owned(),
        read,
        created_at: "2024-05-01T10:00:00Z".to_owned(),
    }
}

fn loaded(items: Vec<Notification>, unread_count: Option<u64>) -> ListState<Notification> {
    let mut state = ListState::default();
    state.begin(ListQuery::default());
    let total = items.len() as u64;
    state.finish(&ListQuery::default(), Ok(Page { items, total, page: 1, limit: 10, unread_count }));
    state
}

#[test]
fn unread_badge_hidden_at_zero() {
    assert_eq!(unread_badge(None), None);
    assert_eq!(unread_badge(Some(0)), None);
}

#[test]
fn unread_badge_caps_large_counts() {
    assert_eq!(unread_badge(Some(7)), Some("7".to_owned()));
    assert_eq!(unread_badge(Some(99)), Some("99".to_owned()));
    assert_eq!(unread_badge(Some(100)), Some("99+".to_owned()));
}

#[test]
fn can_mark_all_prefers_server_count() {
    assert!(can_mark_all(&loaded(vec![notification("n1", true)], Some(3))));
    assert!(!can_mark_all(&loaded(vec![notification("n1", false)], Some(0))));
}

#[test]
fn can_mark_all_falls_back_to_visible_items() {
    assert!(can_mark_all(&loaded(vec![notification("n1", true), notification("n2", false)], None)));
    assert!(!can_mark_all(&loaded(vec![notification("n1", true)], None)));
    assert!(!can_mark_all(&ListState::default()));
}

#[test]
fn unread_filters_start_with_all() {
    assert_eq!(UNREAD_FILTERS[0], ("", "All"));
    assert!(UNREAD_FILTERS.iter().any(|(value, _)| *value == "true"));
}
