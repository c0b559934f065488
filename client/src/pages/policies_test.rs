use super::*;

#[test]
fn format_premium_groups_thousands() {
    assert_eq!(format_premium(123_456), "1,234.56");
    assert_eq!(format_premium(123_456_789), "1,234,567.89");
}

#[test]
fn format_premium_small_and_negative() {
    assert_eq!(format_premium(0), "0.00");
    assert_eq!(format_premium(5), "0.05");
    assert_eq!(format_premium(99_900), "999.00");
    assert_eq!(format_premium(-1_050), "-10.50");
}

#[test]
fn status_filters_match_query_values() {
    let values: Vec<&str> = STATUS_FILTERS.iter().map(|(value, _)| *value).skip(1).collect();
    let expected: Vec<&str> = [PolicyStatus::Active, PolicyStatus::Pending, PolicyStatus::Expired, PolicyStatus::Cancelled]
        .into_iter()
        .map(PolicyStatus::as_query)
        .collect();
    assert_eq!(values, expected);
    assert_eq!(STATUS_FILTERS[0].0, "");
}

#[test]
fn status_class_marks_active_and_pending() {
    assert_eq!(status_class(PolicyStatus::Active), "badge badge--ok");
    assert_eq!(status_class(PolicyStatus::Pending), "badge badge--warn");
    assert_eq!(status_class(PolicyStatus::Cancelled), "badge badge--muted");
}
