use super::*;

fn hrefs(role: Role) -> Vec<&'static str> {
    nav_items(role).iter().map(|item| item.href).collect()
}

#[test]
fn client_nav_covers_client_sections() {
    assert_eq!(
        hrefs(Role::Client),
        vec![CLIENT_HOME_PATH, "/client/policies", "/client/documents", "/client/notifications"]
    );
}

#[test]
fn admin_nav_starts_at_admin_home() {
    assert_eq!(hrefs(Role::Admin), vec![ADMIN_HOME_PATH, "/admin/policies"]);
}

#[test]
fn unknown_role_gets_no_navigation() {
    assert!(nav_items(Role::Unknown).is_empty());
    assert_eq!(role_label(Role::Unknown), "");
}

#[test]
fn nav_sets_do_not_leak_across_roles() {
    assert!(hrefs(Role::Client).iter().all(|h| !h.starts_with("/admin")));
    assert!(hrefs(Role::Admin).iter().all(|h| !h.starts_with("/client")));
}
