use super::*;

#[test]
fn validate_login_input_trims_email_only() {
    assert_eq!(
        validate_login_input("  ana@example.com ", " secret "),
        Ok(LoginRequest { email: "ana@example.com".to_owned(), password: " secret ".to_owned() })
    );
}

#[test]
fn validate_login_input_requires_both_fields() {
    assert_eq!(validate_login_input("   ", "pw"), Err("Enter your email and password."));
    assert_eq!(validate_login_input("ana@example.com", ""), Err("Enter your email and password."));
}

#[test]
fn validate_login_input_rejects_email_without_at() {
    assert_eq!(validate_login_input("ana.example.com", "pw"), Err("Enter a valid email address."));
}
