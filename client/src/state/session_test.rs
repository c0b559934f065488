use super::*;
use crate::net::test_support::{self, ScriptedBackend};
use crate::net::transport::{AUTH_EVENT_CAPACITY, Method, Transport, TransportError};
use crate::net::types::Role;
use crate::util::persistence::{MemoryStore, load_json};
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

struct Harness {
    backend: Arc<ScriptedBackend>,
    store: Arc<MemoryStore>,
    transport: Arc<Transport>,
    session: Arc<SessionStore>,
}

fn harness() -> Harness {
    let backend = ScriptedBackend::new();
    let store = Arc::new(MemoryStore::new());
    let transport = test_support::transport(&backend, &store);
    let session = Arc::new(SessionStore::new(Api::new(transport.clone())));
    backend.observe(session.subscribe());
    Harness { backend, store, transport, session }
}

#[tokio::test]
async fn starts_uninitialized() {
    let h = harness();
    assert_eq!(h.session.state(), SessionState::Uninitialized);
    assert!(h.session.snapshot().is_loading);
}

#[tokio::test]
async fn initialize_with_valid_token_authenticates() {
    let h = harness();
    let me = test_support::user(Role::Client);
    h.store.set(TOKEN_KEY, "tok");
    h.backend.push_json(200, &test_support::ok(test_support::user_json(&me)));

    h.session.initialize().await;

    assert_eq!(h.backend.observed(), vec![SessionState::Loading]);
    assert_eq!(h.session.state(), SessionState::Authenticated(me.clone()));
    assert_eq!(load_json::<User>(h.store.as_ref(), USER_KEY), Some(me));
    let requests = h.backend.requests();
    assert_eq!(requests[0].url, "http://portal.test/api/auth/me");
    assert_eq!(requests[0].header("Authorization"), Some("Bearer tok"));
}

#[tokio::test]
async fn initialize_with_rejected_token_goes_anonymous() {
    let h = harness();
    h.store.set(TOKEN_KEY, "revoked");
    h.backend.push_json(401, &json!({ "success": false, "message": "invalid token" }));

    h.session.initialize().await;

    assert_eq!(h.backend.observed(), vec![SessionState::Loading]);
    assert_eq!(h.session.state(), SessionState::Anonymous);
    assert_eq!(h.store.get(TOKEN_KEY), None);
}

#[tokio::test]
async fn initialize_treats_network_failure_as_anonymous() {
    let h = harness();
    h.store.set(TOKEN_KEY, "tok");
    h.backend.push_error(TransportError::Timeout(Duration::from_secs(10)));

    h.session.initialize().await;

    assert_eq!(h.session.state(), SessionState::Anonymous);
    assert_eq!(h.store.get(TOKEN_KEY), None);
}

#[tokio::test]
async fn initialize_without_token_skips_validation() {
    let h = harness();
    h.store.set(USER_KEY, "{\"stale\":true}");

    h.session.initialize().await;

    assert!(h.backend.requests().is_empty());
    assert_eq!(h.session.state(), SessionState::Anonymous);
    assert_eq!(h.store.get(USER_KEY), None);
}

#[tokio::test]
async fn login_persists_without_round_trip() {
    let h = harness();
    let me = test_support::user(Role::Admin);

    h.session.login("fresh", me.clone()).await;

    assert!(h.backend.requests().is_empty());
    assert_eq!(h.session.state(), SessionState::Authenticated(me.clone()));
    let snapshot = h.session.snapshot();
    assert!(snapshot.is_authenticated);
    assert_eq!(snapshot.credential_token.as_deref(), Some("fresh"));
    assert_eq!(snapshot.current_user, Some(me));
}

#[tokio::test]
async fn login_supersedes_previous_token() {
    let h = harness();
    h.session.login("first", test_support::user(Role::Client)).await;
    h.session.login("second", test_support::user(Role::Admin)).await;

    assert_eq!(h.store.get(TOKEN_KEY).as_deref(), Some("second"));
    assert_eq!(h.session.state().user().map(|u| u.role), Some(Role::Admin));
}

#[tokio::test]
async fn login_then_logout_round_trips_to_empty() {
    let h = harness();
    h.session.login("tok", test_support::user(Role::Client)).await;

    h.session.logout().await;

    assert_eq!(h.session.state(), SessionState::Anonymous);
    assert_eq!(h.store.get(TOKEN_KEY), None);
    assert_eq!(h.store.get(USER_KEY), None);
    assert!(!h.session.snapshot().is_authenticated);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let h = harness();
    h.session.logout().await;
    h.session.logout().await;
    assert_eq!(h.session.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn refresh_updates_user() {
    let h = harness();
    let mut me = test_support::user(Role::Client);
    h.session.login("tok", me.clone()).await;
    me.name = "Ana Maria".to_owned();
    h.backend.push_json(200, &test_support::ok(test_support::user_json(&me)));

    assert!(h.session.refresh_current_user().await);

    assert_eq!(h.session.state(), SessionState::Authenticated(me.clone()));
    assert_eq!(load_json::<User>(h.store.as_ref(), USER_KEY), Some(me));
}

#[tokio::test]
async fn refresh_failure_goes_anonymous_without_navigation() {
    let h = harness();
    h.session.login("tok", test_support::user(Role::Client)).await;
    h.backend.push_json(500, &json!({ "success": false, "message": "boom" }));

    assert!(!h.session.refresh_current_user().await);

    assert_eq!(h.session.state(), SessionState::Anonymous);
    assert_eq!(h.store.get(TOKEN_KEY), None);
}

#[tokio::test]
async fn watchers_see_transitions() {
    let h = harness();
    let mut rx = h.session.subscribe();
    h.session.login("tok", test_support::user(Role::Client)).await;
    assert!(rx.has_changed().expect("sender alive"));
    assert!(matches!(*rx.borrow_and_update(), SessionState::Authenticated(_)));
}

#[tokio::test]
async fn unauthorized_response_expires_session_and_navigates_once() {
    let h = harness();
    h.session.login("tok", test_support::user(Role::Client)).await;
    let (nav_tx, mut nav_rx) = mpsc::unbounded_channel();
    let listener = tokio::spawn(run_expiry_listener(h.transport.subscribe(), h.session.clone(), move |path| {
        let _ = nav_tx.send(path);
    }));
    h.backend.push_json(401, &json!({ "success": false }));

    let err = h
        .transport
        .send(Method::Get, "/notifications", None, &[])
        .await
        .expect_err("401 rejects");
    assert!(err.is_unauthorized());

    let path = timeout(Duration::from_millis(500), nav_rx.recv())
        .await
        .expect("navigation timed out")
        .expect("navigation");
    assert_eq!(path, LOGIN_PATH);
    assert_eq!(h.session.state(), SessionState::Anonymous);
    assert_eq!(h.store.get(TOKEN_KEY), None);
    assert_eq!(h.store.get(USER_KEY), None);

    tokio::task::yield_now().await;
    assert!(nav_rx.try_recv().is_err());
    listener.abort();
}

async fn next_navigation(nav_rx: &mut mpsc::UnboundedReceiver<&'static str>) -> &'static str {
    timeout(Duration::from_millis(500), nav_rx.recv())
        .await
        .expect("navigation timed out")
        .expect("navigation")
}

#[tokio::test]
async fn each_unauthorized_response_navigates_once() {
    let h = harness();
    h.session.login("tok", test_support::user(Role::Client)).await;
    let (nav_tx, mut nav_rx) = mpsc::unbounded_channel();
    let listener = tokio::spawn(run_expiry_listener(h.transport.subscribe(), h.session.clone(), move |path| {
        let _ = nav_tx.send(path);
    }));
    h.backend.push_json(401, &json!({ "success": false }));
    h.backend.push_json(401, &json!({ "success": false }));

    for path in ["/policies", "/documents"] {
        let err = h.transport.send(Method::Get, path, None, &[]).await.expect_err("401 rejects");
        assert!(err.is_unauthorized());
    }

    assert_eq!(next_navigation(&mut nav_rx).await, LOGIN_PATH);
    assert_eq!(next_navigation(&mut nav_rx).await, LOGIN_PATH);
    tokio::task::yield_now().await;
    assert!(nav_rx.try_recv().is_err());
    assert_eq!(h.session.state(), SessionState::Anonymous);
    listener.abort();
}

#[tokio::test]
async fn lagged_listener_still_expires_and_navigates() {
    let h = harness();
    h.session.login("tok", test_support::user(Role::Admin)).await;
    let events = h.transport.subscribe();
    let overflow = AUTH_EVENT_CAPACITY + 3;
    for _ in 0..overflow {
        h.backend.push_raw(401, "");
        let _ = h.transport.send(Method::Get, "/auth/me", None, &[]).await;
    }

    let (nav_tx, mut nav_rx) = mpsc::unbounded_channel();
    let listener = tokio::spawn(run_expiry_listener(events, h.session.clone(), move |path| {
        let _ = nav_tx.send(path);
    }));

    // One expiry for the lag itself, then one per event still buffered.
    for _ in 0..=AUTH_EVENT_CAPACITY {
        assert_eq!(next_navigation(&mut nav_rx).await, LOGIN_PATH);
    }
    tokio::task::yield_now().await;
    assert!(nav_rx.try_recv().is_err());
    assert_eq!(h.session.state(), SessionState::Anonymous);
    assert!(!listener.is_finished());
    listener.abort();
}

#[tokio::test]
async fn listener_stops_when_transport_is_dropped() {
    let h = harness();
    h.session.login("tok", test_support::user(Role::Client)).await;

    // A transport the session does not hold, so dropping it closes the channel.
    let other_backend = ScriptedBackend::new();
    let other_store = Arc::new(MemoryStore::new());
    let source = test_support::transport(&other_backend, &other_store);
    let events = source.subscribe();
    other_backend.push_raw(401, "");
    let _ = source.send(Method::Get, "/documents", None, &[]).await;
    drop(source);

    let navigations = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = navigations.clone();
    timeout(
        Duration::from_millis(500),
        run_expiry_listener(events, h.session.clone(), move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }),
    )
    .await
    .expect("listener should finish once the channel closes");

    assert_eq!(navigations.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(h.session.state(), SessionState::Anonymous);
}
