//! End-to-end access flow: identity provider → reconciler → route decisions.
//!
//! Verifies:
//! - Admin and non-admin sessions resolve the admin route as mount / deny
//! - Signed-out visitors are sent to login, and a live sign-out redirects
//! - A profile fetch that outlives its identity never reaches the session
//! - Re-delivering the same identity does not republish the session

use std::sync::{Arc, Mutex};
use std::time::Duration;

use stockgate_auth::{AccessDenial, Identity, ProfileRecord, Role, Session};
use stockgate_core::IdentityId;
use stockgate_events::{IdentityActions, InMemoryIdentitySource};
use stockgate_infra::{InMemoryProfileStore, ProfileFetchError, SessionScope};
use stockgate_web::{Navigation, Navigator, Route, RouteWatch, menu};

fn id(value: &str) -> IdentityId {
    IdentityId::new(value).unwrap()
}

fn setup() -> (Arc<InMemoryIdentitySource>, Arc<InMemoryProfileStore>) {
    stockgate_web::boot::start_from_env().unwrap();

    let store = Arc::new(InMemoryProfileStore::new());
    store.put(id("u1"), ProfileRecord::new().with_role("admin").with_branch("JKT-01", "Jakarta"));
    (Arc::new(InMemoryIdentitySource::new()), store)
}

#[tokio::test(start_paused = true)]
async fn admin_and_user_see_different_outcomes_for_the_admin_route() {
    let (source, store) = setup();
    let navigator = Navigator::new(Duration::from_secs(3));
    let scope = SessionScope::open(source.as_ref(), store.clone());
    let handle = scope.handle().clone();

    assert_eq!(navigator.resolve("/login", &handle.current()), Navigation::Pending);
    handle.resolved().await;

    source.emit_signed_in(Identity::new(id("u1"), "Siti")).unwrap();
    let session = handle.wait_for(Session::is_authenticated).await.unwrap();
    assert!(session.is_admin());
    assert_eq!(navigator.resolve("/admin", &session), Navigation::Mount(Route::Admin));
    assert_eq!(
        session.profile().unwrap().branch_name.as_deref(),
        Some("Jakarta")
    );

    // u2 has no profile document: default role, no branch.
    source.emit_signed_in(Identity::new(id("u2"), "Budi")).unwrap();
    let session = handle
        .wait_for(|s| s.identity_id() == Some(&id("u2")))
        .await
        .unwrap();
    assert_eq!(session.role(), Some(&Role::USER));
    assert_eq!(session.profile().unwrap().branch_name, None);

    match navigator.resolve("/admin", &session) {
        Navigation::Deny {
            denial,
            redirect_to,
            after,
        } => {
            assert_eq!(
                denial,
                AccessDenial {
                    actual_role: Role::USER,
                    required_role: Role::ADMIN,
                }
            );
            assert_eq!(denial.actual_role_line(), "Your role: user");
            assert_eq!(denial.required_role_line(), "Required role: admin");
            assert_eq!(redirect_to, Route::Home);
            assert_eq!(after, Duration::from_secs(3));
        }
        other => panic!("expected a denial, got {other:?}"),
    }
    assert_eq!(navigator.resolve("/add-item", &session), Navigation::Mount(Route::AddItem));
    assert!(menu(&session, Some(Route::Home)).iter().all(|i| i.label != "Admin Panel"));

    scope.close().await;
}

#[tokio::test(start_paused = true)]
async fn signed_out_visitor_is_sent_to_login() {
    let (source, store) = setup();
    let navigator = Navigator::default();
    let scope = SessionScope::open(source.as_ref(), store);

    let session = scope.handle().resolved().await.unwrap();
    assert_eq!(session, Session::signed_out());
    assert_eq!(navigator.resolve("/", &session), Navigation::Redirect(Route::Login));
    assert_eq!(navigator.resolve("/register", &session), Navigation::Mount(Route::Register));
    assert_eq!(navigator.resolve("/reports", &session), Navigation::NotFound);

    scope.close().await;
}

#[tokio::test(start_paused = true)]
async fn sign_out_while_mounted_redirects_to_login() {
    let (source, store) = setup();
    source
        .add_account("siti@example.com", "rahasia", Identity::new(id("u1"), "Siti"))
        .unwrap();
    let navigator = Navigator::default();
    let scope = SessionScope::open(source.as_ref(), store);
    let handle = scope.handle().clone();
    handle.resolved().await;

    source.sign_in("Siti@Example.com", "rahasia").await.unwrap();
    handle.wait_for(Session::is_authenticated).await.unwrap();

    let mut watch = RouteWatch::new(Route::AddItem, navigator.clone(), handle.subscribe());
    assert_eq!(watch.current(), Navigation::Mount(Route::AddItem));

    source.sign_out().await.unwrap();
    assert_eq!(watch.changed().await, Some(Navigation::Redirect(Route::Login)));
    assert_eq!(navigator.after_sign_out(), Route::Login);

    scope.close().await;
    assert_eq!(watch.changed().await, None);
}

#[tokio::test(start_paused = true)]
async fn late_profile_for_a_signed_out_identity_is_discarded() {
    let (source, store) = setup();
    store.set_latency(id("u1"), Duration::from_millis(100));
    let scope = SessionScope::open(source.as_ref(), store);
    let handle = scope.handle().clone();
    handle.resolved().await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut receiver = handle.subscribe();
    let recorder = {
        let seen = seen.clone();
        tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                let session = receiver.borrow_and_update().clone();
                seen.lock().unwrap().push(session);
            }
        })
    };

    source.emit_signed_in(Identity::new(id("u1"), "Siti")).unwrap();
    source.emit_signed_out().unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;

    assert_eq!(handle.current(), Session::signed_out());
    assert!(seen.lock().unwrap().iter().all(|s| !s.is_authenticated()));

    scope.close().await;
    recorder.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn repeated_identity_event_does_not_republish() {
    let (source, store) = setup();
    let scope = SessionScope::open(source.as_ref(), store.clone());
    let handle = scope.handle().clone();
    handle.resolved().await;

    let identity = Identity::new(id("u1"), "Siti");
    source.emit_signed_in(identity.clone()).unwrap();
    let first = handle.wait_for(Session::is_authenticated).await.unwrap();

    let mut receiver = handle.subscribe();
    receiver.mark_unchanged();
    source.emit_signed_in(identity).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!receiver.has_changed().unwrap());
    assert_eq!(handle.current(), first);

    scope.close().await;
}

#[tokio::test(start_paused = true)]
async fn unreachable_store_falls_back_to_default_role() {
    let (source, store) = setup();
    store.fail_for(id("u1"), ProfileFetchError::Unreachable("timeout".to_string()));
    let scope = SessionScope::open(source.as_ref(), store);
    let handle = scope.handle().clone();
    handle.resolved().await;

    source.emit_signed_in(Identity::new(id("u1"), "Siti")).unwrap();
    let session = handle.wait_for(Session::is_authenticated).await.unwrap();

    assert_eq!(session.role(), Some(&Role::USER));
    assert!(matches!(
        Navigator::default().resolve("/admin", &session),
        Navigation::Deny { .. }
    ));

    scope.close().await;
}
