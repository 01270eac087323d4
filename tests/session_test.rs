use inventory_sync::auth::{AuthEvent, AuthProvider, MemoryAuth, SessionSync};
use inventory_sync::model::Principal;
use inventory_sync::stores::{SessionState, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

async fn wait_until(session: &SessionStore, check: impl FnMut(&SessionState) -> bool) {
    let mut rx = session.subscribe();
    timeout(Duration::from_secs(1), rx.wait_for(check))
        .await
        .expect("session did not reach expected state")
        .expect("session store dropped");
}

#[test]
fn test_signed_out_clears_any_prior_state() {
    let session = SessionStore::new();
    session.set_principal(Some(Principal::new("u-1", "ada@example.com")));
    session.apply(&AuthEvent::SignedOut);
    assert_eq!(
        session.snapshot(),
        SessionState {
            principal: None,
            loading: false,
            error: None,
        }
    );

    // Still loading, nothing known yet.
    let fresh = SessionStore::new();
    fresh.apply(&AuthEvent::SignedOut);
    assert_eq!(fresh.snapshot(), session.snapshot());
}

#[tokio::test]
async fn test_sync_tracks_full_auth_lifecycle() {
    let auth = Arc::new(MemoryAuth::default());
    let ada = auth.register("ada@example.com", "hunter2");
    let session = SessionStore::new();
    assert!(session.is_loading());

    let sync = SessionSync::start(session.clone(), auth.clone()).await;
    assert_eq!(session.snapshot().loading, false);
    assert_eq!(auth.active_subscriptions(), 1);

    auth.sign_in("ada@example.com", "hunter2").await.unwrap();
    wait_until(&session, |s| s.principal.as_ref() == Some(&ada)).await;

    auth.refresh().unwrap();
    auth.sign_out().await.unwrap();
    wait_until(&session, |s| s.principal.is_none()).await;

    sync.shutdown().await;
    assert_eq!(auth.active_subscriptions(), 0);

    // Events after shutdown no longer reach the store.
    auth.sign_in("ada@example.com", "hunter2").await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_failed_sign_in_leaves_session_alone() {
    let auth = Arc::new(MemoryAuth::default());
    auth.register("ada@example.com", "hunter2");
    let session = SessionStore::new();
    let _sync = SessionSync::start(session.clone(), auth.clone()).await;

    assert!(auth.sign_in("ada@example.com", "nope").await.is_err());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!session.is_authenticated());
    assert_eq!(session.snapshot().error, None);
}
