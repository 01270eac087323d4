//! # Session Store
//!
//! Holds the currently authenticated [`Principal`]. The store starts in a loading state
//! until the first session check completes, and is afterwards kept current by
//! [`SessionSync`](crate::auth::SessionSync) forwarding auth events into
//! [`apply`](SessionStore::apply).

use crate::auth::{AuthEvent, AuthProvider};
use crate::model::Principal;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub principal: Option<Principal>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    /// Nothing is known until the first session check returns.
    fn default() -> Self {
        Self {
            principal: None,
            loading: true,
            error: None,
        }
    }
}

/// Observable holder of the current authenticated principal.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.state.borrow().principal.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().principal.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Records `principal` (or its absence) and marks the session as resolved.
    /// A pending `error` is left for the view to show.
    pub fn set_principal(&self, principal: Option<Principal>) {
        self.state.send_modify(|s| {
            s.principal = principal;
            s.loading = false;
        });
    }

    /// Drops the principal and resets every flag.
    pub fn clear_session(&self) {
        self.state.send_modify(|s| {
            s.principal = None;
            s.loading = false;
            s.error = None;
        });
    }

    /// Resolves the initial session from `auth`.
    ///
    /// On failure the previous principal is kept and the message lands in `error`.
    #[instrument(skip_all)]
    pub async fn load(&self, auth: &dyn AuthProvider) {
        match auth.current_session().await {
            Ok(Some(principal)) => {
                info!(principal = %principal.id, "Session restored");
                self.state.send_modify(|s| {
                    s.principal = Some(principal);
                    s.loading = false;
                    s.error = None;
                });
            }
            Ok(None) => {
                info!("No active session");
                self.clear_session();
            }
            Err(e) => {
                warn!(error = %e, "Session check failed");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(e.to_string());
                });
            }
        }
    }

    /// Folds one auth event into the session.
    pub fn apply(&self, event: &AuthEvent) {
        match event {
            AuthEvent::SignedIn(principal) | AuthEvent::TokenRefreshed(principal) => {
                self.set_principal(principal.clone())
            }
            AuthEvent::SignedOut => self.clear_session(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, AuthSubscription};
    use async_trait::async_trait;

    struct FailingAuth;

    #[async_trait]
    impl AuthProvider for FailingAuth {
        async fn current_session(&self) -> Result<Option<Principal>, AuthError> {
            Err(AuthError::Provider("auth service unreachable".into()))
        }

        fn subscribe(&self) -> AuthSubscription {
            let (_tx, rx) = tokio::sync::broadcast::channel(1);
            AuthSubscription::new(rx, || {})
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<Principal, AuthError> {
            Err(AuthError::InvalidCredentials)
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            Ok(())
        }
    }

    #[test]
    fn test_session_starts_loading() {
        let store = SessionStore::new();
        assert!(store.is_loading());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_set_then_clear() {
        let store = SessionStore::new();
        let p = Principal::new("u-1", "ada@example.com");

        store.set_principal(Some(p.clone()));
        assert_eq!(store.principal(), Some(p));
        assert!(!store.is_loading());

        store.clear_session();
        assert_eq!(store.principal(), None);
        assert!(!store.is_loading());
    }

    #[test]
    fn test_apply_events() {
        let store = SessionStore::new();
        let p = Principal::new("u-1", "ada@example.com");

        store.apply(&AuthEvent::SignedIn(Some(p.clone())));
        assert_eq!(store.principal(), Some(p.clone()));

        let refreshed = Principal::new("u-1", "ada@lovelace.dev");
        store.apply(&AuthEvent::TokenRefreshed(Some(refreshed.clone())));
        assert_eq!(store.principal(), Some(refreshed));

        store.apply(&AuthEvent::SignedOut);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_load_error_survives_sign_in_until_sign_out() {
        let store = SessionStore::new();
        store.load(&FailingAuth).await;
        let message = store.snapshot().error;
        assert!(message.is_some());

        let p = Principal::new("u-1", "ada@example.com");
        store.apply(&AuthEvent::SignedIn(Some(p.clone())));
        store.apply(&AuthEvent::TokenRefreshed(Some(p.clone())));
        let state = store.snapshot();
        assert_eq!(state.principal, Some(p));
        assert!(!state.loading);
        assert_eq!(state.error, message);

        store.apply(&AuthEvent::SignedOut);
        assert_eq!(store.snapshot().error, None);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_principal() {
        let store = SessionStore::new();
        let p = Principal::new("u-1", "ada@example.com");
        store.set_principal(Some(p.clone()));

        store.load(&FailingAuth).await;
        let state = store.snapshot();
        assert_eq!(state.principal, Some(p));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Auth provider error: auth service unreachable"));
    }
}
