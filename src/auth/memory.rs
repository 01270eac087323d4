//! In-process [`AuthProvider`] used by the demo binary and the tests.

use super::{AuthEvent, AuthError, AuthProvider, AuthSubscription};
use crate::model::Principal;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

struct Account {
    password: String,
    principal: Principal,
}

/// Credential table plus one active session.
pub struct MemoryAuth {
    events: broadcast::Sender<AuthEvent>,
    accounts: Mutex<HashMap<String, Account>>,
    session: Mutex<Option<Principal>>,
    subscribers: Arc<AtomicUsize>,
}

impl MemoryAuth {
    pub fn new(buffer: usize) -> Self {
        let (events, _) = broadcast::channel(buffer.max(1));
        Self {
            events,
            accounts: Mutex::new(HashMap::new()),
            session: Mutex::new(None),
            subscribers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Adds an account and returns its principal. Re-registering an email replaces it.
    pub fn register(&self, email: &str, password: &str) -> Principal {
        let principal = Principal::new(Uuid::new_v4().to_string(), email);
        let account = Account {
            password: password.to_string(),
            principal: principal.clone(),
        };
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(email.to_string(), account);
        principal
    }

    /// Re-announces the active session as a token refresh.
    pub fn refresh(&self) -> Result<(), AuthError> {
        let current = self.current();
        match current {
            Some(principal) => {
                self.emit(AuthEvent::TokenRefreshed(Some(principal)));
                Ok(())
            }
            None => Err(AuthError::NotSignedIn),
        }
    }

    /// Number of subscriptions not yet released.
    pub fn active_subscriptions(&self) -> usize {
        self.subscribers.load(Ordering::SeqCst)
    }

    fn current(&self) -> Option<Principal> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_current(&self, principal: Option<Principal>) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = principal;
    }

    fn emit(&self, event: AuthEvent) {
        // No receivers is fine: nobody is listening yet.
        let _ = self.events.send(event);
    }
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new(16)
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn current_session(&self) -> Result<Option<Principal>, AuthError> {
        Ok(self.current())
    }

    fn subscribe(&self) -> AuthSubscription {
        self.subscribers.fetch_add(1, Ordering::SeqCst);
        let subscribers = self.subscribers.clone();
        AuthSubscription::new(self.events.subscribe(), move || {
            subscribers.fetch_sub(1, Ordering::SeqCst);
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let principal = {
            let accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
            match accounts.get(email) {
                Some(account) if account.password == password => account.principal.clone(),
                _ => {
                    warn!(email, "Sign-in rejected");
                    return Err(AuthError::InvalidCredentials);
                }
            }
        };
        info!(principal = %principal.id, "Signed in");
        self.set_current(Some(principal.clone()));
        self.emit(AuthEvent::SignedIn(Some(principal.clone())));
        Ok(principal)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_current(None);
        info!("Signed out");
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }
}
