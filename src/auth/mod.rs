//! # Authentication
//!
//! The seam between the dashboard and whatever issues sessions.
//!
//! - [`AuthProvider`]: current session lookup, sign-in/out and an event stream
//! - [`AuthSubscription`]: a cancellable handle on that stream
//! - [`MemoryAuth`]: in-process provider backed by a credential table
//! - [`SessionSync`]: keeps a [`SessionStore`](crate::stores::SessionStore) current

pub mod memory;
pub mod sync;

pub use memory::MemoryAuth;
pub use sync::SessionSync;

use crate::model::Principal;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// A change in authentication state.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(Option<Principal>),
    SignedOut,
    TokenRefreshed(Option<Principal>),
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("No active session")]
    NotSignedIn,
    #[error("Auth provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The session that is active right now, if any.
    async fn current_session(&self) -> Result<Option<Principal>, AuthError>;

    /// Starts receiving auth events. Events emitted before this call are not replayed.
    fn subscribe(&self) -> AuthSubscription;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

type Release = Box<dyn FnOnce() + Send>;

/// Receiving end of an [`AuthProvider`]'s event stream.
///
/// The provider-side registration is released exactly once: on
/// [`unsubscribe`](Self::unsubscribe) or when the handle is dropped.
pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthEvent>,
    release: Option<Release>,
}

impl AuthSubscription {
    pub fn new(
        receiver: broadcast::Receiver<AuthEvent>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            release: Some(Box::new(release)),
        }
    }

    /// Waits for the next event. `None` once the provider is gone.
    ///
    /// A slow subscriber skips events it fell behind on.
    pub async fn next(&mut self) -> Option<AuthEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Auth subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
            debug!("Auth subscription released");
        }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for AuthSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSubscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_release_runs_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let (_tx, rx) = broadcast::channel(4);
        let counter = released.clone();
        let sub = AuthSubscription::new(rx, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sub.unsubscribe();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_releases() {
        let released = Arc::new(AtomicUsize::new(0));
        let (_tx, rx) = broadcast::channel(4);
        let counter = released.clone();
        {
            let _sub = AuthSubscription::new(rx, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lagged_subscriber_keeps_latest() {
        let (tx, rx) = broadcast::channel(1);
        let mut sub = AuthSubscription::new(rx, || {});

        tx.send(AuthEvent::SignedOut).unwrap();
        tx.send(AuthEvent::SignedIn(None)).unwrap();
        assert_eq!(sub.next().await, Some(AuthEvent::SignedIn(None)));

        drop(tx);
        assert_eq!(sub.next().await, None);
    }
}
