//! Forwards auth events into a [`SessionStore`] for as long as it is kept alive.

use super::AuthProvider;
use crate::stores::SessionStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Running subscription that keeps a [`SessionStore`] in step with an [`AuthProvider`].
///
/// Stopping it (via [`shutdown`](Self::shutdown) or drop) releases the provider
/// subscription exactly once.
pub struct SessionSync {
    handle: Option<JoinHandle<()>>,
}

impl SessionSync {
    /// Subscribes, resolves the initial session, then applies every later event.
    ///
    /// Subscribing first means a sign-in racing the initial check is still seen.
    pub async fn start(session: SessionStore, auth: Arc<dyn AuthProvider>) -> Self {
        let mut subscription = auth.subscribe();
        session.load(auth.as_ref()).await;

        let handle = tokio::spawn(async move {
            info!("Session sync started");
            while let Some(event) = subscription.next().await {
                debug!(?event, "Auth event");
                session.apply(&event);
            }
            info!("Auth event stream closed");
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Stops forwarding and waits until the subscription has been released.
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
            info!("Session sync stopped");
        }
    }
}

impl Drop for SessionSync {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryAuth;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_sync_follows_sign_in_and_out() {
        let auth = Arc::new(MemoryAuth::default());
        let ada = auth.register("ada@example.com", "hunter2");
        let session = SessionStore::new();

        let sync = SessionSync::start(session.clone(), auth.clone()).await;
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());

        let mut rx = session.subscribe();
        auth.sign_in("ada@example.com", "hunter2").await.unwrap();
        timeout(Duration::from_secs(1), rx.wait_for(|s| s.principal.is_some()))
            .await
            .expect("sign-in not observed")
            .unwrap();
        assert_eq!(session.principal(), Some(ada));

        auth.sign_out().await.unwrap();
        timeout(Duration::from_secs(1), rx.wait_for(|s| s.principal.is_none()))
            .await
            .expect("sign-out not observed")
            .unwrap();

        sync.shutdown().await;
        assert_eq!(auth.active_subscriptions(), 0);
    }

    #[tokio::test]
    async fn test_existing_session_is_restored() {
        let auth = Arc::new(MemoryAuth::default());
        let ada = auth.register("ada@example.com", "hunter2");
        auth.sign_in("ada@example.com", "hunter2").await.unwrap();

        let session = SessionStore::new();
        let sync = SessionSync::start(session.clone(), auth.clone()).await;
        assert_eq!(session.principal(), Some(ada));
        assert_eq!(auth.active_subscriptions(), 1);

        drop(sync);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(auth.active_subscriptions(), 0);
    }
}
