//! # Entity Store
//!
//! [`EntityStore<T>`] mirrors one remote table in memory and exposes
//! `fetch_all`/`create`/`update`/`delete`. It is written once and instantiated per
//! [`Record`] type.
//!
//! ## Reconciliation Rules
//!
//! - Every operation sets `loading` on entry and clears it on exit.
//! - `items` only ever changes after the remote call returned success, so it always
//!   reflects acknowledged remote state.
//! - A failure leaves `items` untouched and stores the error's message in `error`.
//!   Errors never cross the store boundary; callers get `None`/`false` instead.
//!
//! ## Observing State
//!
//! State lives in a `tokio::sync::watch` channel. The view layer either reads a
//! [`snapshot`](EntityStore::snapshot) or holds a [`subscribe`](EntityStore::subscribe)d
//! receiver and re-renders whenever it changes.
//!
//! Overlapping calls on the same store are not coordinated: the last response to arrive
//! wins.

use crate::framework::{DataService, Query, Record, RemoteError, TableClient};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

/// Observable state of an [`EntityStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// In-memory mirror of one remote table.
///
/// Cloning yields another handle to the same state.
pub struct EntityStore<T: Record> {
    table: TableClient<T>,
    state: Arc<watch::Sender<StoreState<T>>>,
}

impl<T: Record> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: Record> EntityStore<T> {
    pub fn new(service: Arc<dyn DataService>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            table: TableClient::new(service),
            state: Arc::new(state),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> StoreState<T> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<T> {
        self.state.borrow().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.state.subscribe()
    }

    /// Replaces `items` with every remote row, in the record's display order.
    #[instrument(skip(self), fields(table = T::TABLE))]
    pub async fn fetch_all(&self) {
        self.begin();
        let query = T::embeds()
            .iter()
            .fold(Query::ordered(T::default_order()), |q, resource| q.embed(*resource));
        match self.table.select(&query).await {
            Ok(rows) => {
                info!(count = rows.len(), "Fetched");
                self.state.send_modify(|s| {
                    s.items = rows;
                    s.loading = false;
                    s.error = None;
                });
            }
            Err(e) => self.fail(&e.to_string()),
        }
    }

    /// Persists a new row; on success it is placed into `items` and returned.
    #[instrument(skip(self, draft), fields(table = T::TABLE))]
    pub async fn create(&self, draft: T::Draft) -> Option<T> {
        self.begin();
        if let Err(reason) = T::check_draft(&draft) {
            self.fail(&reason);
            return None;
        }
        match self.table.insert(&draft).await {
            Ok(row) => {
                info!(id = %row.id(), "Created");
                self.state.send_modify(|s| {
                    let at = T::insert_position(&s.items, &row);
                    s.items.insert(at, row.clone());
                    s.loading = false;
                });
                Some(row)
            }
            Err(e) => {
                self.fail(&e.to_string());
                None
            }
        }
    }

    /// Applies `patch` remotely and replaces the local row with the server's copy.
    #[instrument(skip(self, patch), fields(table = T::TABLE))]
    pub async fn update(&self, id: &T::Id, patch: T::Patch) -> Option<T> {
        self.begin();
        if let Err(reason) = T::check_patch(&patch) {
            self.fail(&reason);
            return None;
        }
        match self.table.update(id, &patch).await {
            Ok(mut row) => {
                info!("Updated");
                self.state.send_modify(|s| {
                    if let Some(slot) = s.items.iter_mut().find(|item| item.id() == id) {
                        row.keep_embedded(slot);
                        *slot = row.clone();
                    }
                    s.loading = false;
                });
                Some(row)
            }
            Err(e) => {
                self.fail(&e.to_string());
                None
            }
        }
    }

    /// Removes the row remotely, then locally.
    #[instrument(skip(self), fields(table = T::TABLE))]
    pub async fn delete(&self, id: &T::Id) -> bool {
        self.begin();
        match self.table.delete(id).await {
            Ok(()) => {
                info!("Deleted");
                self.state.send_modify(|s| {
                    s.items.retain(|item| item.id() != id);
                    s.loading = false;
                });
                true
            }
            Err(e) => {
                self.fail(&e.to_string());
                false
            }
        }
    }

    /// Row count matching `query`, straight from the remote service.
    pub async fn count(&self, query: &Query) -> Result<u64, RemoteError> {
        self.table.count(query).await
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    fn fail(&self, message: &str) {
        warn!(table = T::TABLE, error = %message, "Operation failed");
        self.state.send_modify(|s| {
            s.loading = false;
            s.error = Some(message.to_string());
        });
    }
}
