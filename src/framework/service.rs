//! # Remote Data Service Contract
//!
//! [`DataService`] is the generic request/response API of the hosted store: rows travel
//! as JSON objects addressed by table name. [`TableClient`] wraps it for one
//! [`Record`] type and handles the (de)serialization.

use crate::framework::error::RemoteError;
use crate::framework::query::Query;
use crate::framework::record::Record;
use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Asynchronous access to the hosted relational store.
///
/// Implemented by the in-process [`MemoryService`](crate::framework::memory::MemoryService),
/// the HTTP [`RestService`](crate::framework::rest::RestService) and the
/// [`MockService`](crate::framework::mock::MockService) used in tests.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Returns all rows matching `query`, in the requested order.
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, RemoteError>;

    /// Persists a new row and returns it with the assigned id and timestamps.
    async fn insert(&self, table: &str, row: Value) -> Result<Value, RemoteError>;

    /// Applies `patch` to the row at `id` and returns the updated row.
    async fn update(&self, table: &str, id: &Value, patch: Value) -> Result<Value, RemoteError>;

    /// Removes the row at `id`.
    async fn delete(&self, table: &str, id: &Value) -> Result<(), RemoteError>;

    /// Number of rows matching `query`, without fetching them.
    async fn count(&self, table: &str, query: &Query) -> Result<u64, RemoteError>;
}

/// A typed client for one remote table.
///
/// Cheap to clone: it only holds a shared handle to the service.
pub struct TableClient<T: Record> {
    service: Arc<dyn DataService>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for TableClient<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> TableClient<T> {
    pub fn new(service: Arc<dyn DataService>) -> Self {
        Self {
            service,
            _record: PhantomData,
        }
    }

    pub async fn select(&self, query: &Query) -> Result<Vec<T>, RemoteError> {
        let rows = self.service.select(T::TABLE, query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(RemoteError::from))
            .collect()
    }

    pub async fn insert(&self, draft: &T::Draft) -> Result<T, RemoteError> {
        debug!(table = T::TABLE, ?draft, "Insert");
        let row = serde_json::to_value(draft)?;
        let created = self.service.insert(T::TABLE, row).await?;
        Ok(serde_json::from_value(created)?)
    }

    pub async fn update(&self, id: &T::Id, patch: &T::Patch) -> Result<T, RemoteError> {
        debug!(table = T::TABLE, %id, ?patch, "Update");
        let id = serde_json::to_value(id)?;
        let patch = serde_json::to_value(patch)?;
        let updated = self.service.update(T::TABLE, &id, patch).await?;
        Ok(serde_json::from_value(updated)?)
    }

    pub async fn delete(&self, id: &T::Id) -> Result<(), RemoteError> {
        debug!(table = T::TABLE, %id, "Delete");
        let id = serde_json::to_value(id)?;
        self.service.delete(T::TABLE, &id).await
    }

    pub async fn count(&self, query: &Query) -> Result<u64, RemoteError> {
        self.service.count(T::TABLE, query).await
    }
}
