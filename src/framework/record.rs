//! # Record Trait
//!
//! The `Record` trait defines the contract that every remote row type (Product, Supplier,
//! Location, User) must implement to be mirrored by the generic
//! [`EntityStore`](crate::stores::EntityStore).
//!
//! # Architecture Note
//! By describing each table once (its name, id type, create and update payloads, and
//! display ordering) we write the fetch/create/update/delete reconciliation logic *once*
//! and instantiate it per entity. Associated types keep this type safe: a `ProductDraft`
//! can only ever be sent to the `products` table.

use crate::framework::query::OrderBy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A row of a remote table.
pub trait Record: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Identifier assigned by the remote service. Immutable after creation.
    type Id: Clone + Eq + Hash + Debug + Display + Send + Sync + Serialize + DeserializeOwned;

    /// New-row payload, lacking an id.
    type Draft: Debug + Send + Sync + Serialize;

    /// Partial-field changes. Absent fields must not be serialized.
    type Patch: Debug + Send + Sync + Serialize;

    /// Remote table name (e.g. `"products"`).
    const TABLE: &'static str;

    fn id(&self) -> &Self::Id;

    /// Ordering directive used by `fetch_all`.
    fn default_order() -> OrderBy {
        OrderBy::desc("created_at")
    }

    /// Related rows embedded by `fetch_all`, written `table(col, ...)`.
    fn embeds() -> &'static [&'static str] {
        &[]
    }

    /// Copies embedded data from the local row an update replaces, since write
    /// responses do not carry embeds.
    fn keep_embedded(&mut self, _previous: &Self) {}

    /// Local validation of a new-row payload, run before any remote call.
    fn check_draft(_draft: &Self::Draft) -> Result<(), String> {
        Ok(())
    }

    /// Local validation of an update payload, run before any remote call.
    fn check_patch(_patch: &Self::Patch) -> Result<(), String> {
        Ok(())
    }

    /// Where a freshly created row lands in an ordered collection.
    ///
    /// The default prepends, matching a newest-first ordering.
    fn insert_position(_items: &[Self], _row: &Self) -> usize {
        0
    }
}
