//! Generic plumbing between entity stores and the Remote Data Service.
//!
//! # Main Components
//!
//! - [`Record`] - Trait that remote row types implement to be mirrored by a store
//! - [`DataService`] - The request/response contract of the hosted store
//! - [`TableClient`] - Typed access to one table
//! - [`Query`] - Conditions and ordering for `select`/`count`
//! - [`RemoteError`] - The error object every remote call may return
//!
//! # Backends
//!
//! - [`memory`] - In-process table actors
//! - [`rest`] - PostgREST over HTTP
//! - [`mock`] - Scripted responses for tests

pub mod error;
pub mod memory;
pub mod mock;
pub mod query;
pub mod record;
pub mod rest;
pub mod service;

// Re-export core types for convenience
pub use error::RemoteError;
pub use query::{Comparison, Condition, OrderBy, Query};
pub use record::Record;
pub use service::{DataService, TableClient};
