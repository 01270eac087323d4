//! # Mock Data Service
//!
//! [`MockService`] implements [`DataService`] from a queue of scripted responses. It lets you
//! drive a store through success and failure paths deterministically, without a backend.
//!
//! ## When to use the Mock vs the Memory Service
//!
//! | Feature | MockService | MemoryService |
//! |---------|-------------|---------------|
//! | **State** | None (scripted responses) | Real rows, ids, timestamps |
//! | **Error Injection** | Easy (`return_err`) | Only natural failures (not found, constraints) |
//! | **Call Inspection** | Every call recorded | No |
//! | **Use Case** | Failure paths, payload assertions | Round-trip behaviour |
//!
//! ## Example
//!
//! ```
//! use inventory_sync::framework::mock::MockService;
//! use inventory_sync::framework::{DataService, Query, RemoteError};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mock = MockService::new();
//! mock.expect_select("products")
//!     .return_err(RemoteError::Transport("connection reset".into()));
//!
//! let service = mock.service();
//! let result = service.select("products", &Query::new()).await;
//! assert!(result.is_err());
//! mock.verify();
//! # }
//! ```

use crate::framework::error::RemoteError;
use crate::framework::query::Query;
use crate::framework::service::DataService;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// =============================================================================
// EXPECTATIONS
// =============================================================================

/// A scripted response, consumed in FIFO order.
enum Expectation {
    Select {
        table: String,
        response: Result<Vec<Value>, RemoteError>,
    },
    Insert {
        table: String,
        response: Result<Value, RemoteError>,
    },
    Update {
        table: String,
        response: Result<Value, RemoteError>,
    },
    Delete {
        table: String,
        response: Result<(), RemoteError>,
    },
    Count {
        table: String,
        response: Result<u64, RemoteError>,
    },
}

/// A call the mock received, kept for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Select { table: String, query: Query },
    Insert { table: String, row: Value },
    Update { table: String, id: Value, patch: Value },
    Delete { table: String, id: Value },
    Count { table: String, query: Query },
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

/// A scripted [`DataService`] with expectation tracking.
#[derive(Clone, Default)]
pub struct MockService {
    expectations: Queue,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockService {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a shared handle for injecting into stores.
    pub fn service(&self) -> Arc<dyn DataService> {
        Arc::new(self.clone())
    }

    pub fn expect_select(&self, table: &str) -> ExpectationBuilder<Vec<Value>> {
        self.builder(table, |table, response| Expectation::Select { table, response })
    }

    pub fn expect_insert(&self, table: &str) -> ExpectationBuilder<Value> {
        self.builder(table, |table, response| Expectation::Insert { table, response })
    }

    pub fn expect_update(&self, table: &str) -> ExpectationBuilder<Value> {
        self.builder(table, |table, response| Expectation::Update { table, response })
    }

    pub fn expect_delete(&self, table: &str) -> ExpectationBuilder<()> {
        self.builder(table, |table, response| Expectation::Delete { table, response })
    }

    pub fn expect_count(&self, table: &str) -> ExpectationBuilder<u64> {
        self.builder(table, |table, response| Expectation::Count { table, response })
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock calls poisoned").clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().expect("mock expectations poisoned");
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn builder<R>(
        &self,
        table: &str,
        wrap: fn(String, Result<R, RemoteError>) -> Expectation,
    ) -> ExpectationBuilder<R> {
        ExpectationBuilder {
            table: table.to_string(),
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    fn next(&self, call: RecordedCall) -> Expectation {
        self.calls.lock().expect("mock calls poisoned").push(call.clone());
        let next = self
            .expectations
            .lock()
            .expect("mock expectations poisoned")
            .pop_front();
        match next {
            Some(expectation) => expectation,
            None => panic!("Unexpected request: {call:?}"),
        }
    }
}

/// Builder that queues the response for one expected call.
pub struct ExpectationBuilder<R> {
    table: String,
    wrap: fn(String, Result<R, RemoteError>) -> Expectation,
    expectations: Queue,
}

impl<R> ExpectationBuilder<R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: RemoteError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, RemoteError>) {
        let expectation = (self.wrap)(self.table, response);
        self.expectations
            .lock()
            .expect("mock expectations poisoned")
            .push_back(expectation);
    }
}

fn check_table(expected: &str, actual: &str) {
    if expected != actual {
        panic!("Expectation mismatch: expected table {expected}, got {actual}");
    }
}

#[async_trait]
impl DataService for MockService {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, RemoteError> {
        let call = RecordedCall::Select {
            table: table.to_string(),
            query: query.clone(),
        };
        match self.next(call) {
            Expectation::Select { table: t, response } => {
                check_table(&t, table);
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: select {table}"),
        }
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, RemoteError> {
        let call = RecordedCall::Insert {
            table: table.to_string(),
            row,
        };
        match self.next(call) {
            Expectation::Insert { table: t, response } => {
                check_table(&t, table);
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: insert {table}"),
        }
    }

    async fn update(&self, table: &str, id: &Value, patch: Value) -> Result<Value, RemoteError> {
        let call = RecordedCall::Update {
            table: table.to_string(),
            id: id.clone(),
            patch,
        };
        match self.next(call) {
            Expectation::Update { table: t, response } => {
                check_table(&t, table);
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: update {table}"),
        }
    }

    async fn delete(&self, table: &str, id: &Value) -> Result<(), RemoteError> {
        let call = RecordedCall::Delete {
            table: table.to_string(),
            id: id.clone(),
        };
        match self.next(call) {
            Expectation::Delete { table: t, response } => {
                check_table(&t, table);
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: delete {table}"),
        }
    }

    async fn count(&self, table: &str, query: &Query) -> Result<u64, RemoteError> {
        let call = RecordedCall::Count {
            table: table.to_string(),
            query: query.clone(),
        };
        match self.next(call) {
            Expectation::Count { table: t, response } => {
                check_table(&t, table);
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: count {table}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_service_with_expectations() {
        let mock = MockService::new();
        mock.expect_insert("suppliers").return_ok(json!({ "id": 7, "name": "Acme" }));
        mock.expect_count("products").return_ok(12);

        let service = mock.service();
        let row = service
            .insert("suppliers", json!({ "name": "Acme" }))
            .await
            .unwrap();
        assert_eq!(row["id"], json!(7));
        assert_eq!(service.count("products", &Query::new()).await, Ok(12));

        mock.verify();
        assert_eq!(
            mock.calls()[0],
            RecordedCall::Insert {
                table: "suppliers".into(),
                row: json!({ "name": "Acme" }),
            }
        );
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected request")]
    async fn test_unscripted_call_panics() {
        let mock = MockService::new();
        let _ = mock.service().delete("users", &json!(1)).await;
    }
}
