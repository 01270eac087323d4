//! # In-Process Data Service
//!
//! An in-memory stand-in for the hosted relational store. Each table is owned by its own
//! [`TableActor`] running in a Tokio task; [`MemoryService`] routes requests to the right
//! actor over an mpsc channel and awaits the answer on a oneshot channel.
//!
//! **Concurrency Model**:
//! Every actor processes its requests *sequentially*, so the rows need no `Mutex`.
//! Distinct tables run in parallel. The actor is the remote side of the contract: it
//! assigns ids and timestamps and enforces unique columns, exactly like the hosted store
//! would.

use crate::framework::error::RemoteError;
use crate::framework::query::{Comparison, Condition, Query};
use crate::framework::service::DataService;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How a table assigns ids to new rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// 1, 2, 3, ... (`bigserial`).
    Serial,
    /// Random v4 UUID strings.
    Uuid,
}

/// Shape of one in-memory table.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: String,
    pub ids: IdStrategy,
    pub unique: Vec<String>,
}

impl TableSchema {
    pub fn serial(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ids: IdStrategy::Serial,
            unique: Vec::new(),
        }
    }

    pub fn uuid(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ids: IdStrategy::Uuid,
            unique: Vec::new(),
        }
    }

    /// Adds a unique constraint on `column`.
    pub fn unique(mut self, column: impl Into<String>) -> Self {
        self.unique.push(column.into());
        self
    }
}

/// Type alias for the one-shot response channel used by table actors.
pub type Response<T> = oneshot::Sender<Result<T, RemoteError>>;

/// Message sent to a [`TableActor`].
#[derive(Debug)]
pub enum TableRequest {
    Select {
        query: Query,
        respond_to: Response<Vec<Value>>,
    },
    Insert {
        row: Value,
        respond_to: Response<Value>,
    },
    Update {
        id: Value,
        patch: Value,
        respond_to: Response<Value>,
    },
    Delete {
        id: Value,
        respond_to: Response<()>,
    },
    Count {
        query: Query,
        respond_to: Response<u64>,
    },
}

struct StoredRow {
    seq: u64,
    data: Map<String, Value>,
}

/// The actor owning one table's rows.
pub struct TableActor {
    receiver: mpsc::Receiver<TableRequest>,
    schema: TableSchema,
    rows: Vec<StoredRow>,
    next_id: u64,
    next_seq: u64,
}

impl TableActor {
    /// Creates the actor and the sender used to reach it.
    pub fn new(schema: TableSchema, buffer_size: usize) -> (Self, mpsc::Sender<TableRequest>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            schema,
            rows: Vec::new(),
            next_id: 1,
            next_seq: 0,
        };
        (actor, sender)
    }

    /// Runs the actor's event loop, processing messages until every sender is dropped.
    pub async fn run(mut self) {
        let table = self.schema.name.clone();
        info!(%table, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                TableRequest::Select { query, respond_to } => {
                    let rows = self.select(&query);
                    debug!(%table, count = rows.len(), "Select");
                    let _ = respond_to.send(Ok(rows));
                }
                TableRequest::Insert { row, respond_to } => {
                    let result = self.insert(row);
                    match &result {
                        Ok(row) => info!(%table, id = %row["id"], size = self.rows.len(), "Inserted"),
                        Err(e) => warn!(%table, error = %e, "Insert failed"),
                    }
                    let _ = respond_to.send(result);
                }
                TableRequest::Update {
                    id,
                    patch,
                    respond_to,
                } => {
                    let result = self.update(&id, patch);
                    match &result {
                        Ok(_) => info!(%table, %id, "Updated"),
                        Err(e) => warn!(%table, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                TableRequest::Delete { id, respond_to } => {
                    let result = self.delete(&id);
                    match &result {
                        Ok(()) => info!(%table, %id, size = self.rows.len(), "Deleted"),
                        Err(e) => warn!(%table, %id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
                TableRequest::Count { query, respond_to } => {
                    let count = self.matching(&query).count() as u64;
                    debug!(%table, count, "Count");
                    let _ = respond_to.send(Ok(count));
                }
            }
        }

        info!(%table, size = self.rows.len(), "Shutdown");
    }

    fn matching<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = &'a StoredRow> + 'a {
        self.rows
            .iter()
            .filter(move |row| query.conditions.iter().all(|c| satisfies(&row.data, c)))
    }

    fn select(&self, query: &Query) -> Vec<Value> {
        let mut rows: Vec<&StoredRow> = self.matching(query).collect();
        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let by_column = compare(a.data.get(&order.column), b.data.get(&order.column))
                    .then(a.seq.cmp(&b.seq));
                if order.ascending {
                    by_column
                } else {
                    by_column.reverse()
                }
            });
        }
        rows.into_iter()
            .map(|row| Value::Object(row.data.clone()))
            .collect()
    }

    fn insert(&mut self, row: Value) -> Result<Value, RemoteError> {
        let Value::Object(mut data) = row else {
            return Err(RemoteError::Decode(format!(
                "insert into {} expects an object",
                self.schema.name
            )));
        };
        self.check_unique(&data, None)?;

        let id = match self.schema.ids {
            IdStrategy::Serial => {
                let id = self.next_id;
                self.next_id += 1;
                Value::from(id)
            }
            IdStrategy::Uuid => Value::from(uuid::Uuid::new_v4().to_string()),
        };
        let now = Value::from(timestamp());
        data.insert("id".to_string(), id);
        data.insert("created_at".to_string(), now.clone());
        data.insert("updated_at".to_string(), now);

        let seq = self.next_seq;
        self.next_seq += 1;
        self.rows.push(StoredRow {
            seq,
            data: data.clone(),
        });
        Ok(Value::Object(data))
    }

    fn update(&mut self, id: &Value, patch: Value) -> Result<Value, RemoteError> {
        let Value::Object(mut patch) = patch else {
            return Err(RemoteError::Decode(format!(
                "update of {} expects an object",
                self.schema.name
            )));
        };
        patch.remove("id");
        patch.remove("created_at");

        let index = self
            .position(id)
            .ok_or_else(|| RemoteError::not_found(&self.schema.name, id))?;
        self.check_unique(&patch, Some(index))?;

        let row = &mut self.rows[index].data;
        row.extend(patch);
        row.insert("updated_at".to_string(), Value::from(timestamp()));
        Ok(Value::Object(row.clone()))
    }

    fn delete(&mut self, id: &Value) -> Result<(), RemoteError> {
        let index = self
            .position(id)
            .ok_or_else(|| RemoteError::not_found(&self.schema.name, id))?;
        self.rows.remove(index);
        Ok(())
    }

    fn position(&self, id: &Value) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.data.get("id").is_some_and(|v| values_equal(v, id)))
    }

    fn check_unique(&self, data: &Map<String, Value>, skip: Option<usize>) -> Result<(), RemoteError> {
        for column in &self.schema.unique {
            let Some(value) = data.get(column).filter(|v| !v.is_null()) else {
                continue;
            };
            let taken = self.rows.iter().enumerate().any(|(i, row)| {
                Some(i) != skip && row.data.get(column).is_some_and(|v| values_equal(v, value))
            });
            if taken {
                return Err(RemoteError::Constraint(format!(
                    "duplicate key value violates unique constraint \"{}_{}_key\"",
                    self.schema.name, column
                )));
            }
        }
        Ok(())
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Ordering between two values of the same kind; `None` when they are not comparable.
fn comparable(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Sort order with nulls (and missing columns) first.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => comparable(a, b).unwrap_or(Ordering::Equal),
    }
}

/// Splits `locations(name, type)` into the table and its column list.
fn parse_embed(resource: &str) -> Option<(&str, Vec<&str>)> {
    let (table, rest) = resource.split_once('(')?;
    let columns = rest.strip_suffix(')')?;
    let columns = columns.split(',').map(str::trim).filter(|c| !c.is_empty()).collect();
    Some((table.trim(), columns))
}

fn project(row: &Value, columns: &[&str]) -> Value {
    if columns.is_empty() || columns.contains(&"*") {
        return row.clone();
    }
    let picked = columns
        .iter()
        .filter_map(|c| row.get(*c).map(|v| (c.to_string(), v.clone())))
        .collect::<Map<String, Value>>();
    Value::Object(picked)
}

fn satisfies(row: &Map<String, Value>, condition: &Condition) -> bool {
    let Some(value) = row.get(&condition.column) else {
        return false;
    };
    match condition.comparison {
        Comparison::Eq => values_equal(value, &condition.value),
        Comparison::Lte => comparable(value, &condition.value).is_some_and(|o| o != Ordering::Greater),
        Comparison::Gte => comparable(value, &condition.value).is_some_and(|o| o != Ordering::Less),
    }
}

/// [`DataService`] backed by one [`TableActor`] per table.
pub struct MemoryService {
    tables: HashMap<String, mpsc::Sender<TableRequest>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl MemoryService {
    /// Spawns an actor for every schema. Must be called inside a Tokio runtime.
    pub fn start(schemas: impl IntoIterator<Item = TableSchema>, buffer_size: usize) -> Self {
        let mut tables = HashMap::new();
        let mut handles = Vec::new();
        for schema in schemas {
            let name = schema.name.clone();
            let (actor, sender) = TableActor::new(schema, buffer_size);
            handles.push(tokio::spawn(actor.run()));
            tables.insert(name, sender);
        }
        Self {
            tables,
            handles: Mutex::new(handles),
        }
    }

    /// The four dashboard tables: products (unique sku), suppliers, locations, users.
    pub fn inventory(buffer_size: usize) -> Self {
        Self::start(
            [
                TableSchema::serial("products").unique("sku"),
                TableSchema::serial("suppliers"),
                TableSchema::uuid("locations"),
                TableSchema::serial("users"),
            ],
            buffer_size,
        )
    }

    /// Closes every table and waits for the actors to finish.
    pub async fn shutdown(self) {
        drop(self.tables);
        let handles = match self.handles.into_inner() {
            Ok(handles) => handles,
            Err(poisoned) => poisoned.into_inner(),
        };
        for handle in handles {
            let _ = handle.await;
        }
    }

    /// Resolves `related(col, ...)` through the `<related singular>_id` column of each row,
    /// storing the projected related row (or null) under the related table's name.
    async fn embed(&self, rows: &mut [Value], resource: &str) -> Result<(), RemoteError> {
        let (related, columns) = parse_embed(resource)
            .ok_or_else(|| RemoteError::Decode(format!("malformed embed: {resource}")))?;
        let foreign_key = format!("{}_id", related.strip_suffix('s').unwrap_or(related));
        let targets = self
            .request(related, |respond_to| TableRequest::Select {
                query: Query::new(),
                respond_to,
            })
            .await?;

        for row in rows.iter_mut() {
            let Value::Object(data) = row else { continue };
            let embedded = data
                .get(&foreign_key)
                .filter(|id| !id.is_null())
                .and_then(|id| {
                    targets
                        .iter()
                        .find(|t| t.get("id").is_some_and(|t_id| values_equal(t_id, id)))
                })
                .map_or(Value::Null, |target| project(target, &columns));
            data.insert(related.to_string(), embedded);
        }
        Ok(())
    }

    async fn request<R>(
        &self,
        table: &str,
        make: impl FnOnce(Response<R>) -> TableRequest,
    ) -> Result<R, RemoteError> {
        let sender = self
            .tables
            .get(table)
            .ok_or_else(|| RemoteError::UnknownTable(table.to_string()))?;
        let (respond_to, response) = oneshot::channel();
        sender
            .send(make(respond_to))
            .await
            .map_err(|_| RemoteError::ServiceClosed)?;
        response.await.map_err(|_| RemoteError::ServiceDropped)?
    }
}

#[async_trait]
impl DataService for MemoryService {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, RemoteError> {
        let embeds = query.embeds.clone();
        let query = query.clone();
        let mut rows = self
            .request(table, |respond_to| TableRequest::Select { query, respond_to })
            .await?;
        for resource in &embeds {
            self.embed(&mut rows, resource).await?;
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, RemoteError> {
        self.request(table, |respond_to| TableRequest::Insert { row, respond_to })
            .await
    }

    async fn update(&self, table: &str, id: &Value, patch: Value) -> Result<Value, RemoteError> {
        let id = id.clone();
        self.request(table, |respond_to| TableRequest::Update {
            id,
            patch,
            respond_to,
        })
        .await
    }

    async fn delete(&self, table: &str, id: &Value) -> Result<(), RemoteError> {
        let id = id.clone();
        self.request(table, |respond_to| TableRequest::Delete { id, respond_to })
            .await
    }

    async fn count(&self, table: &str, query: &Query) -> Result<u64, RemoteError> {
        let query = query.clone();
        self.request(table, |respond_to| TableRequest::Count { query, respond_to })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::query::OrderBy;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let service = MemoryService::inventory(8);

        let row = service
            .insert("suppliers", json!({ "name": "Acme", "email": "a@acme.test" }))
            .await
            .unwrap();
        assert_eq!(row["id"], json!(1));
        assert!(row["created_at"].is_string());
        assert_eq!(row["created_at"], row["updated_at"]);

        let second = service
            .insert("suppliers", json!({ "name": "Bolt" }))
            .await
            .unwrap();
        assert_eq!(second["id"], json!(2));

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_select_orders_and_filters() {
        let service = MemoryService::inventory(8);
        for (sku, stock) in [("B", 4), ("A", 20), ("C", 10)] {
            service
                .insert("products", json!({ "name": sku, "sku": sku, "stock": stock }))
                .await
                .unwrap();
        }

        let by_name = service
            .select("products", &Query::ordered(OrderBy::asc("name")))
            .await
            .unwrap();
        let names: Vec<_> = by_name.iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![json!("A"), json!("B"), json!("C")]);

        let newest_first = service
            .select("products", &Query::ordered(OrderBy::desc("created_at")))
            .await
            .unwrap();
        assert_eq!(newest_first[0]["sku"], json!("C"));
        assert_eq!(newest_first[2]["sku"], json!("B"));

        let low = service
            .count("products", &Query::new().lte("stock", 10))
            .await
            .unwrap();
        assert_eq!(low, 2);

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_unique_sku_is_enforced() {
        let service = MemoryService::inventory(8);
        service
            .insert("products", json!({ "name": "One", "sku": "SKU-1" }))
            .await
            .unwrap();

        let err = service
            .insert("products", json!({ "name": "Two", "sku": "SKU-1" }))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Constraint(_)));

        // Re-saving a row with its own sku is not a conflict.
        let same = service
            .update("products", &json!(1), json!({ "sku": "SKU-1", "name": "Uno" }))
            .await
            .unwrap();
        assert_eq!(same["name"], json!("Uno"));

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_row() {
        let service = MemoryService::inventory(8);

        let err = service
            .update("users", &json!(42), json!({ "role": "admin" }))
            .await
            .unwrap_err();
        assert_eq!(err, RemoteError::not_found("users", 42));

        let err = service.delete("users", &json!(42)).await.unwrap_err();
        assert!(matches!(err, RemoteError::NotFound { .. }));

        let err = service.select("orders", &Query::new()).await.unwrap_err();
        assert_eq!(err, RemoteError::UnknownTable("orders".into()));

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_update_cannot_change_id() {
        let service = MemoryService::inventory(8);
        let row = service
            .insert("locations", json!({ "name": "North", "type": "Warehouse" }))
            .await
            .unwrap();
        let id = row["id"].clone();
        assert!(id.is_string());

        let updated = service
            .update("locations", &id, json!({ "id": "other", "capacity": 500 }))
            .await
            .unwrap();
        assert_eq!(updated["id"], id);
        assert_eq!(updated["capacity"], json!(500));
        assert_eq!(updated["created_at"], row["created_at"]);

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_select_embeds_related_row() {
        let service = MemoryService::inventory(8);
        let north = service
            .insert("locations", json!({ "name": "North", "type": "Warehouse", "capacity": 10 }))
            .await
            .unwrap();
        service
            .insert("users", json!({ "username": "ada", "location_id": north["id"] }))
            .await
            .unwrap();
        service
            .insert("users", json!({ "username": "bob", "location_id": null }))
            .await
            .unwrap();

        let query = Query::ordered(OrderBy::asc("id")).embed("locations(name)");
        let rows = service.select("users", &query).await.unwrap();
        assert_eq!(rows[0]["locations"], json!({ "name": "North" }));
        assert_eq!(rows[1]["locations"], Value::Null);

        let err = service
            .select("users", &Query::new().embed("locations"))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Decode(_)));

        service.shutdown().await;
    }
}
