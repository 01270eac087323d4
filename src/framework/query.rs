//! # Query Directives
//!
//! What a `select` or `count` call may ask of the Remote Data Service: zero or more
//! column conditions, at most one ordering directive, and related rows to embed.

use serde_json::Value;

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Lte,
    Gte,
}

impl Comparison {
    /// Operator name in PostgREST query syntax (`stock=lte.10`).
    pub fn operator(self) -> &'static str {
        match self {
            Comparison::Eq => "eq",
            Comparison::Lte => "lte",
            Comparison::Gte => "gte",
        }
    }
}

/// A single `column <op> value` restriction.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub comparison: Comparison,
    pub value: Value,
}

/// Ordering directive for `select`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Builder for select/count requests.
///
/// ```
/// use inventory_sync::framework::{OrderBy, Query};
///
/// let query = Query::new().lte("stock", 10).order(OrderBy::asc("name"));
/// assert_eq!(query.conditions.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub conditions: Vec<Condition>,
    pub order: Option<OrderBy>,
    /// Related tables to embed through a foreign key, e.g. `locations(name)`.
    pub embeds: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ordered(order: OrderBy) -> Self {
        Self::new().order(order)
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    /// Embeds the columns of a related table, written `table(col, ...)`.
    pub fn embed(mut self, resource: impl Into<String>) -> Self {
        self.embeds.push(resource.into());
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition(column, Comparison::Eq, value)
    }

    pub fn lte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition(column, Comparison::Lte, value)
    }

    pub fn gte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition(column, Comparison::Gte, value)
    }

    fn condition(
        mut self,
        column: impl Into<String>,
        comparison: Comparison,
        value: impl Into<Value>,
    ) -> Self {
        self.conditions.push(Condition {
            column: column.into(),
            comparison,
            value: value.into(),
        });
        self
    }
}
