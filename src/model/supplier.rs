//! Suppliers, referenced by products through `supplier_id`.

use crate::filter::{Filterable, NoFacet};
use crate::framework::{OrderBy, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

record_id! {
    /// Type-safe identifier for Suppliers.
    SupplierId(i64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Record for Supplier {
    type Id = SupplierId;
    type Draft = SupplierDraft;
    type Patch = SupplierPatch;

    const TABLE: &'static str = "suppliers";

    fn id(&self) -> &SupplierId {
        &self.id
    }

    fn default_order() -> OrderBy {
        OrderBy::asc("name")
    }

    /// Keeps the collection sorted by name.
    fn insert_position(items: &[Self], row: &Self) -> usize {
        items.partition_point(|s| s.name <= row.name)
    }
}

impl Filterable for Supplier {
    type Facet = NoFacet;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn facet(&self, facet: NoFacet) -> Option<&str> {
        match facet {}
    }
}
