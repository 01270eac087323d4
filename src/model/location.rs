//! Storage locations (warehouses, stores, distribution centers).

use crate::filter::Filterable;
use crate::framework::{OrderBy, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

record_id! {
    /// Type-safe identifier for Locations. Assigned by the remote service as a UUID string.
    LocationId(String)
}

/// Location types offered by the location form. The column itself is free text.
pub const LOCATION_KINDS: [&str; 3] = ["Warehouse", "Store", "Distribution Center"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
    pub capacity: u32,
    pub manager: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
    pub capacity: u32,
    pub manager: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
}

impl Record for Location {
    type Id = LocationId;
    type Draft = LocationDraft;
    type Patch = LocationPatch;

    const TABLE: &'static str = "locations";

    fn id(&self) -> &LocationId {
        &self.id
    }

    fn default_order() -> OrderBy {
        OrderBy::asc("name")
    }

    fn insert_position(items: &[Self], row: &Self) -> usize {
        items.partition_point(|l| l.name <= row.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFacet {
    Kind,
}

impl Filterable for Location {
    type Facet = LocationFacet;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn facet(&self, facet: LocationFacet) -> Option<&str> {
        match facet {
            LocationFacet::Kind => Some(self.kind.as_str()),
        }
    }
}
