//! Products held in the inventory.
//!
//! # Store
//! [`Product`] implements the [`Record`](crate::framework::Record) trait, allowing it to be
//! mirrored by a [`ProductStore`](crate::stores::ProductStore).
//!
//! - Creation payload: [`ProductDraft`]
//! - Update payload: [`ProductPatch`]
//! - Facets: [`ProductFacet`]

use crate::filter::Filterable;
use crate::framework::Record;
use crate::model::{LocationId, SupplierId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

record_id! {
    /// Type-safe identifier for Products.
    ProductId(i64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unique business key.
    pub sku: String,
    pub price: Decimal,
    /// Units on hand. Older rows may leave this null and carry only `quantity`.
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    #[serde(default)]
    pub location_id: Option<LocationId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Stock level shown in the inventory table: `stock`, else `quantity`, else zero.
    pub fn on_hand(&self) -> u32 {
        self.stock.or(self.quantity).unwrap_or(0)
    }
}

/// DTO for Product creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub stock: u32,
    /// Required by the hosted schema; kept equal to `stock`.
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<SupplierId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, sku: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            name: name.into(),
            description: None,
            sku: sku.into(),
            price,
            stock,
            quantity: stock,
            category: None,
            supplier_id: None,
            location_id: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn supplier(mut self, supplier_id: SupplierId) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    pub fn location(mut self, location_id: LocationId) -> Self {
        self.location_id = Some(location_id);
        self
    }
}

// DTO for Product updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<SupplierId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
}

fn check_price(price: Decimal) -> Result<(), String> {
    if price < Decimal::ZERO {
        return Err(format!("Price must not be negative: {price}"));
    }
    Ok(())
}

impl Record for Product {
    type Id = ProductId;
    type Draft = ProductDraft;
    type Patch = ProductPatch;

    const TABLE: &'static str = "products";

    fn id(&self) -> &ProductId {
        &self.id
    }

    fn check_draft(draft: &ProductDraft) -> Result<(), String> {
        check_price(draft.price)
    }

    fn check_patch(patch: &ProductPatch) -> Result<(), String> {
        patch.price.map_or(Ok(()), check_price)
    }
}

/// Exact-match filters offered on the products table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductFacet {
    Category,
}

impl Filterable for Product {
    type Facet = ProductFacet;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.sku.as_str()]
    }

    fn facet(&self, facet: ProductFacet) -> Option<&str> {
        match facet {
            ProductFacet::Category => self.category.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_row_with_quantity_and_stock_columns() {
        let row = json!({
            "id": 1,
            "name": "Widget A",
            "sku": "WA-1",
            "price": 19.99,
            "quantity": 40,
            "supplier_id": 3,
            "stock": 42,
            "created_at": "2024-05-01T10:00:00+00:00"
        });
        let product: Product = serde_json::from_value(row).unwrap();
        assert_eq!(product.stock, Some(42));
        assert_eq!(product.quantity, Some(40));
        assert_eq!(product.on_hand(), 42);
        assert_eq!(product.price, dec!(19.99));
    }

    #[test]
    fn test_null_stock_falls_back_to_quantity() {
        let row = json!({
            "id": 2,
            "name": "Gadget B",
            "sku": "GB-2",
            "price": "89.50",
            "quantity": 7,
            "stock": null
        });
        let product: Product = serde_json::from_value(row).unwrap();
        assert_eq!(product.on_hand(), 7);
    }

    #[test]
    fn test_draft_sends_both_columns() {
        let draft = ProductDraft::new("Widget A", "WA-1", dec!(1.50), 9);
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["stock"], json!(9));
        assert_eq!(body["quantity"], json!(9));
    }
}
