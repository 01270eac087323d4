//! # Inventory Sync demo
//!
//! Boots an [`AdminSystem`], signs a user in, seeds a few rows when running on the in-memory
//! backend, and walks the stores through a create/update/delete cycle.

use inventory_sync::auth::{AuthProvider, MemoryAuth};
use inventory_sync::config::DashboardConfig;
use inventory_sync::filter::{facet_options, FilterCriteria};
use inventory_sync::lifecycle::{setup_tracing, AdminSystem};
use inventory_sync::model::{
    LocationDraft, ProductDraft, ProductFacet, ProductPatch, SupplierDraft, UserDraft,
};
use inventory_sync::preferences::ColorScheme;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = DashboardConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting inventory dashboard");

    let auth = Arc::new(MemoryAuth::default());
    auth.register("admin@example.com", "admin");

    let system = AdminSystem::start(&config, auth.clone(), ColorScheme::default())
        .await
        .map_err(|e| e.to_string())?;

    auth.sign_in("admin@example.com", "admin")
        .await
        .map_err(|e| e.to_string())?;

    if config.api.is_none() {
        seed(&system).instrument(tracing::info_span!("seeding")).await;
    }

    system.refresh_all().await;
    info!(
        products = system.products.items().len(),
        suppliers = system.suppliers.items().len(),
        locations = system.locations.items().len(),
        users = system.users.items().len(),
        signed_in = system.session.is_authenticated(),
        dark_mode = system.theme.is_dark(),
        "Dashboard loaded"
    );

    match system.stats().await {
        Ok(stats) => info!(
            total = stats.total_products,
            low_stock = stats.low_stock_items,
            "Stock overview"
        ),
        Err(e) => warn!(error = %e, "Stock overview unavailable"),
    }

    let products = system.products.items();
    let tools = FilterCriteria::search("").facet(ProductFacet::Category, "Tools");
    info!(
        categories = ?facet_options(&products, ProductFacet::Category),
        tools = tools.apply(&products).len(),
        "Product filters"
    );

    let span = tracing::info_span!("product_cycle");
    async {
        let draft = ProductDraft::new("Torque Wrench", "TW-200", Decimal::new(4999, 2), 4)
            .category("Tools");
        let Some(product) = system.products.create(draft).await else {
            warn!(error = ?system.products.error(), "Create failed");
            return;
        };

        let patch = ProductPatch {
            stock: Some(12),
            ..Default::default()
        };
        system.products.update(&product.id, patch).await;

        // Same SKU again: rejected by the unique key, items stay as they were.
        let duplicate = ProductDraft::new("Torque Wrench", "TW-200", Decimal::new(4999, 2), 1);
        if system.products.create(duplicate).await.is_none() {
            warn!(error = ?system.products.error(), "Duplicate rejected");
        }

        system.products.delete(&product.id).await;
    }
    .instrument(span)
    .await;

    auth.sign_out().await.map_err(|e| e.to_string())?;
    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}

async fn seed(system: &AdminSystem) {
    let Some(acme) = system
        .suppliers
        .create(SupplierDraft {
            name: "Acme Tools".to_string(),
            email: "orders@acme.example".to_string(),
            phone: "555-0100".to_string(),
            address: "12 Forge Road".to_string(),
        })
        .await
    else {
        return;
    };

    let Some(warehouse) = system
        .locations
        .create(LocationDraft {
            name: "North Warehouse".to_string(),
            kind: "Warehouse".to_string(),
            address: "400 Dock Street".to_string(),
            capacity: 5000,
            manager: "Grace Hopper".to_string(),
        })
        .await
    else {
        return;
    };

    let rows = [
        ("Widget A", "WA-001", Decimal::new(1999, 2), 42, "Tools"),
        ("Gadget B", "GB-002", Decimal::new(8950, 2), 3, "Electronics"),
        ("Sprocket C", "SC-003", Decimal::new(450, 2), 0, "Tools"),
    ];
    for (name, sku, price, stock, category) in rows {
        let draft = ProductDraft::new(name, sku, price, stock)
            .category(category)
            .supplier(acme.id.clone())
            .location(warehouse.id.clone());
        system.products.create(draft).await;
    }

    let mut draft = UserDraft::new("Ada Lovelace", "ada@example.com", "Manager");
    draft.department = "Operations".to_string();
    draft.location_id = Some(warehouse.id);
    system.users.create(draft).await;
}
