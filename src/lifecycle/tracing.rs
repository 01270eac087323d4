//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Table Actors**: startup and shutdown with the table name and row count
//! - **Store Operations**: one span per `fetch_all`/`create`/`update`/`delete`, tagged with
//!   the table; success at `info`, failures at `warn`
//! - **Session**: restores, sign-in/out and every auth event applied
//! - **Payloads**: rows and patches sent to the data service, at `debug` only
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs
//! RUST_LOG=info cargo run
//!
//! # Show request payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the stores
//! RUST_LOG=inventory_sync::stores=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a product creation reads:
//!
//! ```text
//! INFO create{table="products"}: Created id=3
//! ```
//!
//! and a rejected one:
//!
//! ```text
//! WARN create{table="products"}: Operation failed table="products" error=Constraint violation: duplicate key value violates unique constraint "products_sku_key"
//! ```

/// Installs the global subscriber. Call once, at the top of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // table names are carried as span fields
        .compact()
        .init();
}
