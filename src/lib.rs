#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Inventory Sync
//!
//! > **The client-side data layer of an inventory admin dashboard.**
//!
//! Products, suppliers, locations and users live in a hosted relational store. This crate
//! keeps an observable in-memory copy of each table for the dashboard views, pushes edits
//! back, and tracks who is signed in.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### One store, four tables
//! You'll see `EntityStore<T: Record>` everywhere. The fetch/create/update/delete logic is
//! written **once** and instantiated per row type; each [`Record`](framework::Record) only
//! declares its table name, payload types and display order.
//!
//! ### Remote state is the truth
//! A store changes `items` only after the service acknowledged the write. A failed call
//! leaves `items` exactly as it was and surfaces the error message in the store's `error`
//! field. There are no retries and no optimistic updates.
//!
//! ### Injected, not global
//! Stores are plain values constructed with an `Arc<dyn DataService>`. Tests hand them a
//! [`MockService`](framework::mock::MockService) or the in-memory backend.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Swappable backends
//! [`DataService`](framework::DataService) is the seam. [`RestService`](framework::rest::RestService)
//! speaks PostgREST to the hosted backend; [`MemoryService`](framework::memory::MemoryService)
//! runs one table actor per table, processing requests sequentially with no locks.
//!
//! ### 2. Observability
//! State is published through `tokio::sync::watch`, so a view can await changes instead of
//! polling. Every store operation runs in a `tracing` span tagged with its table.
//! See the [`lifecycle::tracing`] module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Plumbing ([`framework`])
//! - **Role**: The remote contract, typed table access and the three backends.
//! - **Key items**: [`Record`](framework::Record), [`DataService`](framework::DataService),
//!   [`Query`](framework::Query), [`RemoteError`](framework::RemoteError).
//!
//! ### 2. The Rows ([`model`])
//! - **Role**: Row types with their create (`Draft`) and update (`Patch`) payloads.
//!
//! ### 3. The State ([`stores`], [`auth`])
//! - **Role**: Entity stores per table, the session store and the auth event bridge.
//! - **Key items**: [`ProductStore`](stores::ProductStore), [`SessionStore`](stores::SessionStore),
//!   [`SessionSync`](auth::SessionSync).
//!
//! ### 4. View Helpers ([`filter`], [`dashboard`], [`preferences`])
//! - **Role**: Search and facet filtering, landing-page counts, the dark-mode flag.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! - **Role**: Reads the environment, picks a backend and wires everything together.
//! - **Key items**: [`AdminSystem`](lifecycle::AdminSystem), [`DashboardConfig`](config::DashboardConfig).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # In-memory backend with seeded demo data
//! RUST_LOG=info cargo run
//!
//! # Against a hosted backend
//! INVENTORY_API_URL=https://project.example.co INVENTORY_API_KEY=... cargo run
//! ```

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod preferences;
pub mod stores;
