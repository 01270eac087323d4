//! Startup, wiring and shutdown.

pub mod system;
pub mod tracing;

pub use system::{AdminSystem, SystemError};
pub use tracing::setup_tracing;
