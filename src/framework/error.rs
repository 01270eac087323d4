//! # Remote Errors
//!
//! The single error object returned by every call against the Remote Data Service.
//! Each variant renders a human-readable message, which is what the stores capture
//! into their `error` field for inline display.

/// Errors surfaced by a [`DataService`](crate::framework::DataService) call.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum RemoteError {
    #[error("Data service closed")]
    ServiceClosed,
    #[error("Data service dropped response channel")]
    ServiceDropped,
    #[error("Row not found in {table}: {id}")]
    NotFound { table: String, id: String },
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("Constraint violation: {0}")]
    Constraint(String),
    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Malformed row: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn not_found(table: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}
