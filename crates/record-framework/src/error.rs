//! # Framework Errors
//!
//! Error types shared by every store and publisher. Services map these into their own
//! error taxonomy.

use std::time::Duration;

/// Errors raised by a [`RecordStore`](crate::RecordStore) or the channel in front of it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    /// The store's unique index already holds this key for another record.
    #[error("{kind} with key '{key}' already exists")]
    UniqueViolation { kind: &'static str, key: String },
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Errors raised while handing an event to the message bus.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    #[error("Broker unavailable: {0}")]
    Unavailable(String),
    #[error("Publish timed out after {0:?}")]
    Timeout(Duration),
    #[error("Event serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PublishError {
    fn from(e: serde_json::Error) -> Self {
        PublishError::Serialization(e.to_string())
    }
}
