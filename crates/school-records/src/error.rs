//! Service-level errors.
//!
//! Every lifecycle service returns [`ServiceError`]. Store and channel failures arrive as
//! [`FrameworkError`] and are mapped in one place, so a unique-index rejection at commit time
//! looks exactly like a failed uniqueness pre-check to the caller.

use record_framework::FrameworkError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} '{value}' is already in use")]
    Conflict { kind: &'static str, value: String },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<FrameworkError> for ServiceError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound { kind, id } => ServiceError::NotFound { kind, id },
            FrameworkError::UniqueViolation { kind, key } => {
                ServiceError::Conflict { kind, value: key }
            }
            FrameworkError::InvalidQuery(reason) => ServiceError::Validation(reason),
            e @ (FrameworkError::StoreClosed | FrameworkError::StoreDropped) => {
                ServiceError::Storage(e.to_string())
            }
        }
    }
}

/// Errors raised while building or stopping a [`SchoolSystem`](crate::lifecycle::SchoolSystem).
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error("Task failed during shutdown: {0}")]
    Shutdown(#[from] tokio::task::JoinError),
}
