//! # Domain Events
//!
//! Every successful write is announced as a [`DomainEvent`] on routing key
//! `<kind>.created`, `<kind>.updated` or `<kind>.deleted`. Created and updated events carry
//! the record snapshot; deleted events carry only the id.
//!
//! [`EventPublisher`] is the port to the message bus. Implementations only move bytes; the
//! failure policy (timeouts, retries, what the caller sees) lives in
//! [`EventEmitter`](crate::EventEmitter).

use crate::entity::RecordEntity;
use crate::error::PublishError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Created,
    Updated,
    Deleted,
}

impl EventType {
    /// Routing-key suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Created => "created",
            EventType::Updated => "updated",
            EventType::Deleted => "deleted",
        }
    }
}

/// A change notification ready to hand to an [`EventPublisher`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainEvent {
    pub routing_key: String,
    pub kind: &'static str,
    pub event_type: EventType,
    pub record_id: u64,
    pub payload: Value,
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn routing_key_for(kind: &str, event_type: EventType) -> String {
        format!("{kind}.{}", event_type.as_str())
    }

    pub fn created<T: RecordEntity>(record: &T) -> Result<Self, PublishError> {
        Self::with_snapshot(record, EventType::Created)
    }

    pub fn updated<T: RecordEntity>(record: &T) -> Result<Self, PublishError> {
        Self::with_snapshot(record, EventType::Updated)
    }

    pub fn deleted<T: RecordEntity>(id: T::Id) -> Self {
        let occurred_at = Utc::now();
        let record_id: u64 = id.into();
        Self {
            routing_key: Self::routing_key_for(T::KIND, EventType::Deleted),
            kind: T::KIND,
            event_type: EventType::Deleted,
            record_id,
            payload: json!({
                "id": record_id,
                "type": EventType::Deleted,
                "occurred_at": occurred_at,
            }),
            occurred_at,
        }
    }

    fn with_snapshot<T: RecordEntity>(
        record: &T,
        event_type: EventType,
    ) -> Result<Self, PublishError> {
        let occurred_at = Utc::now();
        let mut payload = serde_json::to_value(record.snapshot())?;
        match payload.as_object_mut() {
            Some(fields) => {
                fields.insert("type".into(), json!(event_type));
                fields.insert("occurred_at".into(), json!(occurred_at));
            }
            None => {
                return Err(PublishError::Serialization(format!(
                    "{} snapshot is not a JSON object",
                    T::KIND
                )))
            }
        }
        Ok(Self {
            routing_key: Self::routing_key_for(T::KIND, event_type),
            kind: T::KIND,
            event_type,
            record_id: record.id().into(),
            payload,
            occurred_at,
        })
    }
}

/// Port to the message bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &DomainEvent) -> Result<(), PublishError>;
}
