//! In-process message bus.
//!
//! A topic exchange stand-in built on a Tokio broadcast channel: every subscriber sees every
//! message and filters on the routing key itself.

use crate::error::PublishError;
use crate::event::{DomainEvent, EventPublisher};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

/// A message as it travels on the bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusMessage {
    pub exchange: String,
    pub routing_key: String,
    pub body: Value,
}

#[derive(Clone)]
pub struct InMemoryBus {
    exchange: String,
    sender: broadcast::Sender<BusMessage>,
}

impl InMemoryBus {
    pub fn new(exchange: impl Into<String>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            exchange: exchange.into(),
            sender,
        }
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventPublisher for InMemoryBus {
    async fn publish(&self, event: &DomainEvent) -> Result<(), PublishError> {
        let message = BusMessage {
            exchange: self.exchange.clone(),
            routing_key: event.routing_key.clone(),
            body: event.payload.clone(),
        };
        // With no subscribers the exchange drops the message, like an unbound exchange.
        let receivers = self.sender.send(message).unwrap_or(0);
        debug!(exchange = %self.exchange, routing_key = %event.routing_key, receivers, "Published");
        Ok(())
    }
}
