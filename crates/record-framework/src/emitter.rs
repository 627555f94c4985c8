//! # Event Emitter
//!
//! One publish-failure policy for every service:
//!
//! 1. The store write has already committed when `emit` is called.
//! 2. Each publish attempt is bounded by a timeout; a few attempts are made inline.
//! 3. The result is a [`PublishOutcome`]. `Failed` is logged and never turned into an error
//!    for the caller.
//! 4. Events that still failed are handed to the [`RedeliveryQueue`](crate::RedeliveryQueue),
//!    when one is attached, for background retries.
//! 5. While that queue has a backlog, new events skip the inline attempts and join it, so
//!    no event overtakes an earlier one.

use crate::error::PublishError;
use crate::event::{DomainEvent, EventPublisher};
use crate::redelivery::RedeliveryHandle;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// What happened to an event after the inline attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Delivered,
    Failed(String),
}

impl PublishOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, PublishOutcome::Delivered)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitSettings {
    /// Bound on a single publish call.
    pub timeout: Duration,
    /// Inline attempts before giving up (at least one is always made).
    pub attempts: u32,
}

impl Default for EmitSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
            attempts: 2,
        }
    }
}

/// Publish one event with a timeout around the publisher call.
pub(crate) async fn publish_with_timeout(
    publisher: &dyn EventPublisher,
    event: &DomainEvent,
    timeout: Duration,
) -> Result<(), PublishError> {
    match tokio::time::timeout(timeout, publisher.publish(event)).await {
        Ok(result) => result,
        Err(_) => Err(PublishError::Timeout(timeout)),
    }
}

/// Applies the publish policy on behalf of a lifecycle service.
#[derive(Clone)]
pub struct EventEmitter {
    publisher: Arc<dyn EventPublisher>,
    settings: EmitSettings,
    redelivery: Option<RedeliveryHandle>,
}

impl EventEmitter {
    pub fn new(publisher: Arc<dyn EventPublisher>, settings: EmitSettings) -> Self {
        Self {
            publisher,
            settings,
            redelivery: None,
        }
    }

    /// Park events that fail inline on `handle` for background retries.
    pub fn with_redelivery(mut self, handle: RedeliveryHandle) -> Self {
        self.redelivery = Some(handle);
        self
    }

    pub async fn emit(&self, event: DomainEvent) -> PublishOutcome {
        if let Some(queue) = self.redelivery.as_ref().filter(|q| q.pending() > 0) {
            let pending = queue.pending();
            debug!(routing_key = %event.routing_key, pending, "Queued behind pending redeliveries");
            queue.enqueue(event);
            return PublishOutcome::Failed(format!(
                "queued behind {pending} pending redeliveries"
            ));
        }

        let attempts = self.settings.attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match publish_with_timeout(self.publisher.as_ref(), &event, self.settings.timeout)
                .await
            {
                Ok(()) => {
                    debug!(routing_key = %event.routing_key, attempt, "Event delivered");
                    return PublishOutcome::Delivered;
                }
                Err(e) => {
                    warn!(routing_key = %event.routing_key, attempt, error = %e, "Publish attempt failed");
                    last_error = Some(e);
                }
            }
        }

        let reason = last_error.map(|e| e.to_string()).unwrap_or_default();
        warn!(
            routing_key = %event.routing_key,
            record_id = event.record_id,
            %reason,
            "Event not delivered; write stays committed"
        );
        if let Some(queue) = &self.redelivery {
            queue.enqueue(event);
        }
        PublishOutcome::Failed(reason)
    }
}
