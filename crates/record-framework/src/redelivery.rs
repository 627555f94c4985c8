//! # Redelivery Queue
//!
//! Background task that retries events the [`EventEmitter`](crate::EventEmitter) could not
//! deliver inline. Events are retried one at a time, in the order they failed, with
//! exponential backoff. Events that exhaust their retries are kept as [`DeadLetter`]s for
//! manual reconciliation.
//!
//! While anything is pending, emitters route new events through the queue as well, so the bus
//! sees them in the order the writes committed.
//!
//! The queue lives in memory: events still waiting when the process exits are lost.

use crate::emitter::publish_with_timeout;
use crate::event::{DomainEvent, EventPublisher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedeliverySettings {
    pub attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub timeout: Duration,
}

impl Default for RedeliverySettings {
    fn default() -> Self {
        Self {
            attempts: 5,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
            timeout: Duration::from_secs(2),
        }
    }
}

/// An event given up on, with the last failure reason.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadLetter {
    pub event: DomainEvent,
    pub reason: String,
}

/// Sender side of the queue, held by emitters.
#[derive(Clone)]
pub struct RedeliveryHandle {
    sender: mpsc::UnboundedSender<DomainEvent>,
    pending: Arc<AtomicUsize>,
    dead_letters: Arc<Mutex<Vec<DeadLetter>>>,
}

impl RedeliveryHandle {
    pub fn enqueue(&self, event: DomainEvent) {
        let routing_key = event.routing_key.clone();
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.sender.send(event).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            error!(%routing_key, "Redelivery queue closed; event lost");
        }
    }

    /// Events queued and not yet delivered or dead-lettered.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Events that exhausted their retries so far.
    pub async fn dead_letters(&self) -> Vec<DeadLetter> {
        self.dead_letters.lock().await.clone()
    }

    /// Removes and returns the dead letters collected so far.
    pub async fn take_dead_letters(&self) -> Vec<DeadLetter> {
        std::mem::take(&mut *self.dead_letters.lock().await)
    }
}

/// The retry worker. Runs until every [`RedeliveryHandle`] is dropped and the backlog is drained.
pub struct RedeliveryQueue {
    receiver: mpsc::UnboundedReceiver<DomainEvent>,
    publisher: Arc<dyn EventPublisher>,
    settings: RedeliverySettings,
    pending: Arc<AtomicUsize>,
    dead_letters: Arc<Mutex<Vec<DeadLetter>>>,
}

impl RedeliveryQueue {
    pub fn new(
        publisher: Arc<dyn EventPublisher>,
        settings: RedeliverySettings,
    ) -> (Self, RedeliveryHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let dead_letters = Arc::new(Mutex::new(Vec::new()));
        let queue = Self {
            receiver,
            publisher,
            settings,
            pending: pending.clone(),
            dead_letters: dead_letters.clone(),
        };
        (
            queue,
            RedeliveryHandle {
                sender,
                pending,
                dead_letters,
            },
        )
    }

    /// Returns the dead letters still held when the queue stops.
    pub async fn run(mut self) -> Vec<DeadLetter> {
        info!("Redelivery queue started");
        while let Some(event) = self.receiver.recv().await {
            self.redeliver(event).await;
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
        let dead = self.dead_letters.lock().await.clone();
        info!(dead_letters = dead.len(), "Redelivery queue shutdown");
        dead
    }

    async fn redeliver(&self, event: DomainEvent) {
        let mut backoff = self.settings.initial_backoff;
        let mut reason = String::from("no redelivery attempts configured");

        for attempt in 1..=self.settings.attempts {
            tokio::time::sleep(backoff).await;
            match publish_with_timeout(self.publisher.as_ref(), &event, self.settings.timeout)
                .await
            {
                Ok(()) => {
                    info!(routing_key = %event.routing_key, record_id = event.record_id, attempt, "Event redelivered");
                    return;
                }
                Err(e) => {
                    warn!(routing_key = %event.routing_key, attempt, error = %e, "Redelivery attempt failed");
                    reason = e.to_string();
                }
            }
            backoff = (backoff * 2).min(self.settings.max_backoff);
        }

        error!(
            routing_key = %event.routing_key,
            record_id = event.record_id,
            %reason,
            "Event dropped after retries"
        );
        self.dead_letters
            .lock()
            .await
            .push(DeadLetter { event, reason });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use crate::mock::MockPublisher;
    use serde_json::json;

    #[tokio::test]
    async fn test_exhausted_event_becomes_dead_letter() {
        let publisher = Arc::new(MockPublisher::new());
        publisher.set_available(false);
        let (queue, handle) = RedeliveryQueue::new(
            publisher.clone(),
            RedeliverySettings {
                attempts: 3,
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(2),
                timeout: Duration::from_millis(20),
            },
        );
        let worker = tokio::spawn(queue.run());

        handle.enqueue(DomainEvent {
            routing_key: "staff.deleted".into(),
            kind: "staff",
            event_type: EventType::Deleted,
            record_id: 9,
            payload: json!({"id": 9, "type": "DELETED"}),
            occurred_at: chrono::Utc::now(),
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(handle.dead_letters().await.len(), 1);
        drop(handle);
        let dead = worker.await.unwrap();

        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].event.record_id, 9);
        assert_eq!(publisher.attempts(), 3);
    }

    #[tokio::test]
    async fn test_take_dead_letters_empties_the_list() {
        let publisher = Arc::new(MockPublisher::new());
        publisher.set_available(false);
        let (queue, handle) = RedeliveryQueue::new(
            publisher,
            RedeliverySettings {
                attempts: 1,
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(1),
                timeout: Duration::from_millis(20),
            },
        );
        let worker = tokio::spawn(queue.run());

        for id in [3, 4] {
            handle.enqueue(DomainEvent {
                routing_key: "student.updated".into(),
                kind: "student",
                event_type: EventType::Updated,
                record_id: id,
                payload: json!({"id": id, "type": "UPDATED"}),
                occurred_at: chrono::Utc::now(),
            });
        }
        assert_eq!(handle.pending(), 2);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(handle.pending(), 0);

        let taken = handle.take_dead_letters().await;
        let ids: Vec<u64> = taken.iter().map(|d| d.event.record_id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert!(handle.dead_letters().await.is_empty());

        drop(handle);
        assert!(worker.await.unwrap().is_empty());
    }
}
