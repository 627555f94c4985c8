//! # Record Framework
//!
//! Building blocks for services that manage the lifecycle of keyed records and announce every
//! change on a message bus.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`RecordEntity`]) - what a record kind looks like: its id, its
//!    identifying field, how it is created, updated, filtered, sorted and snapshotted.
//! 2. **Store Layer** ([`RecordStore`]) - a Tokio task that owns all records of one kind and a
//!    unique index on the identifying field. One task per kind, one request at a time.
//! 3. **Interface Layer** ([`StoreClient`]) - a cloneable, type-safe handle to a store.
//! 4. **Event Layer** ([`DomainEvent`], [`EventPublisher`], [`EventEmitter`],
//!    [`RedeliveryQueue`]) - change notifications and the policy for delivering them.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! let (store, client) = RecordStore::<Student>::new(32);
//! tokio::spawn(store.run());
//!
//! let bus = Arc::new(InMemoryBus::new("distrischool.events", 256));
//! let emitter = EventEmitter::new(bus, EmitSettings::default());
//!
//! let student = client.insert(params).await?;
//! emitter.emit(DomainEvent::created(&student)?).await;
//! ```
//!
//! ## Uniqueness
//!
//! Services check the identifying field before writing (`exists_by_key`) to give a clear
//! error early, but the check that counts is the one inside the store: an insert or update
//! that would duplicate a live key fails with [`FrameworkError::UniqueViolation`], even when
//! two callers race past the early check.
//!
//! ## Testing
//!
//! See [`mock`] for a scripted [`StoreClient`] and a publisher that can simulate outages.

pub mod bus;
pub mod client;
pub mod emitter;
pub mod entity;
pub mod error;
pub mod event;
pub mod message;
pub mod mock;
pub mod query;
pub mod redelivery;
pub mod store;
pub mod tracing;

pub use bus::{BusMessage, InMemoryBus};
pub use client::StoreClient;
pub use emitter::{EmitSettings, EventEmitter, PublishOutcome};
pub use entity::RecordEntity;
pub use error::{FrameworkError, PublishError};
pub use event::{DomainEvent, EventPublisher, EventType};
pub use message::{Response, StoreRequest};
pub use query::{Direction, ListFilter, ListQuery, Page, PageRequest, Sort};
pub use redelivery::{DeadLetter, RedeliveryHandle, RedeliveryQueue, RedeliverySettings};
pub use store::RecordStore;
