//! # RecordEntity Trait
//!
//! The `RecordEntity` trait is the contract every entity kind (student, user, professor, …)
//! implements so that the generic [`RecordStore`](crate::RecordStore) can persist it, index its
//! identifying field, filter and sort it, and snapshot it into a domain event.
//!
//! The store is written *once* against this trait. Associated types keep each kind's payloads
//! apart: a `UserCreate` can never be sent to a professor store.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record kind must implement to be managed by a [`RecordStore`](crate::RecordStore).
///
/// # Identifying field
///
/// Every kind has exactly one identifying field (an email, an enrollment code) that must be
/// unique across live records. The store keeps a unique index keyed by
/// [`RecordEntity::unique_key`]; kinds whose key compares case-insensitively override
/// [`RecordEntity::normalize_key`].
///
/// # Timestamps
///
/// The store passes its clock reading into [`RecordEntity::from_create_params`] and
/// [`RecordEntity::apply_update`]. Kinds that do not track timestamps ignore it.
pub trait RecordEntity: Clone + Debug + Send + Sync + 'static {
    /// Lower-case kind name, used for routing keys and log fields (e.g. `"student"`).
    const KIND: &'static str;

    /// Store-assigned identifier. Converted from the store's `u64` counter.
    type Id: Copy + Eq + Ord + Hash + Send + Sync + Display + Debug + From<u64> + Into<u64>;

    /// The data required to insert a new record.
    type Create: Send + Sync + Debug;

    /// Field changes for an existing record. `None` fields keep their stored value.
    type Update: Send + Sync + Debug;

    /// Serializable view of the record published in domain events.
    type Snapshot: Serialize + Send;

    /// Build the full record from the assigned id and the insert payload.
    fn from_create_params(id: Self::Id, params: Self::Create, now: DateTime<Utc>) -> Self;

    fn id(&self) -> Self::Id;

    /// Raw value of the identifying field.
    fn identifying_field(&self) -> &str;

    /// Normalize a candidate identifying value into its index key.
    fn normalize_key(raw: &str) -> String {
        raw.trim().to_owned()
    }

    fn unique_key(&self) -> String {
        Self::normalize_key(self.identifying_field())
    }

    /// Apply supplied changes in place.
    fn apply_update(&mut self, update: Self::Update, now: DateTime<Utc>);

    /// Display name used by the name-substring filter.
    fn name(&self) -> &str;

    /// Category value used by the category filter (class group, role, specialty, …).
    fn category(&self) -> Option<&str>;

    /// Fields accepted by [`RecordEntity::compare_by`].
    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name"]
    }

    /// Compare two records on a named field. Returns `None` for fields not listed in
    /// [`RecordEntity::sortable_fields`].
    fn compare_by(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.id().cmp(&other.id())),
            "name" => Some(self.name().cmp(other.name())),
            _ => None,
        }
    }

    fn snapshot(&self) -> Self::Snapshot;
}
