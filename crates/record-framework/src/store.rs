//! # Record Store
//!
//! `RecordStore<T>` is the server half of a store: a Tokio task that owns every record of one
//! kind plus the unique index on the identifying field, and processes requests one at a time.
//!
//! Because a single task owns the state, each insert, update and delete is atomic, and the
//! unique index check happens in the same step as the write it guards.

use crate::client::StoreClient;
use crate::entity::RecordEntity;
use crate::error::FrameworkError;
use crate::message::StoreRequest;
use crate::query::{Direction, ListFilter, Page, PageRequest};
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic store task for one record kind.
///
/// # Usage Pattern
///
/// ```rust,ignore
/// let (store, client) = RecordStore::<Student>::new(32);
/// let handle = tokio::spawn(store.run());
/// let student = client.insert(params).await?;
/// drop(client);          // closing every client ends the loop
/// handle.await?;
/// ```
///
/// # Implementation Details
///
/// * `records` is a `BTreeMap` so unsorted listings come back in id order.
/// * `index` maps the normalized identifying value to the owning id.
/// * `next_id` only moves forward; deleted ids are never handed out again.
pub struct RecordStore<T: RecordEntity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    records: BTreeMap<T::Id, T>,
    index: HashMap<String, T::Id>,
    next_id: u64,
}

impl<T: RecordEntity> RecordStore<T> {
    /// Creates a store and its client.
    ///
    /// `buffer_size` is the channel capacity; when full, client calls wait for space.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            records: BTreeMap::new(),
            index: HashMap::new(),
            next_id: 1,
        };
        (store, StoreClient::new(sender))
    }

    /// Runs the store loop until every client has been dropped.
    pub async fn run(mut self) {
        let kind = T::KIND;
        info!(kind, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Insert { params, respond_to } => {
                    debug!(kind, ?params, "Insert");
                    let _ = respond_to.send(self.insert(params));
                }
                StoreRequest::Get { id, respond_to } => {
                    let item = self.records.get(&id).cloned();
                    debug!(kind, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::GetByKey { key, respond_to } => {
                    let item = self
                        .index
                        .get(&T::normalize_key(&key))
                        .and_then(|id| self.records.get(id))
                        .cloned();
                    debug!(kind, %key, found = item.is_some(), "GetByKey");
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::Exists { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.records.contains_key(&id)));
                }
                StoreRequest::ExistsByKey { key, respond_to } => {
                    let taken = self.index.contains_key(&T::normalize_key(&key));
                    debug!(kind, %key, taken, "ExistsByKey");
                    let _ = respond_to.send(Ok(taken));
                }
                StoreRequest::List {
                    filter,
                    page,
                    respond_to,
                } => {
                    debug!(kind, ?filter, ?page, "List");
                    let _ = respond_to.send(self.list(&filter, &page));
                }
                StoreRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(kind, %id, ?update, "Update");
                    let _ = respond_to.send(self.update(id, update));
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(kind, %id, "Delete");
                    let _ = respond_to.send(self.delete(id));
                }
            }
        }

        info!(kind, size = self.records.len(), "Shutdown");
    }

    fn insert(&mut self, params: T::Create) -> Result<T, FrameworkError> {
        let kind = T::KIND;
        let id = T::Id::from(self.next_id);
        let record = T::from_create_params(id, params, Utc::now());
        let key = record.unique_key();

        if self.index.contains_key(&key) {
            warn!(kind, %key, "Unique constraint violated on insert");
            return Err(FrameworkError::UniqueViolation { kind, key });
        }

        self.next_id += 1;
        self.index.insert(key, id);
        self.records.insert(id, record.clone());
        info!(kind, %id, size = self.records.len(), "Inserted");
        Ok(record)
    }

    fn update(&mut self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        let kind = T::KIND;
        let Some(current) = self.records.get(&id) else {
            warn!(kind, %id, "Not found");
            return Err(FrameworkError::NotFound {
                kind,
                id: id.to_string(),
            });
        };

        // Apply to a copy so a rejected update leaves the stored record untouched.
        let old_key = current.unique_key();
        let mut updated = current.clone();
        updated.apply_update(update, Utc::now());
        let new_key = updated.unique_key();

        if new_key != old_key {
            if let Some(owner) = self.index.get(&new_key).filter(|owner| **owner != id) {
                warn!(kind, %id, %owner, key = %new_key, "Unique constraint violated on update");
                return Err(FrameworkError::UniqueViolation { kind, key: new_key });
            }
            self.index.remove(&old_key);
            self.index.insert(new_key, id);
        }

        self.records.insert(id, updated.clone());
        info!(kind, %id, "Updated");
        Ok(updated)
    }

    fn delete(&mut self, id: T::Id) -> Result<(), FrameworkError> {
        let kind = T::KIND;
        match self.records.remove(&id) {
            Some(record) => {
                self.index.remove(&record.unique_key());
                info!(kind, %id, size = self.records.len(), "Deleted");
                Ok(())
            }
            None => {
                warn!(kind, %id, "Not found");
                Err(FrameworkError::NotFound {
                    kind,
                    id: id.to_string(),
                })
            }
        }
    }

    fn list(&self, filter: &ListFilter, request: &PageRequest) -> Result<Page<T>, FrameworkError> {
        let mut matched: Vec<&T> = self
            .records
            .values()
            .filter(|record| filter.matches(*record))
            .collect();

        if let Some(sort) = &request.sort {
            if !T::sortable_fields().contains(&sort.field.as_str()) {
                return Err(FrameworkError::InvalidQuery(format!(
                    "cannot sort {} by '{}'",
                    T::KIND,
                    sort.field
                )));
            }
            matched.sort_by(|a, b| {
                let ordering = a
                    .compare_by(b, &sort.field)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.id().cmp(&b.id()));
                match sort.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        let items = matched.into_iter().cloned().collect();
        Ok(Page::from_ordered(items, request))
    }
}
