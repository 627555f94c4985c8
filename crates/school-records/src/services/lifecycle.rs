//! # RecordLifecycle Trait
//!
//! The create/read/update/delete flow shared by every lifecycle service. A service supplies
//! its store client and emitter; the provided methods do the rest:
//!
//! ```text
//! create: guard(is_taken) -> store.insert -> emit <kind>.created
//! update: store.get -> guard(if key changed) -> store.update -> emit <kind>.updated
//! delete: store.delete (NotFound when missing) -> emit <kind>.deleted
//! ```
//!
//! The guard is a fast path. The store's unique index rejects a duplicate that slips past
//! it, and that rejection maps to the same `Conflict`.
//!
//! Events are emitted after the write commits. Whatever the [`PublishOutcome`], the write
//! result is what the caller gets.

use crate::error::ServiceError;
use async_trait::async_trait;
use record_framework::{
    DomainEvent, EventEmitter, ListQuery, Page, PageRequest, PublishError, PublishOutcome,
    RecordEntity, StoreClient,
};
use tracing::{debug, warn};

#[async_trait]
pub trait RecordLifecycle<T: RecordEntity>: Send + Sync {
    fn store(&self) -> &StoreClient<T>;

    fn events(&self) -> &EventEmitter;

    /// Uniqueness guard. `current` is the record being updated, if any; a candidate equal to
    /// its own key (after normalization) is never a conflict.
    async fn ensure_available(
        &self,
        candidate: &str,
        current: Option<&T>,
    ) -> Result<(), ServiceError> {
        let key = T::normalize_key(candidate);
        if current.is_some_and(|record| record.unique_key() == key) {
            return Ok(());
        }
        if self.store().exists_by_key(candidate).await? {
            debug!(kind = T::KIND, %key, "Identifying field taken");
            return Err(ServiceError::Conflict {
                kind: T::KIND,
                value: candidate.to_owned(),
            });
        }
        Ok(())
    }

    async fn fetch(&self, id: T::Id) -> Result<T, ServiceError> {
        self.store()
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            })
    }

    async fn fetch_by_key(&self, key: &str) -> Result<T, ServiceError> {
        self.store()
            .get_by_key(key)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                kind: T::KIND,
                id: key.to_owned(),
            })
    }

    /// One filter is honored: name, else category, else none.
    async fn find_page(
        &self,
        query: &ListQuery,
        page: PageRequest,
    ) -> Result<Page<T>, ServiceError> {
        let filter = query.resolve();
        Ok(self.store().list(filter, page).await?)
    }

    async fn insert_and_announce(&self, params: T::Create) -> Result<T, ServiceError> {
        let record = self.store().insert(params).await?;
        self.announce(DomainEvent::created(&record)).await;
        Ok(record)
    }

    async fn update_and_announce(&self, id: T::Id, update: T::Update) -> Result<T, ServiceError> {
        let record = self.store().update(id, update).await?;
        self.announce(DomainEvent::updated(&record)).await;
        Ok(record)
    }

    async fn remove(&self, id: T::Id) -> Result<(), ServiceError> {
        self.store().delete(id).await?;
        self.announce(Ok(DomainEvent::deleted::<T>(id))).await;
        Ok(())
    }

    async fn announce(&self, event: Result<DomainEvent, PublishError>) -> PublishOutcome {
        match event {
            Ok(event) => self.events().emit(event).await,
            Err(e) => {
                warn!(kind = T::KIND, error = %e, "Could not build event; write stays committed");
                PublishOutcome::Failed(e.to_string())
            }
        }
    }
}
