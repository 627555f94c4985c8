//! # Store Client
//!
//! The cloneable handle through which services talk to a [`RecordStore`](crate::RecordStore).

use crate::entity::RecordEntity;
use crate::error::FrameworkError;
use crate::message::{Response, StoreRequest};
use crate::query::{ListFilter, Page, PageRequest};
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for a `RecordStore<T>`.
///
/// Holds only the sender half of the store channel, so cloning is cheap. Every method sends
/// one request and awaits the oneshot reply.
pub struct StoreClient<T: RecordEntity> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

// Manual impl: deriving would require `T: Clone` on the wrapper, not just on the entity.
impl<T: RecordEntity> Clone for StoreClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: RecordEntity> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        build: impl FnOnce(Response<R>) -> StoreRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::StoreClosed)?;
        response.await.map_err(|_| FrameworkError::StoreDropped)?
    }

    /// Insert a new record; returns it with its assigned id.
    pub async fn insert(&self, params: T::Create) -> Result<T, FrameworkError> {
        self.call(|respond_to| StoreRequest::Insert { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.call(|respond_to| StoreRequest::Get { id, respond_to })
            .await
    }

    /// Point lookup on the identifying field.
    pub async fn get_by_key(&self, key: impl Into<String>) -> Result<Option<T>, FrameworkError> {
        let key = key.into();
        self.call(|respond_to| StoreRequest::GetByKey { key, respond_to })
            .await
    }

    pub async fn exists(&self, id: T::Id) -> Result<bool, FrameworkError> {
        self.call(|respond_to| StoreRequest::Exists { id, respond_to })
            .await
    }

    pub async fn exists_by_key(&self, key: impl Into<String>) -> Result<bool, FrameworkError> {
        let key = key.into();
        self.call(|respond_to| StoreRequest::ExistsByKey { key, respond_to })
            .await
    }

    pub async fn list(
        &self,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<Page<T>, FrameworkError> {
        self.call(|respond_to| StoreRequest::List {
            filter,
            page,
            respond_to,
        })
        .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        self.call(|respond_to| StoreRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    /// Delete a record. Fails with `NotFound` when the id does not exist.
    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.call(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }
}
