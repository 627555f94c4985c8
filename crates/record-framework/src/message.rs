//! # Store Messages
//!
//! Requests sent from a [`StoreClient`](crate::StoreClient) to its
//! [`RecordStore`](crate::RecordStore). Each variant carries a oneshot sender for the reply.

use crate::entity::RecordEntity;
use crate::error::FrameworkError;
use crate::query::{ListFilter, Page, PageRequest};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by stores.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the store.
///
/// `Insert` and `Update` are checked against the unique index inside the store task, so
/// two racing writers with the same identifying value cannot both commit.
/// Key lookups take the raw value; the store normalizes it with
/// [`RecordEntity::normalize_key`].
#[derive(Debug)]
pub enum StoreRequest<T: RecordEntity> {
    Insert {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    GetByKey {
        key: String,
        respond_to: Response<Option<T>>,
    },
    Exists {
        id: T::Id,
        respond_to: Response<bool>,
    },
    ExistsByKey {
        key: String,
        respond_to: Response<bool>,
    },
    List {
        filter: ListFilter,
        page: PageRequest,
        respond_to: Response<Page<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}
