//! # Mocks for Testing
//!
//! * [`MockStore`] hands out a real [`StoreClient`] whose requests are answered from a queue
//!   of scripted expectations instead of a running [`RecordStore`](crate::RecordStore). Use it
//!   to test service orchestration in isolation, and to inject failures that are hard to
//!   produce with a real store (a closed store, a unique violation that slips past the guard).
//! * [`MockPublisher`] records every event it accepts and can simulate a broker outage or a
//!   hanging broker.
//!
//! | | MockStore | Real store |
//! |---|---|---|
//! | **State** | None (scripted replies) | Real records and index |
//! | **Use case** | Logic *around* the client | The store itself, full flows |
//! | **Error injection** | `return_err(...)` | Requires real state |
//!
//! ```rust,ignore
//! let mut mock = MockStore::<Student>::new();
//! mock.expect_exists_by_key("2024123456").return_ok(false);
//! mock.expect_insert().return_err(FrameworkError::UniqueViolation { kind: "student", key: "2024123456".into() });
//!
//! let service = StudentService::new(mock.client(), emitter);
//! // ... exercise the service ...
//! mock.verify();
//! ```

use crate::client::StoreClient;
use crate::entity::RecordEntity;
use crate::error::{FrameworkError, PublishError};
use crate::event::{DomainEvent, EventPublisher};
use crate::message::StoreRequest;
use crate::query::{ListFilter, Page};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// MOCK STORE
// =============================================================================

enum Expectation<T: RecordEntity> {
    Insert(Result<T, FrameworkError>),
    Get(T::Id, Result<Option<T>, FrameworkError>),
    GetByKey(String, Result<Option<T>, FrameworkError>),
    Exists(T::Id, Result<bool, FrameworkError>),
    ExistsByKey(String, Result<bool, FrameworkError>),
    List(Option<ListFilter>, Result<Page<T>, FrameworkError>),
    Update(T::Id, Result<T, FrameworkError>),
    Delete(T::Id, Result<(), FrameworkError>),
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A store client backed by scripted expectations, answered in order.
///
/// A request that does not match the next expectation (wrong operation or wrong id/key)
/// panics the mock task; the caller then sees `StoreDropped`.
pub struct MockStore<T: RecordEntity> {
    client: StoreClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: RecordEntity> Default for MockStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RecordEntity> MockStore<T> {
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().unwrap().pop_front();
                match (request, next) {
                    (StoreRequest::Insert { respond_to, .. }, Some(Expectation::Insert(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (StoreRequest::Get { id, respond_to }, Some(Expectation::Get(want, r))) => {
                        assert_eq!(id, want, "MockStore: unexpected get id");
                        let _ = respond_to.send(r);
                    }
                    (
                        StoreRequest::GetByKey { key, respond_to },
                        Some(Expectation::GetByKey(want, r)),
                    ) => {
                        assert_eq!(key, want, "MockStore: unexpected get_by_key key");
                        let _ = respond_to.send(r);
                    }
                    (
                        StoreRequest::Exists { id, respond_to },
                        Some(Expectation::Exists(want, r)),
                    ) => {
                        assert_eq!(id, want, "MockStore: unexpected exists id");
                        let _ = respond_to.send(r);
                    }
                    (
                        StoreRequest::ExistsByKey { key, respond_to },
                        Some(Expectation::ExistsByKey(want, r)),
                    ) => {
                        assert_eq!(key, want, "MockStore: unexpected exists_by_key key");
                        let _ = respond_to.send(r);
                    }
                    (
                        StoreRequest::List {
                            filter, respond_to, ..
                        },
                        Some(Expectation::List(want, r)),
                    ) => {
                        if let Some(want) = want {
                            assert_eq!(filter, want, "MockStore: unexpected list filter");
                        }
                        let _ = respond_to.send(r);
                    }
                    (
                        StoreRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update(want, r)),
                    ) => {
                        assert_eq!(id, want, "MockStore: unexpected update id");
                        let _ = respond_to.send(r);
                    }
                    (
                        StoreRequest::Delete { id, respond_to },
                        Some(Expectation::Delete(want, r)),
                    ) => {
                        assert_eq!(id, want, "MockStore: unexpected delete id");
                        let _ = respond_to.send(r);
                    }
                    (request, _) => {
                        panic!("MockStore: unexpected request {request:?}");
                    }
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client to hand to the code under test.
    pub fn client(&self) -> StoreClient<T> {
        self.client.clone()
    }

    fn builder<R: Send + 'static>(
        &self,
        wrap: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap: Box::new(wrap),
        }
    }

    pub fn expect_insert(&mut self) -> ExpectationBuilder<T, T> {
        self.builder(Expectation::Insert)
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |r| Expectation::Get(id, r))
    }

    pub fn expect_get_by_key(&mut self, key: impl Into<String>) -> ExpectationBuilder<T, Option<T>> {
        let key = key.into();
        self.builder(move |r| Expectation::GetByKey(key, r))
    }

    pub fn expect_exists(&mut self, id: T::Id) -> ExpectationBuilder<T, bool> {
        self.builder(move |r| Expectation::Exists(id, r))
    }

    pub fn expect_exists_by_key(&mut self, key: impl Into<String>) -> ExpectationBuilder<T, bool> {
        let key = key.into();
        self.builder(move |r| Expectation::ExistsByKey(key, r))
    }

    /// Expect a listing; pass `Some(filter)` to also assert the filter that reaches the store.
    pub fn expect_list(&mut self, filter: Option<ListFilter>) -> ExpectationBuilder<T, Page<T>> {
        self.builder(move |r| Expectation::List(filter, r))
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |r| Expectation::Update(id, r))
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(move |r| Expectation::Delete(id, r))
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Fluent builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<T: RecordEntity, R> {
    expectations: Expectations<T>,
    #[allow(clippy::type_complexity)]
    wrap: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: RecordEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        let expectation = (self.wrap)(Ok(value));
        self.expectations.lock().unwrap().push_back(expectation);
    }

    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.wrap)(Err(error));
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// MOCK PUBLISHER
// =============================================================================

/// Publisher that records accepted events and can simulate outages.
#[derive(Default)]
pub struct MockPublisher {
    unavailable: AtomicBool,
    hanging: AtomicBool,
    attempts: AtomicU32,
    events: Mutex<Vec<DomainEvent>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `false` makes every publish fail with `Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// `true` makes every publish block forever (exercise timeouts).
    pub fn set_hanging(&self, hanging: bool) {
        self.hanging.store(hanging, Ordering::SeqCst);
    }

    /// Number of publish calls, successful or not.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn routing_keys(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| event.routing_key)
            .collect()
    }
}

#[async_trait]
impl EventPublisher for MockPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), PublishError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.hanging.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PublishError::Unavailable("mock broker is down".into()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a client and the raw receiver behind it, for tests that want to answer requests
/// by hand.
pub fn create_mock_store<T: RecordEntity>(
    buffer_size: usize,
) -> (StoreClient<T>, mpsc::Receiver<StoreRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Waits for the next request and returns it if it is an insert.
pub async fn expect_insert<T: RecordEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(T::Create, crate::message::Response<T>)> {
    match receiver.recv().await {
        Some(StoreRequest::Insert { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}
