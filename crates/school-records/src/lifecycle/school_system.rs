use crate::config::{ConfigError, SystemConfig};
use crate::enrollment::EnrollmentCodeGenerator;
use crate::error::SystemError;
use crate::model::{Professor, StaffMember, Student, User};
use crate::passwords::PasswordHashing;
use crate::services::{ProfessorService, StaffService, StudentService, UserService};
use record_framework::{
    DeadLetter, EventEmitter, EventPublisher, InMemoryBus, RecordStore, RedeliveryHandle,
    RedeliveryQueue,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

const BUS_CAPACITY: usize = 1024;

/// Runtime orchestrator for the four record kinds.
///
/// Owns one store task per kind plus the redelivery worker, and hands out the services
/// wired to them.
///
/// ```ignore
/// let system = SchoolSystem::new(SystemConfig::from_env()?)?;
/// let user = system.users.create(request).await?;
/// let dead_letters = system.shutdown().await?;
/// ```
pub struct SchoolSystem {
    pub students: StudentService,
    pub users: UserService,
    pub professors: ProfessorService,
    pub staff: StaffService,

    bus: Option<InMemoryBus>,
    redelivery: RedeliveryHandle,
    store_handles: Vec<JoinHandle<()>>,
    redelivery_handle: JoinHandle<Vec<DeadLetter>>,
}

impl SchoolSystem {
    /// Starts the system publishing to an in-process bus on `config.exchange`.
    pub fn new(config: SystemConfig) -> Result<Self, SystemError> {
        let bus = InMemoryBus::new(config.exchange.clone(), BUS_CAPACITY);
        let mut system = Self::with_publisher(config, Arc::new(bus.clone()))?;
        system.bus = Some(bus);
        Ok(system)
    }

    /// Starts the system publishing through `publisher`.
    pub fn with_publisher(
        config: SystemConfig,
        publisher: Arc<dyn EventPublisher>,
    ) -> Result<Self, SystemError> {
        Self::build(config, publisher, EnrollmentCodeGenerator::new())
    }

    /// Like [`SchoolSystem::with_publisher`], with a caller-supplied enrollment code generator.
    pub fn build(
        config: SystemConfig,
        publisher: Arc<dyn EventPublisher>,
        codes: EnrollmentCodeGenerator,
    ) -> Result<Self, SystemError> {
        let passwords =
            PasswordHashing::with_cost(config.password_memory_kib, config.password_iterations)
                .map_err(|_| ConfigError::Invalid {
                    key: "SCHOOL_PASSWORD_MEMORY_KIB",
                    value: format!(
                        "{} KiB x {} iterations",
                        config.password_memory_kib, config.password_iterations
                    ),
                })?;

        // 1. Redelivery worker, then the emitter that feeds it
        let (queue, redelivery) =
            RedeliveryQueue::new(publisher.clone(), config.redelivery_settings());
        let redelivery_handle = tokio::spawn(queue.run());
        let events =
            EventEmitter::new(publisher, config.emit_settings()).with_redelivery(redelivery.clone());

        // 2. One store per kind
        let buffer = config.store_buffer.max(1);
        let (student_store, student_client) = RecordStore::<Student>::new(buffer);
        let (user_store, user_client) = RecordStore::<User>::new(buffer);
        let (professor_store, professor_client) = RecordStore::<Professor>::new(buffer);
        let (staff_store, staff_client) = RecordStore::<StaffMember>::new(buffer);

        let store_handles = vec![
            tokio::spawn(student_store.run()),
            tokio::spawn(user_store.run()),
            tokio::spawn(professor_store.run()),
            tokio::spawn(staff_store.run()),
        ];

        info!(exchange = %config.exchange, "School system started");

        Ok(Self {
            students: StudentService::new(student_client, events.clone(), Arc::new(codes)),
            users: UserService::new(user_client, events.clone(), passwords),
            professors: ProfessorService::new(professor_client, events.clone()),
            staff: StaffService::new(staff_client, events),
            bus: None,
            redelivery,
            store_handles,
            redelivery_handle,
        })
    }

    /// The in-process bus, when the system was started with [`SchoolSystem::new`].
    pub fn bus(&self) -> Option<&InMemoryBus> {
        self.bus.as_ref()
    }

    /// Events that exhausted their background retries so far.
    pub async fn dead_letters(&self) -> Vec<DeadLetter> {
        self.redelivery.dead_letters().await
    }

    /// Hands over the dead letters collected so far, leaving the list empty.
    pub async fn take_dead_letters(&self) -> Vec<DeadLetter> {
        self.redelivery.take_dead_letters().await
    }

    /// Closes every channel and waits for all tasks.
    ///
    /// Stores stop once their services are dropped; the redelivery worker drains its backlog
    /// first. Returns the final dead-letter list.
    pub async fn shutdown(self) -> Result<Vec<DeadLetter>, SystemError> {
        info!("Shutting down school system...");

        drop(self.students);
        drop(self.users);
        drop(self.professors);
        drop(self.staff);
        drop(self.redelivery);

        for handle in self.store_handles {
            handle.await?;
        }
        let dead_letters = self.redelivery_handle.await?;

        info!(dead_letters = dead_letters.len(), "School system stopped");
        Ok(dead_letters)
    }
}
