//! # Lifecycle Services
//!
//! One service per record kind. Each is a thin, cloneable, stateless wrapper around a
//! [`StoreClient`](record_framework::StoreClient) and an
//! [`EventEmitter`](record_framework::EventEmitter); the shared flow lives in
//! [`RecordLifecycle`].
//!
//! | Service | Identifying field | Category filter |
//! |---|---|---|
//! | [`StudentService`] | enrollment code (generated when absent) | class group |
//! | [`UserService`] | email | role |
//! | [`ProfessorService`] | email | specialty |
//! | [`StaffService`] | email | position |

pub mod lifecycle;
pub mod professor_service;
pub mod staff_service;
pub mod student_service;
pub mod user_service;

pub use lifecycle::RecordLifecycle;
pub use professor_service::ProfessorService;
pub use staff_service::StaffService;
pub use student_service::StudentService;
pub use user_service::UserService;
