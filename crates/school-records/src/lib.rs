//! # School Records
//!
//! Lifecycle services for the four record kinds of a school (students, users, professors and
//! administrative staff). Each write is announced on the message bus as
//! `<kind>.created`, `<kind>.updated` or `<kind>.deleted`.
//!
//! - **[model]**: the records and their create/update payloads.
//! - **[services]**: one lifecycle service per kind, sharing [`services::RecordLifecycle`].
//! - **[enrollment]**: generated student enrollment codes.
//! - **[lifecycle]**: [`lifecycle::SchoolSystem`], which starts and stops everything.
//! - **[config]**: `SCHOOL_*` environment configuration.
//!
//! ## Delivery policy
//!
//! A committed write is never rolled back because the bus is down. Each service publishes
//! after commit with a bounded timeout; events that still fail are retried in the background
//! and end up as dead letters if the bus stays down.

pub mod config;
pub mod enrollment;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod passwords;
pub mod services;
pub mod validation;
