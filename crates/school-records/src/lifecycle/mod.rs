//! # System Lifecycle
//!
//! [`SchoolSystem`] creates every store, the redelivery worker and the services, spawns the
//! tasks, and shuts them down in order:
//!
//! 1. **Drop all services** - their store clients and emitters close the channels
//! 2. **Stores detect closure** - `receiver.recv()` returns `None`, the loop logs and exits
//! 3. **Redelivery drains** - queued events get their remaining retries before the worker exits
//! 4. **Await completion** - a panicked task surfaces as [`SystemError::Shutdown`](crate::error::SystemError)
//!
//! Nothing is persisted: records and undelivered events live only as long as the process.

pub mod school_system;

pub use school_system::*;
