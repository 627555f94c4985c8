//! # Logging Setup
//!
//! [`setup_tracing`] installs a compact `tracing_subscriber` formatter filtered by `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info cargo run     # lifecycle and write logs
//! RUST_LOG=debug cargo run    # plus full payloads and every lookup
//! RUST_LOG=record_framework=debug,school_records=info cargo run
//! ```
//!
//! Stores log with a `kind` field instead of a module path, so targets are hidden:
//!
//! ```text
//! INFO create_student: Inserted kind="student" id=1 size=1
//! WARN create_user: Publish attempt failed routing_key=user.created attempt=1 error=Broker unavailable: ...
//! ```

/// Call once at process start. Panics if a global subscriber is already set.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
