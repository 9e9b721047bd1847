//! Observability subsystem
//!
//! Structured one-line JSON logging with deterministic key ordering.
//! Logging is synchronous, unbuffered, and must never affect the
//! outcome of the operation being logged.

mod logger;

pub use logger::{Logger, Severity};
