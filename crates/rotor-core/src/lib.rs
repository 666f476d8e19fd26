//! Task engine: rotates credentials and payloads against a pluggable remote operation.
//!
//! The [`TaskManager`] is the entry point. Each created task gets its own worker running
//! on the tokio runtime; the manager only keeps shared, read-mostly state about it.

mod error;
pub use error::CoreError;

pub mod backoff;
pub use backoff::BackoffPolicy;

pub mod log;
pub use log::{LogEntry, LogRing};

pub mod pool;
pub use pool::{CredentialPool, Selected};

pub mod payload;
pub use payload::PayloadCycle;

pub mod remote;
pub use remote::RemoteOperation;

pub mod metrics;
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics};

mod state;
mod worker;

pub mod manager;
pub use manager::{ManagerConfig, TaskManager, TaskManagerBuilder};

#[cfg(test)]
mod testing;
