//! Prometheus metrics backend for the rotor task engine.
//!
//! This crate provides a [`PrometheusMetrics`] implementation of [`rotor_core::MetricsBackend`].
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use rotor_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let handle: rotor_core::MetricsHandle = Arc::new(metrics.clone());
//!
//! // pass `handle` to `TaskManager::builder(..).with_metrics(handle)`
//! let text = metrics.render()?;
//! assert!(text.is_empty() || text.contains("rotor_"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `rotor_tasks_started_total` - Counter
//! - `rotor_attempts_total{outcome}` - Counter
//! - `rotor_credentials_revoked_total` - Counter
//! - `rotor_tasks_finished_total{state}` - Counter
//!
//! ## HTTP Server
//! This crate does NOT serve `/metrics`; the daemon mounts [`PrometheusMetrics::render`]
//! on its own router.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
