use std::sync::Arc;

use rotor_model::TaskState;

/// Sink for engine counters.
///
/// The core only emits events; exporting them is up to the backend
/// (see the `rotor-prometheus` crate).
pub trait MetricsBackend: Send + Sync + 'static {
    /// A worker was spawned.
    fn task_started(&self);
    /// One remote attempt completed; `outcome` is `success` or a failure kind label.
    fn attempt_recorded(&self, outcome: &'static str);
    /// A credential was revoked after an authorization failure.
    fn credential_revoked(&self);
    /// A worker reached a terminal state.
    fn task_finished(&self, state: TaskState);
}

pub type MetricsHandle = Arc<dyn MetricsBackend>;

/// Backend that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    fn task_started(&self) {}
    fn attempt_recorded(&self, _outcome: &'static str) {}
    fn credential_revoked(&self) {}
    fn task_finished(&self, _state: TaskState) {}
}
