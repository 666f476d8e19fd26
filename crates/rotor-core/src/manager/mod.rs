//! Process-wide registry of rotation tasks.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use rotor_core::{ManagerConfig, RemoteOperation, TaskManager};
//! use rotor_model::TaskSpec;
//!
//! # async fn demo(remote: Arc<dyn RemoteOperation>) -> Result<(), rotor_core::CoreError> {
//! let manager = TaskManager::builder(remote)
//!     .with_config(ManagerConfig::default())
//!     .build();
//!
//! let spec = TaskSpec::new(vec!["token".into()], vec!["hello".into()], "post-1");
//! let handle = manager.create(spec)?;
//!
//! let view = manager.status(&handle)?;
//! assert!(view.alive);
//!
//! manager.stop(&handle)?;
//! # Ok(())
//! # }
//! ```

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use rotor_model::{TaskHandle, TaskSpec, TaskView};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::{
    backoff::BackoffPolicy,
    error::CoreError,
    log::DEFAULT_LOG_CAPACITY,
    metrics::{MetricsHandle, NoOpMetrics},
    remote::RemoteOperation,
    state::TaskRecord,
    worker::TaskWorker,
};

/// Tuning shared by every task of a manager.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Lines kept per task log.
    pub log_capacity: usize,
    /// Upper bound for a single remote call.
    pub call_timeout: Duration,
    pub backoff: BackoffPolicy,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            call_timeout: Duration::from_secs(15),
            backoff: BackoffPolicy::default(),
        }
    }
}

struct TaskEntry {
    record: Arc<TaskRecord>,
    token: CancellationToken,
}

struct ManagerInner {
    tasks: RwLock<HashMap<TaskHandle, TaskEntry>>,
    remote: Arc<dyn RemoteOperation>,
    metrics: MetricsHandle,
    config: ManagerConfig,
    root: CancellationToken,
}

/// Creates, stops and reports on tasks. Cheap to clone; clones share the registry.
///
/// Tasks are never removed: a finished task stays queryable until the process exits.
#[derive(Clone)]
pub struct TaskManager {
    inner: Arc<ManagerInner>,
}

/// Builder for [`TaskManager`].
pub struct TaskManagerBuilder {
    remote: Arc<dyn RemoteOperation>,
    metrics: MetricsHandle,
    config: ManagerConfig,
}

impl TaskManagerBuilder {
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn build(self) -> TaskManager {
        TaskManager {
            inner: Arc::new(ManagerInner {
                tasks: RwLock::new(HashMap::new()),
                remote: self.remote,
                metrics: self.metrics,
                config: self.config,
                root: CancellationToken::new(),
            }),
        }
    }
}

impl TaskManager {
    pub fn builder(remote: Arc<dyn RemoteOperation>) -> TaskManagerBuilder {
        TaskManagerBuilder {
            remote,
            metrics: Arc::new(NoOpMetrics),
            config: ManagerConfig::default(),
        }
    }

    /// Manager with default config and no metrics.
    pub fn new(remote: Arc<dyn RemoteOperation>) -> Self {
        Self::builder(remote).build()
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.inner.config
    }

    /// Validate `spec`, register the task and spawn its worker.
    ///
    /// Returns as soon as the worker is spawned. Must be called from within a tokio runtime.
    #[instrument(level = "debug", skip(self, spec), fields(target = %spec.target))]
    pub fn create(&self, spec: TaskSpec) -> Result<TaskHandle, CoreError> {
        spec.validate()?;

        let (record, token) = {
            let mut tasks = self.write_tasks();
            let handle = loop {
                let candidate = TaskHandle::generate();
                if !tasks.contains_key(&candidate) {
                    break candidate;
                }
            };

            let record = Arc::new(TaskRecord::new(
                handle.clone(),
                spec,
                self.inner.config.log_capacity,
            )?);
            let token = self.inner.root.child_token();
            tasks.insert(
                handle,
                TaskEntry {
                    record: Arc::clone(&record),
                    token: token.clone(),
                },
            );
            (record, token)
        };

        let handle = record.handle.clone();
        let worker = TaskWorker::new(
            record,
            Arc::clone(&self.inner.remote),
            self.inner.config.backoff,
            self.inner.config.call_timeout,
            token,
            Arc::clone(&self.inner.metrics),
        );
        tokio::spawn(worker.run());
        self.inner.metrics.task_started();

        info!(%handle, "task created");
        Ok(handle)
    }

    /// Request cancellation. Idempotent and non-blocking.
    pub fn stop(&self, handle: &TaskHandle) -> Result<(), CoreError> {
        let tasks = self.read_tasks();
        let entry = tasks
            .get(handle)
            .ok_or_else(|| CoreError::UnknownTask(handle.clone()))?;

        if !entry.token.is_cancelled() {
            entry.token.cancel();
            info!(%handle, "task stop requested");
        } else {
            debug!(%handle, "task already stopping");
        }
        Ok(())
    }

    pub fn status(&self, handle: &TaskHandle) -> Result<TaskView, CoreError> {
        self.with_record(handle, |record| record.view())
    }

    /// Snapshot of the task log, oldest line first.
    pub fn logs(&self, handle: &TaskHandle) -> Result<Vec<String>, CoreError> {
        self.with_record(handle, |record| record.log.lines())
    }

    /// Every known task, newest first.
    pub fn list(&self) -> Vec<TaskView> {
        let mut views: Vec<TaskView> = self
            .read_tasks()
            .values()
            .map(|entry| entry.record.view())
            .collect();
        views.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.handle.cmp(&b.handle))
        });
        views
    }

    /// Cancel every task, including ones created afterwards.
    pub fn shutdown(&self) {
        info!("cancelling all tasks");
        self.inner.root.cancel();
    }

    fn with_record<T>(
        &self,
        handle: &TaskHandle,
        f: impl FnOnce(&TaskRecord) -> T,
    ) -> Result<T, CoreError> {
        let tasks = self.read_tasks();
        tasks
            .get(handle)
            .map(|entry| f(&entry.record))
            .ok_or_else(|| CoreError::UnknownTask(handle.clone()))
    }

    fn read_tasks(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<TaskHandle, TaskEntry>> {
        self.inner.tasks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tasks(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<TaskHandle, TaskEntry>> {
        self.inner.tasks.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRemote;
    use rotor_model::{FailureKind, Outcome, TaskState};

    fn spec(creds: &[&str], payloads: &[&str]) -> TaskSpec {
        TaskSpec::new(
            creds.iter().map(|s| s.to_string()).collect(),
            payloads.iter().map(|s| s.to_string()).collect(),
            "post-1",
        )
        .with_interval(1)
    }

    fn manager(remote: Arc<ScriptedRemote>) -> TaskManager {
        TaskManager::new(remote)
    }

    async fn wait_until_dead(m: &TaskManager, h: &TaskHandle) -> TaskView {
        for _ in 0..100 {
            let view = m.status(h).unwrap();
            if !view.alive {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("task {h} still alive");
    }

    #[tokio::test(start_paused = true)]
    async fn create_rejects_invalid_spec() {
        let m = manager(Arc::new(ScriptedRemote::always(Outcome::success(None))));

        for bad in [
            spec(&[], &["x"]),
            spec(&["a"], &[]),
            spec(&["a"], &["x"]).with_interval(0),
            TaskSpec::new(vec!["a".into()], vec!["x".into()], ""),
        ] {
            assert!(matches!(m.create(bad), Err(CoreError::InvalidSpec(_))));
        }
        assert!(m.list().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_handle_is_reported() {
        let m = manager(Arc::new(ScriptedRemote::always(Outcome::success(None))));
        let missing = TaskHandle::from("nope");

        assert!(matches!(m.stop(&missing), Err(CoreError::UnknownTask(_))));
        assert!(matches!(m.status(&missing), Err(CoreError::UnknownTask(_))));
        assert!(matches!(m.logs(&missing), Err(CoreError::UnknownTask(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn create_returns_running_task() {
        let m = manager(Arc::new(ScriptedRemote::always(Outcome::success(None))));
        let h = m.create(spec(&["a", "b"], &["x", "y", "z"]).with_prefix("[BOT]")).unwrap();

        let view = m.status(&h).unwrap();
        assert!(view.alive);
        assert!(!view.finished);
        assert_eq!(view.state, TaskState::Running);
        assert_eq!(view.target, "post-1");
        assert_eq!(view.prefix, "[BOT]");
        assert_eq!(view.interval_secs, 1);
        assert_eq!(view.credential_count, 2);
        assert_eq!(view.payload_count, 3);

        m.stop(&h).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_finishes_task() {
        let m = manager(Arc::new(ScriptedRemote::always(Outcome::success(None))));
        let h = m.create(spec(&["a"], &["x"])).unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let before = m.logs(&h).unwrap().len();
        m.stop(&h).unwrap();
        m.stop(&h).unwrap();

        let view = wait_until_dead(&m, &h).await;
        assert!(view.finished);
        assert_eq!(view.state, TaskState::Cancelled);

        let logs = m.logs(&h).unwrap();
        assert_eq!(logs.len(), before + 1);
        assert!(logs.last().unwrap().ends_with(" finished"));
    }

    #[tokio::test(start_paused = true)]
    async fn revoked_credentials_exhaust_the_task() {
        let remote = Arc::new(ScriptedRemote::always(Outcome::failure(
            FailureKind::AuthError,
            "Error validating access token",
        )));
        let m = manager(remote.clone());
        let h = m.create(spec(&["a", "b"], &["x"])).unwrap();

        let view = wait_until_dead(&m, &h).await;
        assert!(view.finished);
        assert!(!view.alive);
        assert_eq!(view.state, TaskState::Exhausted);
        assert_eq!(view.credential_count, 2);
        assert_eq!(view.live_credentials, 0);
        assert_eq!(remote.calls().len(), 2);

        // stopping a finished task is still fine
        m.stop(&h).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn tasks_are_isolated() {
        let remote = Arc::new(ScriptedRemote::always(Outcome::success(None)));
        let m = manager(remote);
        let a = m.create(spec(&["a"], &["x"])).unwrap();
        let b = m.create(spec(&["b"], &["y"])).unwrap();
        assert_ne!(a, b);

        m.stop(&a).unwrap();
        wait_until_dead(&m, &a).await;

        let vb = m.status(&b).unwrap();
        assert!(vb.alive);
        assert!(!vb.finished);
        assert_eq!(m.list().len(), 2);

        m.stop(&b).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_everything() {
        let m = manager(Arc::new(ScriptedRemote::always(Outcome::success(None))));
        let handles: Vec<_> = (0..3)
            .map(|_| m.create(spec(&["a"], &["x"])).unwrap())
            .collect();

        m.shutdown();
        for h in &handles {
            let view = wait_until_dead(&m, h).await;
            assert_eq!(view.state, TaskState::Cancelled);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn logs_are_bounded_by_capacity() {
        let remote = Arc::new(ScriptedRemote::always(Outcome::success(None)));
        let m = TaskManager::builder(remote)
            .with_config(ManagerConfig {
                log_capacity: 5,
                ..ManagerConfig::default()
            })
            .build();
        let h = m.create(spec(&["a"], &["x"])).unwrap();

        tokio::time::sleep(Duration::from_secs(20)).await;
        let logs = m.logs(&h).unwrap();
        assert_eq!(logs.len(), 5);
        assert!(!logs.iter().any(|l| l.contains("started:")));

        m.stop(&h).unwrap();
    }
}
