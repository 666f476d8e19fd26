use std::{
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::{Duration, SystemTime},
};

use rotor_model::{TaskHandle, TaskSpec, TaskState, TaskView};

use crate::{error::CoreError, log::LogRing, payload::PayloadCycle, pool::CredentialPool};

/// Everything known about one task, shared between its worker and the manager.
///
/// The worker is the only writer; the manager reads through [`TaskRecord::view`]
/// and [`LogRing::lines`].
pub(crate) struct TaskRecord {
    pub handle: TaskHandle,
    pub target: String,
    pub prefix: String,
    pub interval_secs: u64,
    pub created_at: SystemTime,
    pub pool: CredentialPool,
    pub payloads: PayloadCycle,
    pub log: LogRing,

    alive: AtomicBool,
    finished: AtomicBool,
    state: Mutex<TaskState>,
    attempts: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
}

impl TaskRecord {
    /// Build the record for a validated spec. The task starts out alive and running.
    pub fn new(handle: TaskHandle, spec: TaskSpec, log_capacity: usize) -> Result<Self, CoreError> {
        spec.validate()?;
        Ok(Self {
            handle,
            target: spec.target,
            prefix: spec.prefix,
            interval_secs: spec.interval_secs,
            created_at: SystemTime::now(),
            pool: CredentialPool::new(spec.credentials)?,
            payloads: PayloadCycle::new(spec.payloads)?,
            log: LogRing::new(log_capacity),
            alive: AtomicBool::new(true),
            finished: AtomicBool::new(false),
            state: Mutex::new(TaskState::Running),
            attempts: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// `prefix + " " + payload`, trimmed.
    pub fn compose(&self, payload: &str) -> String {
        format!("{} {}", self.prefix, payload).trim().to_string()
    }

    pub fn record_success(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn state(&self) -> TaskState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move to a terminal state. Only the first call has an effect.
    pub fn finish(&self, terminal: TaskState) -> bool {
        debug_assert!(terminal.is_terminal());
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_terminal() {
            return false;
        }
        *state = terminal;
        self.finished.store(true, Ordering::Release);
        true
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::Release);
    }

    pub fn view(&self) -> TaskView {
        TaskView {
            handle: self.handle.clone(),
            alive: self.is_alive(),
            target: self.target.clone(),
            prefix: self.prefix.clone(),
            interval_secs: self.interval_secs,
            finished: self.is_finished(),
            state: self.state(),
            credential_count: self.pool.len(),
            live_credentials: self.pool.live_count(),
            payload_count: self.payloads.len(),
            attempts: self.attempts.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prefix: &str) -> TaskRecord {
        let spec = TaskSpec::new(vec!["a".into(), "b".into()], vec!["x".into()], "post")
            .with_prefix(prefix)
            .with_interval(3);
        TaskRecord::new(TaskHandle::from("h"), spec, 10).unwrap()
    }

    #[test]
    fn invalid_spec_is_rejected() {
        let spec = TaskSpec::new(vec![], vec!["x".into()], "post");
        assert!(matches!(
            TaskRecord::new(TaskHandle::from("h"), spec, 10),
            Err(CoreError::InvalidSpec(_))
        ));
    }

    #[test]
    fn compose_trims_empty_prefix() {
        assert_eq!(record("").compose("hello"), "hello");
        assert_eq!(record("[BOT]").compose("hello"), "[BOT] hello");
        assert_eq!(record("  ").compose(" hi "), "hi");
    }

    #[test]
    fn finish_happens_once() {
        let r = record("");
        assert!(!r.is_finished());
        assert!(r.finish(TaskState::Exhausted));
        assert!(!r.finish(TaskState::Cancelled));
        assert_eq!(r.state(), TaskState::Exhausted);
        assert!(r.is_finished());
    }

    #[test]
    fn view_reflects_counters() {
        let r = record("p");
        r.record_success();
        r.record_failure();
        r.record_failure();
        r.pool.invalidate(0);

        let v = r.view();
        assert_eq!(v.attempts, 3);
        assert_eq!(v.successes, 1);
        assert_eq!(v.failures, 2);
        assert_eq!(v.credential_count, 2);
        assert_eq!(v.live_credentials, 1);
        assert_eq!(v.payload_count, 1);
        assert_eq!(v.interval_secs, 3);
        assert!(v.alive);
        assert_eq!(v.state, TaskState::Running);
    }
}
