use std::{sync::Arc, time::Duration};

use rotor_model::{FailureKind, Outcome, TaskState};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{
    backoff::BackoffPolicy, metrics::MetricsHandle, remote::RemoteOperation, state::TaskRecord,
};

/// Per-task control loop: select, send, observe, react, wait.
///
/// Runs until the token is cancelled or every credential has been revoked.
/// Attempts are strictly sequential; the in-flight remote call is never preempted,
/// cancellation is observed at the top of the loop, right after a call returns and
/// during every wait.
pub(crate) struct TaskWorker {
    record: Arc<TaskRecord>,
    remote: Arc<dyn RemoteOperation>,
    backoff: BackoffPolicy,
    call_timeout: Duration,
    token: CancellationToken,
    metrics: MetricsHandle,
}

/// Clears the liveness flag when the worker exits, including by panic.
struct AliveGuard<'a>(&'a TaskRecord);

impl Drop for AliveGuard<'_> {
    fn drop(&mut self) {
        self.0.mark_dead();
    }
}

impl TaskWorker {
    pub fn new(
        record: Arc<TaskRecord>,
        remote: Arc<dyn RemoteOperation>,
        backoff: BackoffPolicy,
        call_timeout: Duration,
        token: CancellationToken,
        metrics: MetricsHandle,
    ) -> Self {
        Self {
            record,
            remote,
            backoff,
            call_timeout,
            token,
            metrics,
        }
    }

    /// Drive the task to a terminal state and return it.
    pub async fn run(self) -> TaskState {
        let span = info_span!("task", handle = %self.record.handle, target = %self.record.target);
        async move {
            let _alive = AliveGuard(&self.record);
            let terminal = self.cycle().await;

            self.record.log.push("finished");
            if self.record.finish(terminal) {
                self.metrics.task_finished(terminal);
            }
            info!(target: "rotor.core.worker", state = terminal.as_label(), "worker finished");
            terminal
        }
        .instrument(span)
        .await
    }

    async fn cycle(&self) -> TaskState {
        let record = &self.record;
        let mut cred_cursor: u64 = 0;
        let mut payload_cursor: u64 = 0;
        let mut consecutive_failures: u32 = 0;

        record.log.push(format!(
            "started: target={} credentials={} payloads={} interval={}s",
            record.target,
            record.pool.len(),
            record.payloads.len(),
            record.interval_secs
        ));
        info!(target: "rotor.core.worker", remote = self.remote.name(), "worker started");

        loop {
            if self.token.is_cancelled() {
                return TaskState::Cancelled;
            }

            let Ok((selected, next)) = record.pool.select(cred_cursor) else {
                record.log.push("no live credentials left, stopping");
                warn!(target: "rotor.core.worker", "credential pool exhausted");
                return TaskState::Exhausted;
            };
            cred_cursor = next;

            let (payload, next) = record.payloads.next(payload_cursor);
            payload_cursor = next;

            let message = record.compose(payload);
            let credential = record.pool.describe(selected.index);
            let outcome = self.call(selected.secret, &message).await;

            if self.token.is_cancelled() {
                debug!(target: "rotor.core.worker", "stop requested during call, outcome discarded");
                continue;
            }
            self.metrics.attempt_recorded(outcome.as_label());

            match outcome {
                Outcome::Success { remote_id } => {
                    consecutive_failures = 0;
                    record.record_success();
                    let id = remote_id.as_deref().unwrap_or("-");
                    record.log.push(format!("sent \"{message}\" with {credential} (id={id})"));
                    debug!(target: "rotor.core.worker", %credential, remote_id = id, "attempt succeeded");
                }
                Outcome::Failure { kind, detail } => {
                    consecutive_failures = consecutive_failures.saturating_add(1);
                    record.record_failure();
                    record.log.push(format!("failed with {credential}: {kind}: {detail}"));
                    warn!(
                        target: "rotor.core.worker",
                        %credential,
                        kind = kind.as_label(),
                        consecutive_failures,
                        "attempt failed: {detail}"
                    );

                    if kind.revokes_credential() && record.pool.invalidate(selected.index) {
                        let live = record.pool.live_count();
                        record.log.push(format!("revoked {credential}, {live} live left"));
                        info!(target: "rotor.core.worker", %credential, live, "credential revoked");
                        self.metrics.credential_revoked();
                    }

                    let delay = self.backoff.delay(consecutive_failures);
                    if !delay.is_zero() {
                        record.log.push(format!(
                            "backing off {}s after {consecutive_failures} consecutive failures",
                            delay.as_secs()
                        ));
                        if !self.pause(delay).await {
                            continue;
                        }
                    }
                }
            }

            let interval = record.interval();
            if !self.pause(interval).await {
                continue;
            }
        }
    }

    /// One remote call bounded by the call timeout. A timeout counts as transient.
    async fn call(&self, secret: &str, message: &str) -> Outcome {
        let attempt = self.remote.attempt(secret, &self.record.target, message);
        match tokio::time::timeout(self.call_timeout, attempt).await {
            Ok(outcome) => outcome,
            Err(_) => Outcome::failure(
                FailureKind::Transient,
                format!("timed out after {:?}", self.call_timeout),
            ),
        }
    }

    /// Sleep for `d` unless cancelled first. Returns `false` on cancellation.
    async fn pause(&self, d: Duration) -> bool {
        tokio::select! {
            _ = self.token.cancelled() => false,
            _ = tokio::time::sleep(d) => true,
        }
    }
}
