use prometheus::{
    Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder, proto::MetricFamily,
};
use rotor_core::MetricsBackend;
use rotor_model::TaskState;

/// Counters registered in a dedicated [`Registry`].
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    tasks_started: IntCounter,
    attempts: IntCounterVec,
    credentials_revoked: IntCounter,
    tasks_finished: IntCounterVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let tasks_started =
            IntCounter::new("rotor_tasks_started_total", "Number of task workers spawned")?;
        let attempts = IntCounterVec::new(
            Opts::new("rotor_attempts_total", "Remote attempts by outcome"),
            &["outcome"],
        )?;
        let credentials_revoked = IntCounter::new(
            "rotor_credentials_revoked_total",
            "Credentials revoked after authorization failures",
        )?;
        let tasks_finished = IntCounterVec::new(
            Opts::new("rotor_tasks_finished_total", "Task workers finished by terminal state"),
            &["state"],
        )?;

        registry.register(Box::new(tasks_started.clone()))?;
        registry.register(Box::new(attempts.clone()))?;
        registry.register(Box::new(credentials_revoked.clone()))?;
        registry.register(Box::new(tasks_finished.clone()))?;

        Ok(Self {
            registry,
            tasks_started,
            attempts,
            credentials_revoked,
            tasks_finished,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition format, ready to serve on `/metrics`.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn task_started(&self) {
        self.tasks_started.inc();
    }

    fn attempt_recorded(&self, outcome: &'static str) {
        self.attempts.with_label_values(&[outcome]).inc();
    }

    fn credential_revoked(&self) {
        self.credentials_revoked.inc();
    }

    fn task_finished(&self, state: TaskState) {
        self.tasks_finished
            .with_label_values(&[state.as_label()])
            .inc();
    }
}
