use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{IntervalSecs, ModelError};

/// Interval used when the caller does not provide one.
pub const DEFAULT_INTERVAL_SECS: IntervalSecs = 10;

/// Submission payload for a new rotation task.
///
/// `Debug` never prints credential secrets, only their count.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    /// Secrets used to authenticate remote calls, rotated round-robin.
    pub credentials: Vec<String>,
    /// Message variants, cycled with wraparound.
    pub payloads: Vec<String>,
    /// Remote object the messages are written to (e.g. a post id).
    pub target: String,
    /// Prepended to every payload, separated by a space.
    #[serde(default)]
    pub prefix: String,
    /// Pause between two attempts.
    #[serde(default = "default_interval")]
    pub interval_secs: IntervalSecs,
}

fn default_interval() -> IntervalSecs {
    DEFAULT_INTERVAL_SECS
}

impl TaskSpec {
    pub fn new(
        credentials: Vec<String>,
        payloads: Vec<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            payloads,
            target: target.into(),
            prefix: String::new(),
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_interval(mut self, secs: IntervalSecs) -> Self {
        self.interval_secs = secs;
        self
    }

    /// Check what a task needs before it can start.
    ///
    /// Order of checks is stable: credentials, payloads, target, interval.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.credentials.is_empty() {
            return Err(ModelError::NoCredentials);
        }
        if self.payloads.is_empty() {
            return Err(ModelError::NoPayloads);
        }
        if self.target.trim().is_empty() {
            return Err(ModelError::EmptyTarget);
        }
        if self.interval_secs == 0 {
            return Err(ModelError::InvalidInterval(self.interval_secs));
        }
        Ok(())
    }
}

impl fmt::Debug for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpec")
            .field("credentials", &format_args!("<{} redacted>", self.credentials.len()))
            .field("payloads", &self.payloads.len())
            .field("target", &self.target)
            .field("prefix", &self.prefix)
            .field("interval_secs", &self.interval_secs)
            .finish()
    }
}
