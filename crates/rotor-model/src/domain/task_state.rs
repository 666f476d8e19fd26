use serde::{Deserialize, Serialize};

/// Lifecycle state of a task worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskState {
    /// Worker is rotating and sending.
    Running,
    /// Every credential has been revoked; nothing left to send with.
    Exhausted,
    /// A stop was requested.
    Cancelled,
}

impl TaskState {
    /// Returns `true` if the task is in a terminal state (won't transition further).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Exhausted | TaskState::Cancelled)
    }

    /// Returns a short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskState::Running => "running",
            TaskState::Exhausted => "exhausted",
            TaskState::Cancelled => "cancelled",
        }
    }
}
