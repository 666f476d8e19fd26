use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::{IntervalSecs, TaskHandle, TaskState};

/// Point-in-time status of a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub handle: TaskHandle,
    /// Whether the worker is still executing.
    pub alive: bool,
    pub target: String,
    pub prefix: String,
    pub interval_secs: IntervalSecs,
    /// Set once the worker reached a terminal state.
    pub finished: bool,
    pub state: TaskState,
    /// Number of credentials the task was created with (stable).
    pub credential_count: usize,
    /// Credentials not yet revoked.
    pub live_credentials: usize,
    pub payload_count: usize,
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    /// When the task was created (unix seconds on the wire).
    #[serde(with = "time_serde")]
    pub created_at: SystemTime,
}

mod time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let since_epoch = time
            .duration_since(UNIX_EPOCH)
            .map_err(serde::ser::Error::custom)?;
        since_epoch.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + std::time::Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn task_view_serde_roundtrip() {
        let view = TaskView {
            handle: TaskHandle::from("h1"),
            alive: true,
            target: "post-1".into(),
            prefix: "[BOT]".into(),
            interval_secs: 10,
            finished: false,
            state: TaskState::Running,
            credential_count: 2,
            live_credentials: 1,
            payload_count: 3,
            attempts: 7,
            successes: 5,
            failures: 2,
            created_at: UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        };

        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains(r#""credentialCount":2"#));
        assert!(json.contains(r#""createdAt":1700000000"#));

        let back: TaskView = serde_json::from_str(&json).unwrap();
        assert_eq!(back.handle, view.handle);
        assert_eq!(back.state, view.state);
        assert_eq!(back.live_credentials, 1);
        assert_eq!(back.created_at, view.created_at);
    }
}
