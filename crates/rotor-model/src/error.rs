use thiserror::Error;

/// Validation failures of a [`TaskSpec`](crate::TaskSpec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("at least one credential is required")]
    NoCredentials,
    #[error("at least one payload is required")]
    NoPayloads,
    #[error("target must not be empty")]
    EmptyTarget,
    #[error("interval must be at least 1 second (got {0})")]
    InvalidInterval(u64),
}
