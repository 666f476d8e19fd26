use rotor_model::{ModelError, TaskHandle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid spec: {0}")]
    InvalidSpec(String),

    #[error("unknown task: {0}")]
    UnknownTask(TaskHandle),

    /// No live credential left. Terminal for the worker, never returned to callers.
    #[error("credential pool exhausted")]
    ExhaustedPool,
}

impl From<ModelError> for CoreError {
    fn from(e: ModelError) -> Self {
        CoreError::InvalidSpec(e.to_string())
    }
}
