use async_trait::async_trait;
use rotor_model::{TaskHandle, TaskSpec, TaskView};

use crate::error::ApiError;

/// Task API handler.
///
/// This trait abstracts the backend implementation, allowing users to:
/// - Use the provided `ManagerAdapter`
/// - Implement custom handlers with additional logic (auth, quotas, etc.)
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Start a new rotation task.
    async fn create_task(&self, spec: TaskSpec) -> Result<TaskHandle, ApiError>;

    /// Ask a task to stop. Does not wait for the worker.
    async fn stop_task(&self, handle: &TaskHandle) -> Result<(), ApiError>;

    /// Current status of a task.
    async fn task_status(&self, handle: &TaskHandle) -> Result<TaskView, ApiError>;

    /// Snapshot of the task activity log, oldest first.
    async fn task_logs(&self, handle: &TaskHandle) -> Result<Vec<String>, ApiError>;

    /// All known tasks.
    async fn list_tasks(&self) -> Result<Vec<TaskView>, ApiError>;
}
