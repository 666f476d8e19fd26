use async_trait::async_trait;
use rotor_core::TaskManager;
use rotor_model::{TaskHandle, TaskSpec, TaskView};

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// Adapter that bridges `TaskManager` to `ApiHandler`.
///
/// This is a ready-to-use implementation that directly delegates to `TaskManager`.
pub struct ManagerAdapter {
    manager: TaskManager,
}

impl ManagerAdapter {
    /// Create a new adapter wrapping the given manager.
    pub fn new(manager: TaskManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl ApiHandler for ManagerAdapter {
    async fn create_task(&self, spec: TaskSpec) -> Result<TaskHandle, ApiError> {
        self.manager.create(spec).map_err(ApiError::from)
    }

    async fn stop_task(&self, handle: &TaskHandle) -> Result<(), ApiError> {
        self.manager.stop(handle).map_err(ApiError::from)
    }

    async fn task_status(&self, handle: &TaskHandle) -> Result<TaskView, ApiError> {
        self.manager.status(handle).map_err(ApiError::from)
    }

    async fn task_logs(&self, handle: &TaskHandle) -> Result<Vec<String>, ApiError> {
        self.manager.logs(handle).map_err(ApiError::from)
    }

    async fn list_tasks(&self) -> Result<Vec<TaskView>, ApiError> {
        Ok(self.manager.list())
    }
}
