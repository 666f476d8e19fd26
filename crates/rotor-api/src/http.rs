use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rotor_model::{TaskHandle, TaskSpec, TaskView};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::ApiError, handler::ApiHandler, upload::UploadForm};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST /api/v1/tasks - Create task from a JSON spec
    /// - POST /api/v1/tasks/upload - Create task from a multipart form
    /// - GET /api/v1/tasks - List all tasks
    /// - GET /api/v1/tasks/{handle} - Task status
    /// - GET /api/v1/tasks/{handle}/logs - Task activity log
    /// - POST /api/v1/tasks/{handle}/stop - Stop task
    pub fn router(self) -> Router {
        Router::new()
            .route("/api/v1/tasks", post(create_task::<H>).get(list_tasks::<H>))
            .route("/api/v1/tasks/upload", post(upload_task::<H>))
            .route("/api/v1/tasks/{handle}", get(task_status::<H>))
            .route("/api/v1/tasks/{handle}/logs", get(task_logs::<H>))
            .route("/api/v1/tasks/{handle}/stop", post(stop_task::<H>))
            .with_state(self.handler)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct CreateTaskRequest {
    spec: TaskSpec,
}

#[derive(Debug, Serialize, Deserialize)]
struct CreateTaskResponse {
    handle: TaskHandle,
}

#[derive(Debug, Serialize, Deserialize)]
struct ListTasksResponse {
    tasks: Vec<TaskView>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TaskLogsResponse {
    handle: TaskHandle,
    lines: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/tasks
async fn create_task<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    debug!(spec = ?req.spec, "creating task");
    let handle = handler.create_task(req.spec).await?;
    Ok((StatusCode::CREATED, Json(CreateTaskResponse { handle })))
}

/// POST /api/v1/tasks/upload
///
/// Multipart fields: `tokenFile`, `txtFile`, `postId`, `prefix`, `time`.
async fn upload_task<H>(
    State(handler): State<Arc<H>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let spec = UploadForm::read(multipart).await?.into_spec()?;
    debug!(spec = ?spec, "creating task from upload");
    let handle = handler.create_task(spec).await?;
    Ok((StatusCode::CREATED, Json(CreateTaskResponse { handle })))
}

/// GET /api/v1/tasks
async fn list_tasks<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let tasks = handler.list_tasks().await?;
    debug!(count = tasks.len(), "listing tasks");
    Ok(Json(ListTasksResponse { tasks }))
}

/// GET /api/v1/tasks/{handle}
async fn task_status<H>(
    State(handler): State<Arc<H>>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let handle = TaskHandle::from(handle);
    debug!(%handle, "getting task status");
    let view = handler.task_status(&handle).await?;
    Ok(Json(view))
}

/// GET /api/v1/tasks/{handle}/logs
async fn task_logs<H>(
    State(handler): State<Arc<H>>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let handle = TaskHandle::from(handle);
    debug!(%handle, "getting task logs");
    let lines = handler.task_logs(&handle).await?;
    Ok(Json(TaskLogsResponse { handle, lines }))
}

/// POST /api/v1/tasks/{handle}/stop
async fn stop_task<H>(
    State(handler): State<Arc<H>>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let handle = TaskHandle::from(handle);
    debug!(%handle, "stopping task");
    handler.stop_task(&handle).await?;
    Ok(StatusCode::NO_CONTENT)
}
