// crates/backend-lib/src/handlers/tasks.rs

//! Owner-scoped task endpoints under `/api/{user_id}/tasks`.
//!
//! The ownership guard has already matched `{user_id}` against the caller, so
//! every handler files and looks up tasks under the verified identity.
use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::validation;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use warden_common::{CreateTask, Task, UpdateTask};

fn task_not_found(task_id: &str) -> AppError {
    AppError::NotFound(format!("task {task_id}"))
}

/// `GET /api/{user_id}/tasks`
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> Json<Vec<Task>> {
    Json(state.tasks.list(&user.user_id))
}

/// `POST /api/{user_id}/tasks`
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(body): Json<CreateTask>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let title = validation::validate_task_title(&body.title)?.to_string();
    if let Some(description) = &body.description {
        validation::validate_task_description(description)?;
    }

    let now = state.clock.now();
    let task = state.tasks.insert(Task {
        id: Uuid::new_v4().to_string(),
        owner_id: user.user_id,
        title,
        description: body.description,
        completed: false,
        created_at: now,
        updated_at: now,
    });

    tracing::debug!(task_id = %task.id, owner = %task.owner_id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /api/{user_id}/tasks/{task_id}`
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path((_, task_id)): Path<(String, String)>,
) -> Result<Json<Task>, AppError> {
    state
        .tasks
        .get(&user.user_id, &task_id)
        .map(Json)
        .ok_or_else(|| task_not_found(&task_id))
}

/// `PUT /api/{user_id}/tasks/{task_id}`
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path((_, task_id)): Path<(String, String)>,
    Json(mut body): Json<UpdateTask>,
) -> Result<Json<Task>, AppError> {
    if let Some(title) = &body.title {
        body.title = Some(validation::validate_task_title(title)?.to_string());
    }
    if let Some(description) = &body.description {
        validation::validate_task_description(description)?;
    }

    state
        .tasks
        .update(&user.user_id, &task_id, body, state.clock.now())
        .map(Json)
        .ok_or_else(|| task_not_found(&task_id))
}

/// `PATCH /api/{user_id}/tasks/{task_id}/complete`
pub async fn toggle_task(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path((_, task_id)): Path<(String, String)>,
) -> Result<Json<Task>, AppError> {
    state
        .tasks
        .toggle_complete(&user.user_id, &task_id, state.clock.now())
        .map(Json)
        .ok_or_else(|| task_not_found(&task_id))
}

/// `DELETE /api/{user_id}/tasks/{task_id}`
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path((_, task_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state
        .tasks
        .remove(&user.user_id, &task_id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| task_not_found(&task_id))
}
