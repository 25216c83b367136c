use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::db::{Collection, Todo};
use crate::error::VaultError;
use crate::middleware::VaultJson;
use crate::router::VaultState;
use crate::types::{NewTodo, TodoUpdate};

/// POST /todos
pub async fn create_todo(
    State(state): State<VaultState>,
    VaultJson(body): VaultJson<NewTodo>,
) -> Result<(StatusCode, Json<Todo>), VaultError> {
    let todo = Todo::new(body.validate()?);
    state.store.insert(&todo).await?;

    info!(id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PATCH /todos/{id}
pub async fn update_todo(
    State(state): State<VaultState>,
    Path(id): Path<String>,
    VaultJson(body): VaultJson<TodoUpdate>,
) -> Result<Json<Todo>, VaultError> {
    let completed = body.validate()?;
    let todo = state
        .store
        .set_todo_completed(&id, completed)
        .await?
        .ok_or(VaultError::NotFound(Collection::Todos.label()))?;

    info!(id = %todo.id, completed, "todo updated");
    Ok(Json(todo))
}
