use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use super::AppState;
use crate::domain::{TodoInput, TodoItem};
use crate::error::AppError;

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<TodoItem>>, AppError> {
    let todos = state.repo.list().await?;
    Ok(Json(todos))
}

pub async fn get_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TodoItem>, AppError> {
    let Path(id) = id?;

    state
        .repo
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(AppError::todo_not_found)
}

pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoItem>), AppError> {
    let Json(input) = payload?;

    let todo = state.repo.create(&input).await?;
    info!(id = todo.id, "Created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<Json<TodoItem>, AppError> {
    let Path(id) = id?;
    let Json(input) = payload?;

    state
        .repo
        .update(id, &input)
        .await?
        .map(Json)
        .ok_or_else(AppError::todo_not_found)
}

pub async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;

    if state.repo.delete(id).await? {
        info!(id, "Deleted todo");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::todo_not_found())
    }
}
