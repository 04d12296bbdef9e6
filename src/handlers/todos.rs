// Todo handlers
// HTTP handlers for todo management operations

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    db::SharedStore,
    error::ApiError,
    models::todo::{parse_todo_id, TodoRequest, TodoResponse},
};

/// Todo id taken from the `:id` path segment.
///
/// A segment that is not a plain non-negative integer is treated as if no
/// route had matched, so it answers 404 rather than 400.
#[derive(Debug, Clone, Copy)]
pub struct TodoId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::RouteNotFound)?;

        parse_todo_id(&segment)
            .map(TodoId)
            .ok_or(ApiError::RouteNotFound)
    }
}

/// List all todos
/// GET /api/todos/
pub async fn list_todos(State(store): State<SharedStore>) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching all todos");

    let todos: Vec<TodoResponse> = store
        .list_todos()
        .await?
        .into_iter()
        .map(TodoResponse::from)
        .collect();

    info!("Retrieved {} todos", todos.len());
    Ok((StatusCode::OK, Json(todos)))
}

/// Create a new todo
/// POST /api/todos/
pub async fn create_todo(
    State(store): State<SharedStore>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let title = TodoRequest::from_body(&body?)?.into_title()?;
    info!("Creating new todo with title: {}", title);

    let todo = store.create_todo(&title).await?;

    info!("Successfully created todo with id: {}", todo.id);
    Ok((StatusCode::CREATED, Json(TodoResponse::from(todo))))
}

/// Get todo by ID
/// GET /api/todos/:id
pub async fn get_todo(
    State(store): State<SharedStore>,
    TodoId(id): TodoId,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching todo with id: {}", id);

    let todo = store.get_todo(id).await?;

    Ok((StatusCode::OK, Json(TodoResponse::from(todo))))
}

/// Update todo by ID
/// PUT /api/todos/:id
///
/// The id is resolved before the body is looked at, so an unknown id wins
/// over a bad body.
pub async fn update_todo(
    State(store): State<SharedStore>,
    TodoId(id): TodoId,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Updating todo with id: {}", id);

    store.get_todo(id).await?;
    let title = TodoRequest::from_body(&body?)?.into_title()?;

    let todo = store.update_todo(id, &title).await?;

    info!("Successfully updated todo with id: {}", id);
    Ok((StatusCode::OK, Json(TodoResponse::from(todo))))
}

/// Delete todo by ID
/// DELETE /api/todos/:id
pub async fn delete_todo(
    State(store): State<SharedStore>,
    TodoId(id): TodoId,
) -> Result<impl IntoResponse, ApiError> {
    info!("Deleting todo with id: {}", id);

    store.delete_todo(id).await?;

    info!("Successfully deleted todo with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
