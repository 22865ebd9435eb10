use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    todos::{
        dto::{
            DeletedTodoResponse, ListParams, TodoBody, TodoListResponse, TodoResponse,
            UpdateTodoBody,
        },
        pagination::PageMeta,
    },
};

const NOT_FOUND: &str = "Todo not found or unauthorized";
const UPDATE_FAILED: &str = "Failed to update todo";

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}

/// An id that does not parse cannot name an owned todo.
fn todo_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(NOT_FOUND))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_todos(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<TodoListResponse>> {
    let total = state.todos.count_by_user(user.id).await?;
    let meta = PageMeta::resolve(total, params.page.as_deref(), params.perpage.as_deref());

    let todos = state
        .todos
        .list_by_user(user.id, meta.page_size, meta.offset())
        .await?;

    Ok(Json(TodoListResponse {
        todos: todos.into_iter().map(TodoResponse::from).collect(),
        meta,
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<TodoResponse>> {
    let id = todo_id(&id)?;
    let todo = state
        .todos
        .find(id, user.id)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;
    Ok(Json(todo.into()))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_todo(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<TodoBody>, JsonRejection>,
) -> AppResult<Json<TodoResponse>> {
    let Json(body) = body?;
    let todo = state.todos.insert(user.id, body.todo).await?;
    info!(todo_id = %todo.id, "todo created");
    Ok(Json(todo.into()))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateTodoBody>, JsonRejection>,
) -> AppResult<Json<TodoResponse>> {
    let id = todo_id(&id)?;
    let Json(body) = body?;
    let Some(fields) = body.todo else {
        warn!(todo_id = %id, "update without a todo object");
        return Err(AppError::Internal(UPDATE_FAILED));
    };
    match state.todos.update(id, user.id, fields).await {
        Ok(Some(todo)) => {
            info!(todo_id = %todo.id, "todo updated");
            Ok(Json(todo.into()))
        }
        Ok(None) => Err(AppError::NotFound(NOT_FOUND)),
        Err(e) => {
            error!(error = ?e, todo_id = %id, "update todo failed");
            Err(AppError::Internal(UPDATE_FAILED))
        }
    }
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<DeletedTodoResponse>> {
    let id = todo_id(&id)?;
    let todo = state
        .todos
        .delete(id, user.id)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;
    info!(todo_id = %todo.id, "todo deleted");
    Ok(Json(DeletedTodoResponse { todo: todo.into() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_id_is_not_found() {
        assert!(matches!(todo_id("42"), Err(AppError::NotFound(_))));
        assert!(matches!(
            todo_id("65a1f0c2e4b0a1b2c3d4e5f6"),
            Err(AppError::NotFound(_))
        ));
        let id = Uuid::new_v4();
        assert_eq!(todo_id(&id.to_string()).unwrap(), id);
    }
}
