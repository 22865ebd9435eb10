use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod pagination;
pub mod repo;
pub mod repo_types;

pub use repo::{PgTodoStore, TodoStore};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::todo_routes())
}
