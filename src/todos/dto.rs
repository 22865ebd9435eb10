use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::todos::{
    pagination::PageMeta,
    repo_types::{Todo, TodoFields},
};

/// Raw query for `GET /todos`; parsing is lenient, see [`PageMeta::resolve`].
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub perpage: Option<String>,
}

/// Body of create: `{"todo": {...}}`. Any owner field the client sends is
/// dropped here; a missing `todo` inserts an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct TodoBody {
    #[serde(default)]
    pub todo: TodoFields,
}

/// Body of update. Without a `todo` object nothing is written.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoBody {
    #[serde(default)]
    pub todo: Option<TodoFields>,
}

/// One todo as returned by every endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl From<Todo> for TodoResponse {
    fn from(t: Todo) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            title: t.title,
            date: t.date,
            done: t.done,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub todos: Vec<TodoResponse>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct DeletedTodoResponse {
    pub todo: TodoResponse,
}
