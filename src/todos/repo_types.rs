use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Todo row. Content fields are nullable: absent input is stored as absent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub date: Option<String>,
    pub done: Option<bool>,
    pub created_at: OffsetDateTime,
}

/// The client-writable part of a todo. Create stores these as given and
/// update overwrites all three at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}
