use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{repo_types::User, UserStore},
    todos::{
        repo_types::{Todo, TodoFields},
        TodoStore,
    },
};

/// Process-local store backing both users and todos. Vectors keep insertion
/// order, which is the order todos are listed in.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    todos: RwLock<Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn clamp(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(Some(user))
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn count_by_user(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let todos = self.todos.read().await;
        Ok(todos.iter().filter(|t| t.user_id == user_id).count() as u64)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .filter(|t| t.user_id == user_id)
            .skip(clamp(offset))
            .take(clamp(limit))
            .cloned()
            .collect())
    }

    async fn find(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, user_id: Uuid, fields: TodoFields) -> anyhow::Result<Todo> {
        let todo = Todo {
            id: Uuid::new_v4(),
            user_id,
            title: fields.title,
            date: fields.date,
            done: fields.done,
            created_at: OffsetDateTime::now_utc(),
        };
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        fields: TodoFields,
    ) -> anyhow::Result<Option<Todo>> {
        let mut todos = self.todos.write().await;
        let Some(todo) = todos
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
        else {
            return Ok(None);
        };
        todo.title = fields.title;
        todo.date = fields.date;
        todo.done = fields.done;
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Todo>> {
        let mut todos = self.todos.write().await;
        Ok(todos
            .iter()
            .position(|t| t.id == id && t.user_id == user_id)
            .map(|i| todos.remove(i)))
    }
}
