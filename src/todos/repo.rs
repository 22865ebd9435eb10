use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::todos::repo_types::{Todo, TodoFields};

/// Persistence for todos. Every operation filters on the owning user.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn count_by_user(&self, user_id: Uuid) -> anyhow::Result<u64>;

    /// One page of the user's todos in insertion order.
    async fn list_by_user(&self, user_id: Uuid, limit: u64, offset: u64)
        -> anyhow::Result<Vec<Todo>>;

    async fn find(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Todo>>;

    async fn insert(&self, user_id: Uuid, fields: TodoFields) -> anyhow::Result<Todo>;

    /// Overwrite title, date and done. `None` if no todo matches both ids.
    async fn update(&self, id: Uuid, user_id: Uuid, fields: TodoFields)
        -> anyhow::Result<Option<Todo>>;

    /// Remove and return the todo. `None` if no todo matches both ids.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Todo>>;
}

#[derive(Clone)]
pub struct PgTodoStore {
    db: PgPool,
}

impl PgTodoStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn count_by_user(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM todos WHERE user_id = $1"#)
            .bind(user_id)
            .fetch_one(&self.db)
            .await
            .context("count todos")?;
        Ok(u64::try_from(count)?)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<Todo>> {
        let rows = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, user_id, title, date, done, created_at
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(to_i64(limit))
        .bind(to_i64(offset))
        .fetch_all(&self.db)
        .await
        .context("list todos")?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Todo>> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, user_id, title, date, done, created_at
            FROM todos
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("find todo")?;
        Ok(row)
    }

    async fn insert(&self, user_id: Uuid, fields: TodoFields) -> anyhow::Result<Todo> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (id, user_id, title, date, done)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, date, done, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(fields.title)
        .bind(fields.date)
        .bind(fields.done)
        .fetch_one(&self.db)
        .await
        .context("insert todo")?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        fields: TodoFields,
    ) -> anyhow::Result<Option<Todo>> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
               SET title = $3, date = $4, done = $5
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, date, done, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(fields.title)
        .bind(fields.date)
        .bind(fields.done)
        .fetch_optional(&self.db)
        .await
        .context("update todo")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Todo>> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            DELETE FROM todos
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, date, done, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("delete todo")?;
        Ok(row)
    }
}
