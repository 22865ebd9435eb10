use crate::auth::{PgUserStore, UserStore};
use crate::config::{AppConfig, StoreBackend};
use crate::memory::MemoryStore;
use crate::todos::{PgTodoStore, TodoStore};
use anyhow::Context;
use std::sync::Arc;

/// Everything a handler needs; built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        match config.backend {
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on exit");
                Ok(Self::in_memory(config))
            }
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .clone()
                    .context("DATABASE_URL is not set")?;
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(&url)
                    .await
                    .context("connect to database")?;

                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;

                Ok(Self::from_parts(
                    Arc::new(config),
                    Arc::new(PgUserStore::new(db.clone())),
                    Arc::new(PgTodoStore::new(db)),
                ))
            }
        }
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        todos: Arc<dyn TodoStore>,
    ) -> Self {
        Self {
            config,
            users,
            todos,
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(Arc::new(config), store.clone(), store)
    }
}
