//! Store bundle that dispatches to the configured provider.

use std::sync::Arc;

use tracing::info;

use taskhub_core::config::DatabaseConfig;
use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStores;
use crate::migration::run_migrations;
use crate::postgres::{PgJobStore, PgTaskLogStore, PgTaskStore, PgUserStore};
use crate::store::{JobStore, TaskLogStore, TaskStore, UserStore};

/// One implementation of every store, selected at construction time.
///
/// Built once by the process entrypoint and passed down explicitly; all
/// handles are cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    /// Task records.
    pub tasks: Arc<dyn TaskStore>,
    /// Task execution logs.
    pub logs: Arc<dyn TaskLogStore>,
    /// Background jobs.
    pub jobs: Arc<dyn JobStore>,
    /// User accounts.
    pub users: Arc<dyn UserStore>,
    pool: Option<DatabasePool>,
}

impl Database {
    /// Build the stores named by `config.provider`.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL stores");
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
            "memory" => {
                info!("Initializing in-memory stores");
                Ok(Self::in_memory())
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: memory, postgres"
            ))),
        }
    }

    /// PostgreSQL stores sharing one pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            tasks: Arc::new(PgTaskStore::new(pg.clone())),
            logs: Arc::new(PgTaskLogStore::new(pg.clone())),
            jobs: Arc::new(PgJobStore::new(pg.clone())),
            users: Arc::new(PgUserStore::new(pg)),
            pool: Some(pool),
        }
    }

    /// Fresh, empty in-memory stores.
    pub fn in_memory() -> Self {
        Self::from_memory(&MemoryStores::new())
    }

    /// Wrap existing in-memory stores, keeping the caller's handles live.
    pub fn from_memory(stores: &MemoryStores) -> Self {
        Self {
            tasks: stores.tasks.clone(),
            logs: stores.logs.clone(),
            jobs: stores.jobs.clone(),
            users: stores.users.clone(),
            pool: None,
        }
    }

    /// Name of the active provider.
    pub fn provider(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// Check backend connectivity. Always healthy for the memory provider.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
