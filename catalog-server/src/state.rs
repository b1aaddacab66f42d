//! Application state

use crate::config::Config;
use crate::db::DbService;
use sqlx::SqlitePool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state for all request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbService,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self {
            config: config.clone(),
            db,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}
