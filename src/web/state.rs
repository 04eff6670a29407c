use crate::config::AppConfig;
use crate::db::DatabaseClient;
use crate::persist::SavedQueryStore;
use crate::query::QueryExecutor;
use std::sync::Arc;

/// Shared application state for the web server.
pub struct AppState {
    pub config: AppConfig,
    pub executor: QueryExecutor,
    pub saved: Arc<dyn SavedQueryStore>,
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: Arc<dyn DatabaseClient>,
        saved: Arc<dyn SavedQueryStore>,
    ) -> Self {
        Self {
            config,
            executor: QueryExecutor::new(db),
            saved,
            startup_time: chrono::Utc::now(),
        }
    }
}
