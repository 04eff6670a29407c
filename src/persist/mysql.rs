//! MySQL-backed saved-query store.

use super::{NewSavedQuery, SavedQueryStore};
use crate::error::{DashError, Result};
use async_trait::async_trait;
use sqlx::mysql::MySqlPool;
use tracing::info;

/// Writes saved queries through the shared connection pool.
///
/// This is the one place the service issues anything other than a SELECT,
/// and the statement is a fixed template with bound parameters; user SQL is
/// stored as data, never executed here.
pub struct MySqlSavedQueryStore {
    pool: MySqlPool,
}

impl MySqlSavedQueryStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavedQueryStore for MySqlSavedQueryStore {
    async fn insert(&self, query: NewSavedQuery) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO saved_queries
                (user_id, company_id, query_text, sql_text, output_mode,
                 created_at, visual_config, panel_position)
            VALUES (?, ?, ?, ?, ?, NOW(), ?, ?)
            "#,
        )
        .bind(query.user_id)
        .bind(query.company_id)
        .bind(&query.question)
        .bind(&query.sql)
        .bind(query.output_mode.as_i32())
        .bind(&query.visual_config)
        .bind(&query.panel_position)
        .execute(&self.pool)
        .await
        .map_err(|e| DashError::store(e.to_string()))?;

        let id = result.last_insert_id();
        info!(id, user_id = query.user_id, "saved query stored");
        Ok(id)
    }
}
