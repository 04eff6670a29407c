//! MySQL database client built on sqlx.
//!
//! The pool is created lazily: no connection exists until a request needs
//! one, and each acquisition is scoped to a single `execute_raw` call and
//! returned on every exit path, success or error.

use crate::config::DatabaseConfig;
use crate::db::{DatabaseClient, JsonMap, RawQueryResult};
use crate::error::{DashError, Result};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row, TypeInfo};
use tracing::debug;

/// MySQL database client.
#[derive(Debug)]
pub struct MySqlClient {
    pool: MySqlPool,
}

impl MySqlClient {
    /// Creates a client for the configured database without connecting yet.
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect_lazy(&config.connection_url())
            .map_err(|e| DashError::connection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Creates a client from an existing pool.
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
    async fn execute_raw(&self, sql: &str) -> Result<RawQueryResult> {
        let fetched = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DashError::query(format_query_error(e)))?;

        let columns: Vec<String> = fetched
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();

        let rows: Vec<JsonMap> = fetched.iter().map(convert_row).collect();

        debug!(rows = rows.len(), columns = columns.len(), "query fetched");

        Ok(RawQueryResult { columns, rows })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Converts a sqlx MySqlRow to a JSON object keyed by field name.
fn convert_row(row: &MySqlRow) -> JsonMap {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let value = convert_value(row, i, col.type_info().name());
            (col.name().to_string(), value)
        })
        .collect()
}

/// Converts a single cell to JSON based on the driver-reported type name.
///
/// DECIMAL deliberately comes back as its string representation, matching
/// the wire format the MySQL text protocol uses; downstream numeric
/// heuristics parse numeric strings for exactly this reason.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> JsonValue {
    match type_name {
        "BOOLEAN" | "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(JsonValue::Bool)
            .unwrap_or(JsonValue::Null),

        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" | "YEAR" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(|v| JsonValue::Number(v.into()))
            .unwrap_or(JsonValue::Null),

        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row
            .try_get::<Option<u64>, _>(index)
            .ok()
            .flatten()
            .map(|v| JsonValue::Number(v.into()))
            .unwrap_or(JsonValue::Null),

        "FLOAT" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .and_then(|v| serde_json::Number::from_f64(v as f64))
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),

        "DOUBLE" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .and_then(serde_json::Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),

        "DECIMAL" | "NEWDECIMAL" => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(JsonValue::String)
            .or_else(|| {
                row.try_get::<Option<f64>, _>(index)
                    .ok()
                    .flatten()
                    .and_then(serde_json::Number::from_f64)
                    .map(JsonValue::Number)
            })
            .unwrap_or(JsonValue::Null),

        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)
            .ok()
            .flatten()
            .map(|v| JsonValue::String(v.format("%Y-%m-%d").to_string()))
            .unwrap_or(JsonValue::Null),

        "TIME" => row
            .try_get::<Option<chrono::NaiveTime>, _>(index)
            .ok()
            .flatten()
            .map(|v| JsonValue::String(v.format("%H:%M:%S").to_string()))
            .unwrap_or(JsonValue::Null),

        "DATETIME" | "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map(|v| JsonValue::String(v.format("%Y-%m-%d %H:%M:%S").to_string()))
            .or_else(|| {
                row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
                    .ok()
                    .flatten()
                    .map(|v| JsonValue::String(v.format("%Y-%m-%d %H:%M:%S").to_string()))
            })
            .unwrap_or(JsonValue::Null),

        "JSON" => row
            .try_get::<Option<JsonValue>, _>(index)
            .ok()
            .flatten()
            .unwrap_or(JsonValue::Null),

        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(|b| match String::from_utf8(b) {
                Ok(s) => JsonValue::String(s),
                Err(e) => JsonValue::String(format!("<{} bytes>", e.into_bytes().len())),
            })
            .unwrap_or(JsonValue::Null),

        // CHAR, VARCHAR, TEXT, ENUM, SET and anything else: best effort as text.
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(JsonValue::String)
            .unwrap_or(JsonValue::Null),
    }
}

/// Formats a sqlx error, preferring the server's own message.
fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => db_error.message().to_string(),
        None => error.to_string(),
    }
}
