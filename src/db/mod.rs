//! Database abstraction layer.
//!
//! Provides a trait-based interface for executing raw SQL, allowing the
//! MySQL backend to be swapped for test doubles.

mod mock;
mod mysql;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use mysql::MySqlClient;

use crate::error::Result;
use async_trait::async_trait;

/// A result row: driver field name to JSON value, in column order.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Driver-level result of executing a statement: the reported field names
/// plus the rows keyed by them. Column metadata is only trustworthy when at
/// least one row came back; callers must not derive columns from an empty
/// result.
#[derive(Debug, Clone, Default)]
pub struct RawQueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<JsonMap>,
}

/// Trait defining the interface for database clients.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes the SQL as a single unparameterized statement.
    async fn execute_raw(&self, sql: &str) -> Result<RawQueryResult>;

    /// Closes the underlying connections.
    async fn close(&self);
}
