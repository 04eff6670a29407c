//! Mock database clients for testing.

use super::{DatabaseClient, JsonMap, RawQueryResult};
use crate::error::{DashError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A mock client that returns a canned result and counts executions.
#[derive(Default)]
pub struct MockDatabaseClient {
    result: RawQueryResult,
    calls: AtomicUsize,
}

impl MockDatabaseClient {
    /// Creates a mock that returns an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock returning the given rows, with columns taken from the
    /// first row's keys.
    pub fn with_rows(rows: Vec<JsonMap>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        Self {
            result: RawQueryResult { columns, rows },
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `execute_raw` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_raw(&self, _sql: &str) -> Result<RawQueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }

    async fn close(&self) {}
}

/// A client whose every execution fails, for error-path testing.
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_raw(&self, _sql: &str) -> Result<RawQueryResult> {
        Err(DashError::query(self.message.clone()))
    }

    async fn close(&self) {}
}
