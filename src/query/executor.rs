//! Query execution pipeline.
//!
//! Validation, execution, column derivation and shaping in one pass. The
//! executor owns nothing but a handle to the database client, so the whole
//! pipeline runs against a test double.

use std::sync::Arc;

use crate::db::DatabaseClient;
use crate::query::{shaper, ColumnDescriptor, ColumnMode, QueryResponse};
use crate::sql::validator::{self, ValidationContext};
use tracing::warn;

/// Per-call context: where the SQL came from and how to derive columns.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub is_ai_generated: bool,
    pub original_question: Option<String>,
    pub column_mode: ColumnMode,
}

impl QueryContext {
    /// Literal SQL typed by the user: driver metadata names the columns.
    pub fn manual() -> Self {
        Self {
            is_ai_generated: false,
            original_question: None,
            column_mode: ColumnMode::Metadata,
        }
    }

    /// Template-generated SQL: aliases are display labels, so columns are
    /// inferred from the rows.
    pub fn generated(question: impl Into<String>) -> Self {
        Self {
            is_ai_generated: true,
            original_question: Some(question.into()),
            column_mode: ColumnMode::Inferred,
        }
    }
}

/// Runs SQL through validation, execution and shaping.
pub struct QueryExecutor {
    db: Arc<dyn DatabaseClient>,
}

impl QueryExecutor {
    pub fn new(db: Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }

    /// Executes a statement and shapes the result into the
    /// `{success, rows, columns}` contract. Failures of any kind come back
    /// as `success:false` rather than an `Err`.
    pub async fn execute(&self, sql: &str, context: &QueryContext) -> QueryResponse {
        let validation_context = ValidationContext {
            is_ai_generated: context.is_ai_generated,
            original_question: context.original_question.clone(),
        };

        let verdict = validator::validate(sql, &validation_context);
        if !verdict.is_valid {
            return QueryResponse::failure(
                verdict
                    .error
                    .unwrap_or_else(|| "Query validation failed".to_string()),
            );
        }
        for warning in &verdict.warnings {
            warn!(sql, warning = %warning, "SQL warning");
        }

        let raw = match self.db.execute_raw(sql).await {
            Ok(raw) => raw,
            Err(e) => return QueryResponse::failure(e.to_string()),
        };

        // Driver column metadata is unreliable for empty results; skip
        // derivation entirely.
        let Some(first_row) = raw.rows.first() else {
            return QueryResponse::empty();
        };

        let columns: Vec<ColumnDescriptor> = match context.column_mode {
            ColumnMode::Metadata => raw
                .columns
                .iter()
                .map(|name| ColumnDescriptor::new(name.clone(), name.clone()))
                .collect(),
            ColumnMode::Inferred => shaper::infer_columns(first_row),
        };

        let mut rows = raw.rows;
        shaper::sort_rows(&mut rows);

        QueryResponse::success(rows, columns)
    }
}
