//! The query pipeline: validation, execution, column derivation and the
//! post-sort that normalizes results for charting.

pub mod executor;
pub mod shaper;

pub use executor::{QueryContext, QueryExecutor};

use crate::db::JsonMap;
use serde::{Deserialize, Serialize};

/// A result column: `key` addresses the row field, `name` is the display
/// label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub key: String,
    pub name: String,
}

impl ColumnDescriptor {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// How result columns are derived, chosen explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMode {
    /// One descriptor per driver-reported field, name verbatim.
    Metadata,
    /// Descriptors from the first row's keys, with alias detection and
    /// humanized display names.
    Inferred,
}

/// The pipeline's output contract.
///
/// `success == true` implies `rows` and `columns` are both present (possibly
/// empty) and `error` is absent; `success == false` implies `error` is
/// present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<JsonMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResponse {
    pub fn success(rows: Vec<JsonMap>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            success: true,
            rows: Some(rows),
            columns: Some(columns),
            error: None,
        }
    }

    pub fn empty() -> Self {
        Self::success(Vec::new(), Vec::new())
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            rows: None,
            columns: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let response = QueryResponse::empty();
        assert!(response.success);
        assert_eq!(response.rows.as_deref(), Some(&[][..]));
        assert_eq!(response.columns.as_deref(), Some(&[][..]));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_failure_shape() {
        let response = QueryResponse::failure("boom");
        assert!(!response.success);
        assert!(response.rows.is_none());
        assert!(response.columns.is_none());
        assert_eq!(response.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_failure_serializes_without_row_fields() {
        let value = serde_json::to_value(QueryResponse::failure("boom")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "boom"}));
    }
}
