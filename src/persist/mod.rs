//! Saved-query persistence.
//!
//! A saved query is a question, its SQL and the requested visualization,
//! written once to the `saved_queries` table and never mutated by this
//! service.

mod mock;
mod mysql;

pub use mock::MemorySavedQueryStore;
pub use mysql::MySqlSavedQueryStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Requested visualization for a saved query, stored as a small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Table,
    Chart,
    Pie,
}

impl OutputMode {
    /// Parses the client-facing string; unknown values fall back to Table.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "chart" => Self::Chart,
            "pie" => Self::Pie,
            _ => Self::Table,
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            Self::Table => 1,
            Self::Chart => 2,
            Self::Pie => 3,
        }
    }
}

/// A saved query awaiting insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSavedQuery {
    pub user_id: i64,
    pub company_id: i64,
    pub question: String,
    pub sql: String,
    pub output_mode: OutputMode,
    pub visual_config: Option<serde_json::Value>,
    pub panel_position: Option<String>,
}

/// Write interface for the saved-query table.
#[async_trait]
pub trait SavedQueryStore: Send + Sync {
    /// Inserts a saved query and returns the new row id.
    async fn insert(&self, query: NewSavedQuery) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_mode_parse() {
        assert_eq!(OutputMode::parse("table"), OutputMode::Table);
        assert_eq!(OutputMode::parse("chart"), OutputMode::Chart);
        assert_eq!(OutputMode::parse("pie"), OutputMode::Pie);
        assert_eq!(OutputMode::parse("Chart"), OutputMode::Chart);
    }

    #[test]
    fn test_unknown_output_mode_falls_back_to_table() {
        assert_eq!(OutputMode::parse("sparkline"), OutputMode::Table);
        assert_eq!(OutputMode::parse(""), OutputMode::Table);
    }

    #[test]
    fn test_output_mode_integers() {
        assert_eq!(OutputMode::Table.as_i32(), 1);
        assert_eq!(OutputMode::Chart.as_i32(), 2);
        assert_eq!(OutputMode::Pie.as_i32(), 3);
    }
}
