//! SQL-side concerns: the allow/deny validator and the fixed
//! question-to-SQL template table.

pub mod templates;
pub mod validator;

pub use templates::{generate_sql, GeneratedQuery};
pub use validator::{validate, ValidationContext, Verdict};
