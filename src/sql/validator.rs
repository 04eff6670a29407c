//! SQL validation against an allow/deny policy.
//!
//! The dashboard executes client-supplied SQL text directly, so every
//! statement passes through here first. Destructive statements and stacked
//! queries are hard errors; style issues surface as non-blocking warnings.
//! The save path never reaches this module: it binds parameters into a fixed
//! INSERT and carries no user SQL.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, warn};

/// Keywords that make a statement destructive in this read-only context.
const DESTRUCTIVE_KEYWORDS: [&str; 6] =
    ["DROP", "DELETE", "UPDATE", "INSERT", "ALTER", "TRUNCATE"];

static DESTRUCTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({})\b", DESTRUCTIVE_KEYWORDS.join("|")))
        .expect("destructive keyword pattern is valid")
});

static LIMIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLIMIT\b").expect("limit pattern is valid"));

static SELECT_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSELECT\s+\*").expect("select-star pattern is valid"));

/// The validator's pass/fail judgment on a SQL string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_valid: bool,
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

impl Verdict {
    fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
            warnings: Vec::new(),
        }
    }

    fn valid(warnings: Vec<String>) -> Self {
        Self {
            is_valid: true,
            error: None,
            warnings,
        }
    }
}

/// Where a query came from, for audit logging.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    pub is_ai_generated: bool,
    pub original_question: Option<String>,
}

impl ValidationContext {
    pub fn manual() -> Self {
        Self::default()
    }

    pub fn ai_generated(question: impl Into<String>) -> Self {
        Self {
            is_ai_generated: true,
            original_question: Some(question.into()),
        }
    }

    fn source(&self) -> &'static str {
        if self.is_ai_generated {
            "AI_GENERATED"
        } else {
            "MANUAL"
        }
    }
}

/// Validates a SQL string and logs the outcome for audit purposes.
///
/// Pure with respect to its inputs; the only side effect is the tracing
/// event recording the verdict.
pub fn validate(sql: &str, context: &ValidationContext) -> Verdict {
    let verdict = check(sql);
    log_outcome(sql, context, &verdict);
    verdict
}

fn check(sql: &str) -> Verdict {
    let trimmed = sql.trim();
    if trimmed.is_empty() {
        return Verdict::invalid("Empty SQL statement");
    }

    if let Some(m) = DESTRUCTIVE_RE.find(trimmed) {
        return Verdict::invalid(format!(
            "Destructive statement rejected: {} is not allowed",
            m.as_str().to_uppercase()
        ));
    }

    // Trailing semicolons are harmless; any interior one separates a second
    // statement (stacked-query injection).
    let body = trimmed.trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    if body.contains(';') {
        return Verdict::invalid("Multiple statements are not allowed");
    }

    let mut warnings = Vec::new();
    if SELECT_STAR_RE.is_match(body) {
        warnings.push("SELECT * returns every column; prefer an explicit column list".to_string());
    }
    if !LIMIT_RE.is_match(body) {
        warnings.push("Query has no LIMIT clause and may return a large result set".to_string());
    }

    Verdict::valid(warnings)
}

fn log_outcome(sql: &str, context: &ValidationContext, verdict: &Verdict) {
    if verdict.is_valid {
        info!(
            source = context.source(),
            question = context.original_question.as_deref(),
            warnings = verdict.warnings.len(),
            sql,
            "SQL validation passed"
        );
    } else {
        warn!(
            source = context.source(),
            question = context.original_question.as_deref(),
            error = verdict.error.as_deref(),
            sql,
            "SQL validation rejected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rejected(sql: &str) {
        let verdict = validate(sql, &ValidationContext::manual());
        assert!(!verdict.is_valid, "expected '{}' to be rejected", sql);
        assert!(
            verdict.error.as_deref().is_some_and(|e| !e.is_empty()),
            "rejection for '{}' must carry a non-empty error",
            sql
        );
    }

    #[test]
    fn test_select_is_valid() {
        let verdict = validate("SELECT id FROM gifts LIMIT 10", &ValidationContext::manual());
        assert!(verdict.is_valid);
        assert!(verdict.error.is_none());
        assert!(verdict.warnings.is_empty());
    }

    #[test]
    fn test_every_destructive_keyword_is_rejected() {
        for keyword in DESTRUCTIVE_KEYWORDS {
            assert_rejected(&format!("{} something", keyword));
        }
    }

    #[test]
    fn test_destructive_keyword_is_case_insensitive() {
        assert_rejected("drop table gifts");
        assert_rejected("DeLeTe FROM gifts");
    }

    #[test]
    fn test_destructive_keyword_mid_query() {
        assert_rejected("SELECT 1; DROP TABLE gifts");
        assert_rejected("SELECT * FROM gifts WHERE id IN (DELETE FROM gifts)");
    }

    #[test]
    fn test_keyword_inside_identifier_is_not_rejected() {
        // "updated_at" contains UPDATE but is not an UPDATE statement.
        let verdict = validate(
            "SELECT updated_at, inserted_total FROM gifts LIMIT 5",
            &ValidationContext::manual(),
        );
        assert!(verdict.is_valid, "{:?}", verdict.error);
    }

    #[test]
    fn test_multi_statement_is_rejected() {
        assert_rejected("SELECT 1; SELECT 2");
    }

    #[test]
    fn test_trailing_semicolon_is_allowed() {
        let verdict = validate("SELECT id FROM gifts LIMIT 1;", &ValidationContext::manual());
        assert!(verdict.is_valid);

        let verdict = validate(
            "SELECT id FROM gifts LIMIT 1 ;  ",
            &ValidationContext::manual(),
        );
        assert!(verdict.is_valid);
    }

    #[test]
    fn test_empty_sql_is_rejected() {
        assert_rejected("");
        assert_rejected("   \n\t ");
    }

    #[test]
    fn test_select_star_warns() {
        let verdict = validate("SELECT * FROM gifts LIMIT 10", &ValidationContext::manual());
        assert!(verdict.is_valid);
        assert_eq!(verdict.warnings.len(), 1);
        assert!(verdict.warnings[0].contains("SELECT *"));
    }

    #[test]
    fn test_missing_limit_warns() {
        let verdict = validate("SELECT id FROM gifts", &ValidationContext::manual());
        assert!(verdict.is_valid);
        assert_eq!(verdict.warnings.len(), 1);
        assert!(verdict.warnings[0].contains("LIMIT"));
    }

    #[test]
    fn test_warnings_do_not_block() {
        let verdict = validate("SELECT * FROM gifts", &ValidationContext::manual());
        assert!(verdict.is_valid);
        assert_eq!(verdict.warnings.len(), 2);
        assert!(verdict.error.is_none());
    }

    #[test]
    fn test_ai_context_carries_question() {
        let ctx = ValidationContext::ai_generated("top donors this year");
        assert!(ctx.is_ai_generated);
        assert_eq!(ctx.source(), "AI_GENERATED");
        assert_eq!(
            ctx.original_question.as_deref(),
            Some("top donors this year")
        );
        assert_eq!(ValidationContext::manual().source(), "MANUAL");
    }
}
