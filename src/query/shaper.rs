//! Result shaping: display-label derivation and the chart-normalizing sort.
//!
//! Every successful non-empty result is re-sorted ascending by one
//! heuristically chosen numeric column so charts read left-to-right
//! regardless of what ORDER BY the SQL carried. The SQL's own ordering is
//! discarded whenever a numeric column exists.

use crate::db::JsonMap;
use crate::query::ColumnDescriptor;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use tracing::debug;

/// Well-known numeric labels, highest priority first.
pub const PRIORITY_COLUMNS: [&str; 5] = [
    "Total Amount",
    "Gift Amount",
    "Donation Amount",
    "Average Amount",
    "Gift Count",
];

/// Turns an internal identifier into a display label: a space before each
/// internal capital that is not already preceded by whitespace, then an
/// uppercased first letter. Already-spaced labels pass through unchanged.
pub fn humanize(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.chars() {
        if c.is_uppercase() {
            if let Some(p) = prev {
                if !p.is_whitespace() {
                    spaced.push(' ');
                }
            }
        }
        spaced.push(c);
        prev = Some(c);
    }

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

/// Derives column descriptors from the first row of a result set.
///
/// A key containing a quote character is a pre-aliased label: the key stays
/// verbatim and the quotes are stripped for display. Everything else is
/// humanized.
pub fn infer_columns(first_row: &JsonMap) -> Vec<ColumnDescriptor> {
    first_row
        .keys()
        .map(|key| {
            if key.contains('"') || key.contains('\'') {
                let name: String = key.chars().filter(|c| *c != '"' && *c != '\'').collect();
                ColumnDescriptor::new(key.clone(), name)
            } else {
                ColumnDescriptor::new(key.clone(), humanize(key))
            }
        })
        .collect()
}

/// A cell's numeric interpretation: a JSON number, or a string that parses
/// fully as one.
pub fn numeric_value(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Picks the sort column: first priority-list hit on the first row's keys,
/// else the first key holding a numeric value.
pub fn pick_sort_column(rows: &[JsonMap]) -> Option<String> {
    let first_row = rows.first()?;

    for name in PRIORITY_COLUMNS {
        if first_row.contains_key(name) {
            return Some(name.to_string());
        }
    }

    first_row
        .iter()
        .find(|(_, value)| numeric_value(value).is_some())
        .map(|(key, _)| key.clone())
}

/// Re-sorts rows ascending by the heuristically chosen numeric column.
/// Missing or non-numeric cells coerce to zero; the sort is stable, so ties
/// keep their input order. Without a numeric column the rows are untouched.
pub fn sort_rows(rows: &mut [JsonMap]) {
    let Some(column) = pick_sort_column(rows) else {
        debug!("no numeric column found for sorting");
        return;
    };

    debug!(column = %column, rows = rows.len(), "sorting rows ascending");

    rows.sort_by(|a, b| {
        let left = a.get(&column).and_then(numeric_value).unwrap_or(0.0);
        let right = b.get(&column).and_then(numeric_value).unwrap_or(0.0);
        left.partial_cmp(&right).unwrap_or(Ordering::Equal)
    });
}
