//! End-to-end pipeline tests over the mock database client: question →
//! template → validation → execution → shaping.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use nl_dash::db::{FailingDatabaseClient, JsonMap, MockDatabaseClient};
use nl_dash::query::{ColumnDescriptor, QueryContext, QueryExecutor};
use nl_dash::sql::templates;

fn row(pairs: &[(&str, serde_json::Value)]) -> JsonMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn question_to_sorted_chart_rows() {
    // The mock stands in for MySQL answering the top-donors template.
    let db = Arc::new(MockDatabaseClient::with_rows(vec![
        row(&[
            ("Donor Name", json!("Ada Lovelace")),
            ("Total Amount", json!("500.00")),
        ]),
        row(&[
            ("Donor Name", json!("Grace Hopper")),
            ("Total Amount", json!("120.00")),
        ]),
        row(&[
            ("Donor Name", json!("Katherine Johnson")),
            ("Total Amount", json!("750.00")),
        ]),
    ]));
    let executor = QueryExecutor::new(db.clone());

    let question = "who are the top donors?";
    let generated = templates::generate_sql(question);
    assert_eq!(generated.template, "top_donors");

    let response = executor
        .execute(&generated.sql, &QueryContext::generated(question))
        .await;

    assert!(response.success, "{:?}", response.error);
    assert_eq!(db.call_count(), 1);

    // Ascending by the priority column, regardless of driver order.
    let rows = response.rows.unwrap();
    let amounts: Vec<&str> = rows
        .iter()
        .map(|r| r["Total Amount"].as_str().unwrap())
        .collect();
    assert_eq!(amounts, vec!["120.00", "500.00", "750.00"]);

    // Aliased labels are already display-ready.
    let columns = response.columns.unwrap();
    assert_eq!(
        columns,
        vec![
            ColumnDescriptor::new("Donor Name", "Donor Name"),
            ColumnDescriptor::new("Total Amount", "Total Amount"),
        ]
    );
}

#[tokio::test]
async fn destructive_statement_stops_before_the_database() {
    let db = Arc::new(MockDatabaseClient::new());
    let executor = QueryExecutor::new(db.clone());

    let response = executor
        .execute("DROP TABLE gifts", &QueryContext::manual())
        .await;

    assert!(!response.success);
    assert!(!response.error.unwrap().is_empty());
    assert_eq!(db.call_count(), 0, "database must never be contacted");
}

#[tokio::test]
async fn stacked_statements_stop_before_the_database() {
    let db = Arc::new(MockDatabaseClient::new());
    let executor = QueryExecutor::new(db.clone());

    let response = executor
        .execute("SELECT 1; SELECT 2", &QueryContext::manual())
        .await;

    assert!(!response.success);
    assert_eq!(db.call_count(), 0);
}

#[tokio::test]
async fn empty_result_returns_empty_arrays() {
    let db = Arc::new(MockDatabaseClient::new());
    let executor = QueryExecutor::new(db);

    let response = executor
        .execute(
            "SELECT GIFTAMOUNT FROM gifts WHERE GIFTDATE > '2099-01-01'",
            &QueryContext::manual(),
        )
        .await;

    assert!(response.success);
    assert_eq!(response.rows.as_deref(), Some(&[][..]));
    assert_eq!(response.columns.as_deref(), Some(&[][..]));
    assert!(response.error.is_none());
}

#[tokio::test]
async fn driver_failure_surfaces_as_error_payload() {
    let db = Arc::new(FailingDatabaseClient::new(
        "Unknown column 'GIFTAMNT' in 'field list'",
    ));
    let executor = QueryExecutor::new(db);

    let response = executor
        .execute("SELECT GIFTAMNT FROM gifts LIMIT 5", &QueryContext::manual())
        .await;

    assert!(!response.success);
    assert!(response.error.unwrap().contains("GIFTAMNT"));
    assert!(response.rows.is_none());
}

#[tokio::test]
async fn every_template_passes_validation_and_executes() {
    for question in [
        "top donors",
        "gifts by source",
        "by designation",
        "payment method breakdown",
        "something unmatched",
    ] {
        let db = Arc::new(MockDatabaseClient::with_rows(vec![row(&[
            ("Gift Count", json!(3)),
        ])]));
        let executor = QueryExecutor::new(db.clone());

        let generated = templates::generate_sql(question);
        let response = executor
            .execute(&generated.sql, &QueryContext::generated(question))
            .await;

        assert!(
            response.success,
            "template {} failed: {:?}",
            generated.template, response.error
        );
        assert_eq!(db.call_count(), 1);
    }
}

#[tokio::test]
async fn gift_amount_rows_come_back_ascending() {
    let db = Arc::new(MockDatabaseClient::with_rows(vec![
        row(&[("Gift Amount", json!(50))]),
        row(&[("Gift Amount", json!(10))]),
    ]));
    let executor = QueryExecutor::new(db);

    let response = executor
        .execute(
            "SELECT GIFTAMOUNT AS 'Gift Amount' FROM gifts LIMIT 2",
            &QueryContext::generated("gift amounts"),
        )
        .await;

    let rows = response.rows.unwrap();
    assert_eq!(rows[0]["Gift Amount"], json!(10));
    assert_eq!(rows[1]["Gift Amount"], json!(50));
}
