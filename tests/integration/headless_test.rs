//! One-shot output tests against the mock database.

use securecheck::cli::OutputFormat;
use securecheck::db::{FailingDatabaseClient, MockDatabaseClient};
use securecheck::headless;
use securecheck::snapshot::StopSnapshot;

#[test]
fn test_list_queries_text_output() {
    let out = headless::render_catalog(OutputFormat::Text);

    assert!(out.contains("Insights:"));
    assert!(out.contains("Complex Insights:"));
    // One label from each section
    assert!(out.contains("Are Night Stops More Likely to Lead to Arrests?"));
    assert!(out.contains("Driver Demographics by Country (Age, Gender, Race)"));
}

#[test]
fn test_list_queries_json_output_is_valid() {
    let out = headless::render_catalog(OutputFormat::Json);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(parsed["simple"].as_array().unwrap().len(), 14);
    assert_eq!(parsed["complex"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_summary_json_round_trips_metrics() {
    let client = MockDatabaseClient::new();
    let snapshot = StopSnapshot::load(&client).await.unwrap();

    let out = headless::render_summary(&snapshot, OutputFormat::Json);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(parsed["metrics"]["total_stops"], 8);
    assert_eq!(parsed["metrics"]["total_arrests"], 2);
    assert_eq!(parsed["metrics"]["total_warnings"], 2);
    assert_eq!(parsed["metrics"]["drug_related_stops"], 2);
}

#[tokio::test]
async fn test_run_query_renders_table() {
    let client = MockDatabaseClient::new();
    let out = headless::run_catalog_query(
        &client,
        "Average Stop Duration by Violation",
        OutputFormat::Text,
    )
    .await
    .unwrap();

    assert!(out.starts_with("Average Stop Duration by Violation"));
    assert!(out.contains("rows returned"));
}

#[tokio::test]
async fn test_run_query_json_has_rows() {
    let client = MockDatabaseClient::new();
    let out = headless::run_catalog_query(
        &client,
        "Gender Distribution by Country",
        OutputFormat::Json,
    )
    .await
    .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["label"], "Gender Distribution by Country");
    assert!(parsed["rows"].as_array().unwrap().len() > 0);
}

#[tokio::test]
async fn test_run_query_unknown_label_errors_without_executing() {
    // The failing client would turn any execution into a different error
    // message, so the catalog-miss text proves no query ran.
    let client = FailingDatabaseClient::with_message("ERROR: executed anyway");
    let err = headless::run_catalog_query(&client, "Bogus Label", OutputFormat::Text)
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("No catalog query named 'Bogus Label'"));
    assert!(!msg.contains("executed anyway"));
}

#[tokio::test]
async fn test_run_query_failure_carries_driver_message() {
    let client = FailingDatabaseClient::with_message("ERROR: relation is on fire");
    let err = headless::run_catalog_query(
        &client,
        "Most Stops with Search by Country",
        OutputFormat::Text,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("relation is on fire"));
}
