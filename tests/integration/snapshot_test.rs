//! Snapshot loading and summary metric tests against the mock database.

use securecheck::db::MockDatabaseClient;
use securecheck::snapshot::{StopSnapshot, SummaryMetrics};

#[tokio::test]
async fn test_snapshot_load_decodes_every_seed_row() {
    let client = MockDatabaseClient::new();
    let snapshot = StopSnapshot::load(&client).await.unwrap();

    assert_eq!(snapshot.len(), 8);
    assert_eq!(snapshot.skipped_rows(), 0);
}

#[tokio::test]
async fn test_total_stops_equals_row_count() {
    let client = MockDatabaseClient::new();
    let snapshot = StopSnapshot::load(&client).await.unwrap();

    assert_eq!(snapshot.metrics().total_stops, snapshot.len());
}

#[tokio::test]
async fn test_arrest_count_matches_flagged_rows() {
    let client = MockDatabaseClient::new();
    let snapshot = StopSnapshot::load(&client).await.unwrap();

    let expected = snapshot.records().iter().filter(|r| r.is_arrested).count();
    assert_eq!(snapshot.metrics().total_arrests, expected);
    assert_eq!(snapshot.metrics().total_arrests, 2);
}

#[tokio::test]
async fn test_metrics_on_empty_table() {
    let client = MockDatabaseClient::empty();
    let snapshot = StopSnapshot::load(&client).await.unwrap();

    assert_eq!(
        snapshot.metrics(),
        SummaryMetrics {
            total_stops: 0,
            total_arrests: 0,
            total_warnings: 0,
            drug_related_stops: 0,
        }
    );
}

#[tokio::test]
async fn test_report_form_values_come_from_snapshot() {
    let client = MockDatabaseClient::new();
    let snapshot = StopSnapshot::load(&client).await.unwrap();

    let violations = snapshot.violations();
    let outcomes = snapshot.outcomes();

    assert!(violations.contains(&"Speeding".to_string()));
    assert!(outcomes.contains(&"Warning".to_string()));

    // Observed values are deduplicated
    let speeding_rows = snapshot
        .records()
        .iter()
        .filter(|r| r.violation == "Speeding")
        .count();
    assert!(speeding_rows > 1);
    assert_eq!(
        violations.iter().filter(|v| *v == "Speeding").count(),
        1
    );
}
