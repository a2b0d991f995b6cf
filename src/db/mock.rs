//! Mock database clients for testing.
//!
//! Provides an in-memory client seeded with a small traffic-stop table, and
//! a client that fails every query for exercising error paths.

use super::{ColumnInfo, DatabaseClient, QueryResult, Row, Value, STOPS_TABLE};
use crate::error::{Result, SecureCheckError};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::time::Duration;

/// Column layout of the seeded `traffic_stops` table.
const STOP_COLUMNS: [(&str, &str); 13] = [
    ("stopping_date", "date"),
    ("stop_time", "time"),
    ("vehicle_number", "varchar"),
    ("country_name", "varchar"),
    ("driver_gender", "varchar"),
    ("driver_age", "integer"),
    ("driver_race", "varchar"),
    ("violation", "varchar"),
    ("search_conducted", "boolean"),
    ("is_arrested", "boolean"),
    ("drugs_related_stop", "boolean"),
    ("stop_outcome", "varchar"),
    ("stop_duration_minutes", "integer"),
];

/// A mock database client that serves a canned stop table.
pub struct MockDatabaseClient {
    stops: Vec<Row>,
}

impl MockDatabaseClient {
    /// Creates a mock client seeded with the default sample stops.
    pub fn new() -> Self {
        Self {
            stops: sample_stop_rows(),
        }
    }

    /// Creates a mock client with the given stop rows.
    pub fn with_stops(stops: Vec<Row>) -> Self {
        Self { stops }
    }

    /// Creates a mock client whose stop table is empty.
    pub fn empty() -> Self {
        Self { stops: Vec::new() }
    }

    fn stop_columns() -> Vec<ColumnInfo> {
        STOP_COLUMNS
            .iter()
            .map(|(name, ty)| ColumnInfo::new(*name, *ty))
            .collect()
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let sql_upper = sql.to_uppercase();

        if !sql_upper.trim_start().starts_with("SELECT") {
            return Err(SecureCheckError::query(format!(
                "Mock database only accepts SELECT statements, got: {}",
                sql.trim()
            )));
        }

        // The snapshot load reads the whole table; everything else is one of
        // the catalog aggregates, for which a small canned result suffices.
        let result = if sql.contains(STOPS_TABLE) && sql.contains('*') {
            QueryResult::with_data(Self::stop_columns(), self.stops.clone())
        } else {
            QueryResult::with_data(
                vec![
                    ColumnInfo::new("violation", "varchar"),
                    ColumnInfo::new("count", "bigint"),
                ],
                vec![
                    vec![Value::String("Speeding".to_string()), Value::Int(3)],
                    vec![Value::String("DUI".to_string()), Value::Int(2)],
                ],
            )
        };

        Ok(result.with_execution_time(Duration::from_millis(1)))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A mock database client that fails every query.
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    /// Creates a failing client with a default driver-style message.
    pub fn new() -> Self {
        Self::with_message("ERROR: relation \"traffic_stops\" does not exist")
    }

    /// Creates a failing client with the given error message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(SecureCheckError::query(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Sample stop rows used by the mock client and unit tests.
///
/// Totals are fixed on purpose: 8 stops, 2 arrests, 2 warnings,
/// 2 drug-related.
pub fn sample_stop_rows() -> Vec<Row> {
    fn stop(
        date: (i32, u32, u32),
        time: (u32, u32),
        vehicle: &str,
        country: &str,
        gender: &str,
        age: i64,
        race: &str,
        violation: &str,
        search: bool,
        arrested: bool,
        drugs: bool,
        outcome: &str,
        duration: i64,
    ) -> Row {
        vec![
            Value::Date(NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid date")),
            Value::Time(NaiveTime::from_hms_opt(time.0, time.1, 0).expect("valid time")),
            Value::String(vehicle.to_string()),
            Value::String(country.to_string()),
            Value::String(gender.to_string()),
            Value::Int(age),
            Value::String(race.to_string()),
            Value::String(violation.to_string()),
            Value::Bool(search),
            Value::Bool(arrested),
            Value::Bool(drugs),
            Value::String(outcome.to_string()),
            Value::Int(duration),
        ]
    }

    vec![
        stop(
            (2020, 1, 4),
            (22, 15),
            "KA01AB1234",
            "India",
            "male",
            23,
            "Asian",
            "Speeding",
            false,
            false,
            false,
            "Warning",
            12,
        ),
        stop(
            (2020, 1, 5),
            (9, 30),
            "US77XY9999",
            "USA",
            "female",
            45,
            "White",
            "Seatbelt",
            false,
            false,
            false,
            "Citation",
            8,
        ),
        stop(
            (2020, 2, 11),
            (2, 10),
            "CA55ZZ1111",
            "Canada",
            "male",
            31,
            "Black",
            "DUI",
            true,
            true,
            true,
            "Arrest",
            45,
        ),
        stop(
            (2020, 3, 14),
            (14, 30),
            "IN22CD5678",
            "India",
            "male",
            27,
            "Asian",
            "Speeding",
            true,
            false,
            false,
            "Citation",
            23,
        ),
        stop(
            (2020, 4, 2),
            (19, 50),
            "US10FG0001",
            "USA",
            "female",
            19,
            "Hispanic",
            "Signal",
            false,
            false,
            false,
            "Warning",
            10,
        ),
        stop(
            (2020, 5, 21),
            (23, 5),
            "CA81HH2222",
            "Canada",
            "male",
            52,
            "White",
            "Speeding",
            true,
            true,
            false,
            "Arrest",
            60,
        ),
        stop(
            (2020, 6, 30),
            (12, 0),
            "IN09JK3333",
            "India",
            "female",
            36,
            "Asian",
            "Other",
            false,
            false,
            true,
            "Citation",
            16,
        ),
        stop(
            (2020, 7, 4),
            (4, 40),
            "US33LM4444",
            "USA",
            "male",
            29,
            "Black",
            "DUI",
            true,
            false,
            false,
            "Citation",
            30,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_stop_table() {
        let client = MockDatabaseClient::new();
        let result = client
            .execute_query("SELECT * FROM traffic_stops")
            .await
            .unwrap();

        assert_eq!(result.row_count, 8);
        assert_eq!(result.columns.len(), 13);
        assert_eq!(result.columns[0].name, "stopping_date");
        assert_eq!(result.columns[12].name, "stop_duration_minutes");
    }

    #[tokio::test]
    async fn test_mock_serves_aggregate_queries() {
        let client = MockDatabaseClient::new();
        let result = client
            .execute_query("SELECT violation, COUNT(*) FROM traffic_stops GROUP BY violation")
            .await
            .unwrap();

        assert_eq!(result.columns.len(), 2);
        assert_eq!(result.row_count, 2);
    }

    #[tokio::test]
    async fn test_mock_rejects_writes() {
        let client = MockDatabaseClient::new();
        let result = client
            .execute_query("DELETE FROM traffic_stops")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_mock() {
        let client = MockDatabaseClient::empty();
        let result = client
            .execute_query("SELECT * FROM traffic_stops")
            .await
            .unwrap();
        assert_eq!(result.row_count, 0);
    }

    #[tokio::test]
    async fn test_failing_client() {
        let client = FailingDatabaseClient::with_message("ERROR: boom");
        let err = client.execute_query("SELECT 1").await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
