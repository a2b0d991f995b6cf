//! The session snapshot of the stop table.
//!
//! The dashboard loads `traffic_stops` exactly once per session and hands
//! the decoded, read-only snapshot to every component that needs it. There
//! is no ambient cache and no reload path; a fresh session is a fresh load.

use crate::db::{DatabaseClient, QueryResult, STOPS_TABLE};
use crate::error::Result;
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use tracing::warn;

/// One decoded row of the stop table.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    pub stop_date: Option<NaiveDate>,
    pub stop_time: Option<NaiveTime>,
    pub vehicle_number: String,
    pub country_name: String,
    pub driver_gender: Option<String>,
    pub driver_age: Option<u8>,
    pub driver_race: Option<String>,
    pub violation: String,
    pub search_conducted: bool,
    pub is_arrested: bool,
    pub drugs_related_stop: bool,
    pub stop_outcome: String,
    pub duration_minutes: Option<u32>,
}

/// Scalar aggregates shown as metric tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct SummaryMetrics {
    /// Total number of stops in the snapshot.
    pub total_stops: usize,
    /// Stops where the driver was arrested.
    pub total_arrests: usize,
    /// Stops whose outcome is "warning" (case-insensitive).
    pub total_warnings: usize,
    /// Stops flagged as drug-related.
    pub drug_related_stops: usize,
}

impl SummaryMetrics {
    /// Computes all four metrics over the given records.
    ///
    /// Each metric is an independent reduction; none depends on row order.
    pub fn compute(records: &[StopRecord]) -> Self {
        Self {
            total_stops: records.len(),
            total_arrests: records.iter().filter(|r| r.is_arrested).count(),
            total_warnings: records
                .iter()
                .filter(|r| r.stop_outcome.eq_ignore_ascii_case("warning"))
                .count(),
            drug_related_stops: records.iter().filter(|r| r.drugs_related_stop).count(),
        }
    }
}

/// Per-outcome totals for the officer outcomes table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OutcomeSummary {
    pub stop_outcome: String,
    pub total_stops: usize,
    pub total_arrests: usize,
}

/// The read-only session snapshot of the stop table.
#[derive(Debug, Clone, Default)]
pub struct StopSnapshot {
    records: Vec<StopRecord>,
    skipped_rows: usize,
}

impl StopSnapshot {
    /// The single fixed statement the loader issues.
    pub const LOAD_SQL: &'static str = "SELECT * FROM traffic_stops";

    /// Loads the snapshot by issuing the fixed SELECT against the database.
    pub async fn load(db: &dyn DatabaseClient) -> Result<Self> {
        let result = db.execute_query(Self::LOAD_SQL).await?;
        Ok(Self::from_result(&result))
    }

    /// Decodes a query result into a snapshot.
    ///
    /// Rows missing a mandatory text field (vehicle, country, violation,
    /// outcome) are skipped and counted rather than failing the load.
    pub fn from_result(result: &QueryResult) -> Self {
        let col = |name: &str| result.column_index(name);

        let stop_date = col("stopping_date");
        let stop_time = col("stop_time");
        let vehicle = col("vehicle_number");
        let country = col("country_name");
        let gender = col("driver_gender");
        let age = col("driver_age");
        let race = col("driver_race");
        let violation = col("violation");
        let search = col("search_conducted");
        let arrested = col("is_arrested");
        let drugs = col("drugs_related_stop");
        let outcome = col("stop_outcome");
        let duration = col("stop_duration_minutes");

        let mut records = Vec::with_capacity(result.rows.len());
        let mut skipped_rows = 0;

        for row in &result.rows {
            let get = |idx: Option<usize>| idx.and_then(|i| row.get(i));
            let text = |idx: Option<usize>| {
                get(idx).and_then(|v| v.as_text()).map(|s| s.to_string())
            };

            let record = StopRecord {
                stop_date: get(stop_date).and_then(|v| v.as_date()),
                stop_time: get(stop_time).and_then(|v| v.as_time()),
                vehicle_number: match text(vehicle) {
                    Some(v) => v,
                    None => {
                        skipped_rows += 1;
                        continue;
                    }
                },
                country_name: match text(country) {
                    Some(v) => v,
                    None => {
                        skipped_rows += 1;
                        continue;
                    }
                },
                driver_gender: text(gender),
                driver_age: get(age)
                    .and_then(|v| v.as_int())
                    .and_then(|v| u8::try_from(v).ok()),
                driver_race: text(race),
                violation: match text(violation) {
                    Some(v) => v,
                    None => {
                        skipped_rows += 1;
                        continue;
                    }
                },
                search_conducted: get(search).and_then(|v| v.as_flag()).unwrap_or(false),
                is_arrested: get(arrested).and_then(|v| v.as_flag()).unwrap_or(false),
                drugs_related_stop: get(drugs).and_then(|v| v.as_flag()).unwrap_or(false),
                stop_outcome: match text(outcome) {
                    Some(v) => v,
                    None => {
                        skipped_rows += 1;
                        continue;
                    }
                },
                duration_minutes: get(duration)
                    .and_then(|v| v.as_int())
                    .and_then(|v| u32::try_from(v).ok()),
            };

            records.push(record);
        }

        if skipped_rows > 0 {
            warn!(
                "Skipped {} of {} {} rows with missing mandatory fields",
                skipped_rows,
                result.rows.len(),
                STOPS_TABLE
            );
        }

        Self {
            records,
            skipped_rows,
        }
    }

    /// Builds a snapshot directly from records (for tests and mocks).
    pub fn from_records(records: Vec<StopRecord>) -> Self {
        Self {
            records,
            skipped_rows: 0,
        }
    }

    /// Returns all decoded records.
    pub fn records(&self) -> &[StopRecord] {
        &self.records
    }

    /// Returns the number of decoded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records were decoded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns how many source rows were skipped during decode.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Computes the four metric tiles over this snapshot.
    pub fn metrics(&self) -> SummaryMetrics {
        SummaryMetrics::compute(&self.records)
    }

    /// Returns the first `limit` records for the vehicle log table.
    pub fn vehicle_log(&self, limit: usize) -> impl Iterator<Item = &StopRecord> {
        self.records.iter().take(limit)
    }

    /// Counts stops per violation, descending, alphabetical on ties.
    pub fn violation_counts(&self) -> Vec<(String, u64)> {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.violation.as_str()).or_default() += 1;
        }

        let mut counts: Vec<(String, u64)> = counts
            .into_iter()
            .map(|(violation, count)| (violation.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }

    /// Per-outcome stop and arrest totals, ordered by outcome label.
    pub fn outcome_summary(&self) -> Vec<OutcomeSummary> {
        let mut totals: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for record in &self.records {
            let entry = totals.entry(record.stop_outcome.as_str()).or_default();
            entry.0 += 1;
            if record.is_arrested {
                entry.1 += 1;
            }
        }

        totals
            .into_iter()
            .map(|(outcome, (stops, arrests))| OutcomeSummary {
                stop_outcome: outcome.to_string(),
                total_stops: stops,
                total_arrests: arrests,
            })
            .collect()
    }

    /// Distinct violations observed in the snapshot, sorted.
    ///
    /// Feeds the report form's violation selector.
    pub fn violations(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.violation.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct stop outcomes observed in the snapshot, sorted.
    pub fn outcomes(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.stop_outcome.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
