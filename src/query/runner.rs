//! Execution of catalog queries.
//!
//! The runner resolves a selector label (or takes an already-resolved
//! entry), ships the bound SQL to the database, and folds the outcome into
//! a display-ready result. Execution failure is data here, not an error:
//! the session always continues, and nothing is retried.

use std::time::Instant;

use crate::catalog::CatalogEntry;
use crate::db::{DatabaseClient, QueryResult};
use tracing::{debug, warn};

/// Runs catalog queries against a database client.
pub struct QueryRunner<'a> {
    db: &'a dyn DatabaseClient,
}

impl<'a> QueryRunner<'a> {
    /// Creates a new query runner.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self { db }
    }

    /// Resolves a selector label and runs the bound query.
    ///
    /// A label absent from the catalog returns `NotFound` without touching
    /// the database.
    pub async fn run_label(&self, label: &str) -> ExecutionResult {
        match CatalogEntry::from_label(label) {
            Some(entry) => self.run(entry).await,
            None => {
                warn!("No catalog entry for label '{}'", label);
                ExecutionResult::NotFound {
                    label: label.to_string(),
                }
            }
        }
    }

    /// Runs an already-resolved catalog entry.
    pub async fn run(&self, entry: CatalogEntry) -> ExecutionResult {
        let start = Instant::now();
        let result = self.db.execute_query(entry.sql()).await;
        let execution_time = start.elapsed();

        match result {
            Ok(result) => {
                debug!(
                    "'{}' returned {} rows in {:?}",
                    entry.label(),
                    result.row_count,
                    execution_time
                );
                ExecutionResult::Success(QueryOutcome { entry, result })
            }
            Err(e) => {
                warn!("'{}' failed: {}", entry.label(), e);
                ExecutionResult::Failed {
                    entry,
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Result of running a catalog query.
#[derive(Debug)]
pub enum ExecutionResult {
    /// Query executed successfully.
    Success(QueryOutcome),
    /// Query execution failed; the message carries the driver diagnostic.
    Failed {
        entry: CatalogEntry,
        message: String,
    },
    /// The label matched no catalog entry; nothing was executed.
    NotFound { label: String },
}

/// Successful query execution outcome.
#[derive(Debug)]
pub struct QueryOutcome {
    /// The catalog entry that was run.
    pub entry: CatalogEntry,
    /// The query result, with execution time recorded by the client.
    pub result: QueryResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InsightQuery;
    use crate::db::{FailingDatabaseClient, MockDatabaseClient};

    #[tokio::test]
    async fn test_run_success() {
        let mock_db = MockDatabaseClient::new();
        let runner = QueryRunner::new(&mock_db);

        let result = runner
            .run(CatalogEntry::Simple(InsightQuery::MostSearchedVehicles))
            .await;

        match result {
            ExecutionResult::Success(outcome) => {
                assert_eq!(
                    outcome.entry.label(),
                    "Most Frequently Searched Vehicles"
                );
                assert!(outcome.result.row_count > 0);
            }
            _ => panic!("Expected Success result"),
        }
    }

    #[tokio::test]
    async fn test_run_label_hit() {
        let mock_db = MockDatabaseClient::new();
        let runner = QueryRunner::new(&mock_db);

        let result = runner.run_label("Gender Distribution by Country").await;
        assert!(matches!(result, ExecutionResult::Success(_)));
    }

    #[tokio::test]
    async fn test_run_label_miss_does_not_execute() {
        // A failing client proves the miss path never reaches the database:
        // any execution would produce Failed, not NotFound.
        let failing_db = FailingDatabaseClient::new();
        let runner = QueryRunner::new(&failing_db);

        let result = runner.run_label("No Such Insight").await;
        match result {
            ExecutionResult::NotFound { label } => assert_eq!(label, "No Such Insight"),
            _ => panic!("Expected NotFound result"),
        }
    }

    #[tokio::test]
    async fn test_execution_failure_is_surfaced_not_raised() {
        let failing_db = FailingDatabaseClient::with_message("ERROR: syntax error at end of input");
        let runner = QueryRunner::new(&failing_db);

        let result = runner
            .run(CatalogEntry::Simple(InsightQuery::BusiestHours))
            .await;

        match result {
            ExecutionResult::Failed { entry, message } => {
                assert_eq!(entry.label(), "Time of Day with Most Traffic Stops");
                assert!(message.contains("syntax error"));
            }
            _ => panic!("Expected Failed result"),
        }
    }
}
