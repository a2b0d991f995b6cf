//! Database abstraction layer for SecureCheck.
//!
//! Provides a trait-based interface for database operations, allowing
//! different database backends to be used interchangeably.

mod mock;
mod postgres;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use postgres::PostgresClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// The relation every dashboard component reads from.
pub const STOPS_TABLE: &str = "traffic_stops";

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Postgres,
    // Future: MySQL, SQLite, etc.
}

impl DatabaseBackend {
    /// Returns the backend as a string for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
        }
    }

    /// Parses a backend from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            _ => None,
        }
    }

    /// Returns the default port for this backend.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Postgres => 5432,
        }
    }
}

/// Creates a database client for the given backend and configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(
    backend: DatabaseBackend,
    config: &ConnectionConfig,
) -> Result<Box<dyn DatabaseClient>> {
    match backend {
        DatabaseBackend::Postgres => {
            let client = PostgresClient::connect(config).await?;
            Ok(Box::new(client))
        }
    }
}

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with SecureCheckError.
/// The dashboard only ever reads: executing SELECT statements is the whole
/// surface.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL query and returns the results.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!(
            DatabaseBackend::parse("postgres"),
            Some(DatabaseBackend::Postgres)
        );
        assert_eq!(
            DatabaseBackend::parse("PostgreSQL"),
            Some(DatabaseBackend::Postgres)
        );
        assert_eq!(DatabaseBackend::parse("oracle"), None);
    }

    #[test]
    fn test_backend_defaults() {
        let backend = DatabaseBackend::default();
        assert_eq!(backend.as_str(), "postgres");
        assert_eq!(backend.default_port(), 5432);
    }
}
