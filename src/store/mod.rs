//! Relational store abstraction.
//!
//! The compiler needs a store for exactly one thing (the distinct-value
//! lookup behind a pivot); callers use the same handle to run the
//! compiled SQL, introspect the schema and sample field values.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      RelationalStore                            │
//! │  - execute_query(sql)         -> rows                           │
//! │  - discover_tables()          -> [{name, fields}]               │
//! │  - fetch_sample_values(t, f)  -> up to 50 distinct values       │
//! └─────────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      SqliteStore                                │
//! │              (embedded rusqlite connection)                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The handle is always passed explicitly; there is no process-wide
//! connection.

mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::model::{DataRow, DiscoveredTable};
use crate::sql::{Dialect, SqlDialect};

/// Maximum number of values returned by [`RelationalStore::fetch_sample_values`].
pub const SAMPLE_VALUE_LIMIT: usize = 50;

/// Errors raised by a relational store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Query failed: {0}")]
    Query(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// An opaque relational store that executes SQL text.
///
/// Implementations must surface engine failures (syntax errors, missing
/// tables, ...) as `Err` carrying the engine's diagnostic message.
#[async_trait]
pub trait RelationalStore: Send + Sync {
    /// Dialect used to quote identifiers for this store.
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    /// Execute one SQL statement and return its rows.
    ///
    /// Blank SQL yields no rows.
    async fn execute_query(&self, sql: &str) -> StoreResult<Vec<DataRow>>;

    /// List every user table with its column names.
    async fn discover_tables(&self) -> StoreResult<Vec<DiscoveredTable>>;

    /// Up to [`SAMPLE_VALUE_LIMIT`] distinct non-null values of `table.field`,
    /// rendered as strings.
    async fn fetch_sample_values(&self, table: &str, field: &str) -> StoreResult<Vec<String>> {
        let dialect = self.dialect();
        let column = dialect.quote_identifier(field);
        let sql = format!(
            "SELECT DISTINCT {column} FROM {} WHERE {column} IS NOT NULL LIMIT {}",
            dialect.quote_identifier(table),
            SAMPLE_VALUE_LIMIT
        );

        let rows = self.execute_query(&sql).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get(field).or_else(|| row.first()))
            .filter(|value| !value.is_null())
            .map(ToString::to_string)
            .take(SAMPLE_VALUE_LIMIT)
            .collect())
    }
}
