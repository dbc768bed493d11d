//! SQL dialect definitions and quoting rules.
//!
//! Every table name, column name and alias that ends up in generated SQL goes
//! through [`SqlDialect::quote_identifier`], and every literal goes through
//! [`SqlDialect::render_literal`]. Nothing else in the crate builds quoted
//! text by hand.
//!
//! - Identifier quoting: `"` (SQLite/DuckDB/PostgreSQL), `` ` `` (MySQL)
//! - String literals: single quotes with `''` escaping (all dialects)
//!
//! # Usage
//!
//! ```
//! use modelsql::sql::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Sqlite;
//! assert_eq!(dialect.quote_identifier("weird\"name"), "\"weird\"\"name\"");
//! assert_eq!(dialect.qualify("jobs", "id"), "\"jobs\".\"id\"");
//! ```

mod duckdb;
pub mod helpers;
mod mysql;
mod postgres;
mod sqlite;

pub use duckdb::DuckDb;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::Value;

/// SQL dialect trait - defines how identifiers and literals are rendered.
pub trait SqlDialect: fmt::Debug + Send + Sync {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    /// Quote an identifier (table, column, alias), doubling any embedded
    /// quote character.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    /// `"table"."column"`.
    fn qualify(&self, table: &str, column: &str) -> String {
        format!(
            "{}.{}",
            self.quote_identifier(table),
            self.quote_identifier(column)
        )
    }

    /// Render a value as a SQL literal.
    ///
    /// Text is quoted, numbers are written verbatim. Non-finite reals have
    /// no SQL spelling and render as NULL.
    fn render_literal(&self, value: &Value) -> String {
        match value {
            Value::Null => self.format_null().to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(r) => helpers::format_real(*r).unwrap_or_else(|| self.format_null().to_string()),
            Value::Text(s) => self.quote_string(s),
        }
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Sqlite,
    DuckDb,
    Postgres,
    MySql,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Sqlite => &Sqlite,
            Dialect::DuckDb => &DuckDb,
            Dialect::Postgres => &Postgres,
            Dialect::MySql => &MySql,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_null(&self) -> &'static str {
        self.dialect().format_null()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Dialect::Sqlite),
            "duckdb" => Ok(Dialect::DuckDb),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            other => Err(format!("Unsupported dialect: {}", other)),
        }
    }
}
