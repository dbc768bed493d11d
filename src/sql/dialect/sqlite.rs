//! SQLite SQL dialect.
//!
//! The embedded store's dialect:
//! - ANSI identifier quoting (`"`), embedded quotes doubled
//! - No native PIVOT (conditional aggregation with CASE)

use super::helpers;
use super::SqlDialect;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }
}
