//! PostgreSQL SQL dialect.
//!
//! - ANSI identifier quoting (`"`)
//! - Lowercase case folding for unquoted identifiers (quoting preserves case)

use super::helpers;
use super::SqlDialect;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }
}
