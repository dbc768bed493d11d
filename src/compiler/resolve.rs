// src/compiler/resolve.rs
//! Field-to-table resolution.
//!
//! Resolution order, first match wins:
//!
//! 1. the selected tables, in model insertion order
//! 2. the discovered catalog, in catalog order
//! 3. the base table
//!
//! Step 1 is the ambiguity tie-break: a field name selected in several
//! tables always resolves to the one the user added first.

use tracing::warn;

use crate::model::{DiscoveredTable, FieldAliases, ModelConfiguration};
use crate::sql::SqlDialect;

/// Find the table `field` belongs to.
///
/// Returns `None` only when the model has no tables.
pub fn resolve_table<'a>(
    field: &str,
    model: &'a ModelConfiguration,
    catalog: &'a [DiscoveredTable],
) -> Option<&'a str> {
    if let Some(table) = model.table_for_field(field) {
        return Some(table);
    }

    if let Some(table) = catalog.iter().find(|t| t.has_field(field)) {
        warn!(field, table = %table.name, "field not in model, resolved from catalog");
        return Some(&table.name);
    }

    let base = model.base_table()?;
    warn!(field, table = base, "could not find a table for field, using base table");
    Some(base)
}

/// Everything needed to turn a bare field name into quoted SQL.
#[derive(Clone, Copy)]
pub(crate) struct Scope<'a> {
    pub dialect: &'a dyn SqlDialect,
    pub model: &'a ModelConfiguration,
    pub catalog: &'a [DiscoveredTable],
    pub aliases: &'a FieldAliases,
}

impl<'a> Scope<'a> {
    pub fn table(&self, field: &str) -> Option<&'a str> {
        resolve_table(field, self.model, self.catalog)
    }

    /// `"table"."field"`.
    pub fn column(&self, field: &str) -> Option<String> {
        self.table(field)
            .map(|table| self.dialect.qualify(table, field))
    }

    /// `"table"."field" AS "alias"`, falling back to the field name.
    pub fn projection(&self, field: &str) -> Option<String> {
        let table = self.table(field)?;
        let alias = self.aliases.get(table, field).unwrap_or(field);
        Some(format!(
            "{} AS {}",
            self.dialect.qualify(table, field),
            self.dialect.quote_identifier(alias)
        ))
    }
}
