// src/compiler/predicate.rs
//! WHERE clause construction.
//!
//! | operator       | condition                   |
//! |----------------|-----------------------------|
//! | `equals`       | `"t"."f" = <literal>`       |
//! | `contains`     | `"t"."f" LIKE '%<value>%'`  |
//! | `greater_than` | `"t"."f" > <literal>`       |
//! | `less_than`    | `"t"."f" < <literal>`       |
//!
//! Any other operator contributes no condition. `%` and `_` inside a
//! `contains` value are not escaped and still match as wildcards.

use crate::model::{DiscoveredTable, Filter, FilterOperator, ModelConfiguration};
use crate::sql::SqlDialect;

/// Render each filter as a condition, dropping filters that have no table
/// or an unknown operator.
pub fn where_conditions(
    dialect: &dyn SqlDialect,
    filters: &[Filter],
    model: &ModelConfiguration,
    catalog: &[DiscoveredTable],
) -> Vec<String> {
    filters
        .iter()
        .filter_map(|filter| {
            let table = super::resolve_table(&filter.field, model, catalog)?;
            condition(dialect, &dialect.qualify(table, &filter.field), filter)
        })
        .collect()
}

/// `WHERE c1 AND c2 ...`, or an empty string when no condition survives.
pub fn build_where_clause(
    dialect: &dyn SqlDialect,
    filters: &[Filter],
    model: &ModelConfiguration,
    catalog: &[DiscoveredTable],
) -> String {
    let conditions = where_conditions(dialect, filters, model, catalog);
    if conditions.is_empty() {
        return String::new();
    }
    format!("WHERE {}", conditions.join(" AND "))
}

fn condition(dialect: &dyn SqlDialect, column: &str, filter: &Filter) -> Option<String> {
    let rhs = match &filter.operator {
        FilterOperator::Equals => format!("= {}", dialect.render_literal(&filter.value)),
        FilterOperator::GreaterThan => format!("> {}", dialect.render_literal(&filter.value)),
        FilterOperator::LessThan => format!("< {}", dialect.render_literal(&filter.value)),
        FilterOperator::Contains => {
            format!("LIKE {}", dialect.quote_string(&format!("%{}%", filter.value)))
        }
        FilterOperator::Other(_) => return None,
    };
    Some(format!("{} {}", column, rhs))
}
