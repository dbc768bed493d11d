// src/compiler/pivot.rs
//! Column pivoting.
//!
//! A pivot turns the distinct values of one column into output columns:
//!
//! ```text
//!   seniority ∈ {junior, senior}, values = [SUM(total_jobs)]
//!
//!   SUM(CASE WHEN "jobs"."seniority" = 'junior' THEN "jobs"."total_jobs" END)
//!       AS "junior - SUM of total_jobs",
//!   SUM(CASE WHEN "jobs"."seniority" = 'senior' THEN "jobs"."total_jobs" END)
//!       AS "senior - SUM of total_jobs"
//! ```
//!
//! The distinct values come from a round trip to the store, bounded by
//! [`PIVOT_VALUE_LIMIT`]. Values past the limit are not pivoted.

use tracing::debug;

use super::resolve::Scope;
use crate::model::{PivotValue, Value};
use crate::store::{RelationalStore, StoreResult};

/// Maximum number of distinct pivot-column values turned into columns.
pub const PIVOT_VALUE_LIMIT: usize = 25;

/// The column being pivoted, resolved to its table.
pub(crate) struct PivotColumn<'a> {
    pub table: &'a str,
    pub field: &'a str,
}

impl PivotColumn<'_> {
    /// `SELECT DISTINCT ... IS NOT NULL ORDER BY 1 LIMIT 25`, honouring the
    /// query's existing FROM clause and conditions.
    pub fn distinct_values_query(
        &self,
        scope: &Scope<'_>,
        from_clause: &str,
        conditions: &[String],
    ) -> String {
        let column = scope.dialect.qualify(self.table, self.field);

        let mut predicates = conditions.to_vec();
        predicates.push(format!("{} IS NOT NULL", column));

        format!(
            "SELECT DISTINCT {} AS {} {} WHERE {} ORDER BY 1 LIMIT {}",
            column,
            scope.dialect.quote_identifier(self.field),
            from_clause,
            predicates.join(" AND "),
            PIVOT_VALUE_LIMIT
        )
    }

    /// Run the distinct-value lookup. Store failures are returned as-is.
    pub async fn fetch_values<S>(&self, store: &S, sql: &str) -> StoreResult<Vec<Value>>
    where
        S: RelationalStore + ?Sized,
    {
        debug!(table = self.table, field = self.field, "looking up pivot values");
        let rows = store.execute_query(sql).await?;

        let values: Vec<Value> = rows
            .into_iter()
            .filter_map(|row| row.get(self.field).or_else(|| row.first()).cloned())
            .filter(|value| !value.is_null())
            .take(PIVOT_VALUE_LIMIT)
            .collect();

        debug!(count = values.len(), "pivot values");
        Ok(values)
    }

    /// One aggregate expression per (distinct value, requested aggregate),
    /// value-major.
    pub fn select_expressions(
        &self,
        scope: &Scope<'_>,
        values: &[Value],
        aggregates: &[PivotValue],
    ) -> Vec<String> {
        let pivot_column = scope.dialect.qualify(self.table, self.field);

        values
            .iter()
            .flat_map(|value| {
                let pivot_column = &pivot_column;
                aggregates.iter().filter_map(move |agg| {
                    let measure = scope.column(&agg.field)?;
                    let alias = format!("{} - {}", value, agg.pivot_label());
                    Some(format!(
                        "{}(CASE WHEN {} = {} THEN {} END) AS {}",
                        agg.aggregation,
                        pivot_column,
                        scope.dialect.render_literal(value),
                        measure,
                        scope.dialect.quote_identifier(&alias)
                    ))
                })
            })
            .collect()
    }
}
