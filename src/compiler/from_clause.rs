// src/compiler/from_clause.rs
//! FROM/JOIN clause construction.
//!
//! The join graph is walked breadth-first from the base table:
//!
//! ```text
//!   queue = [base]      joined = {base}
//!   pop t
//!     for each declared join touching t, in declaration order:
//!       other = the join's opposite endpoint
//!       if other is selected and not yet joined:
//!         emit "<TYPE> other ON from.on_from = to.on_to"
//!         joined += other; queue += other
//! ```
//!
//! Selected tables with no path of declared joins back to the base table
//! are left out of the clause.

use std::collections::{HashSet, VecDeque};

use crate::model::{Join, ModelConfiguration};
use crate::sql::SqlDialect;

/// One join emitted by the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinStep<'a> {
    /// The table brought into the query by this step.
    pub table: &'a str,
    pub join: &'a Join,
}

/// Walk the declared joins from the base table, returning the joins to
/// emit in order.
pub fn walk_joins<'a>(model: &'a ModelConfiguration, joins: &'a [Join]) -> Vec<JoinStep<'a>> {
    let Some(base) = model.base_table() else {
        return Vec::new();
    };

    let mut joined: HashSet<&str> = HashSet::from([base]);
    let mut queue: VecDeque<&str> = VecDeque::from([base]);
    let mut steps = Vec::new();

    while let Some(current) = queue.pop_front() {
        for join in joins.iter().filter(|j| j.touches(current)) {
            let other = if join.from == current {
                join.to.as_str()
            } else {
                join.from.as_str()
            };

            if model.contains_table(other) && joined.insert(other) {
                steps.push(JoinStep { table: other, join });
                queue.push_back(other);
            }
        }
    }

    steps
}

/// Build `FROM "base" <JOIN ...>*`, or an empty string for an empty model.
///
/// Join conditions are always written with the join's own `from`/`to`
/// sides, whichever direction the walk crossed the edge.
pub fn build_from_clause(
    dialect: &dyn SqlDialect,
    model: &ModelConfiguration,
    joins: &[Join],
) -> String {
    let Some(base) = model.base_table() else {
        return String::new();
    };

    let mut clause = format!("FROM {}", dialect.quote_identifier(base));
    for step in walk_joins(model, joins) {
        let join = step.join;
        clause.push_str(&format!(
            " {} {} ON {} = {}",
            join.join_type.as_sql(),
            dialect.quote_identifier(step.table),
            dialect.qualify(&join.from, &join.on.from),
            dialect.qualify(&join.to, &join.on.to),
        ));
    }
    clause
}
