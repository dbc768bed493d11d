// src/compiler/preview.rs
use super::from_clause::build_from_clause;
use super::resolve::Scope;
use crate::model::Join;

/// Returned by the preview when no table is selected. Not executable SQL.
pub const PREVIEW_PLACEHOLDER: &str =
    "-- Select one or more tables in the data model to preview the query.";

/// Project every selected `table.field`, in table then field order.
pub(crate) fn preview_query(scope: &Scope<'_>, joins: &[Join]) -> String {
    let model = scope.model;
    if model.is_empty() {
        return PREVIEW_PLACEHOLDER.to_string();
    }

    let columns: Vec<String> = model
        .tables()
        .flat_map(|(table, fields)| {
            fields.iter().map(move |field| {
                let column = scope.dialect.qualify(table, field);
                match scope.aliases.get(table, field) {
                    Some(alias) => format!("{} AS {}", column, scope.dialect.quote_identifier(alias)),
                    None => column,
                }
            })
        })
        .collect();

    let select = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(", ")
    };

    format!(
        "SELECT {} {}",
        select,
        build_from_clause(scope.dialect, model, joins)
    )
}
