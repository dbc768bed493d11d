// src/compiler/sanitize.rs
//! Drops references to fields that are no longer selected in the model.
//!
//! A field can exist in the catalog, and even in a saved pivot layout or
//! filter list, after the user has deselected it. Such references are
//! removed before any SQL is built.

use crate::model::{Filter, ModelConfiguration, PivotConfig};

pub fn sanitize_pivot(pivot: &PivotConfig, model: &ModelConfiguration) -> PivotConfig {
    PivotConfig {
        rows: retain_selected(&pivot.rows, model),
        columns: retain_selected(&pivot.columns, model),
        values: pivot
            .values
            .iter()
            .filter(|v| model.contains_field(&v.field))
            .cloned()
            .collect(),
    }
}

pub fn sanitize_filters(filters: &[Filter], model: &ModelConfiguration) -> Vec<Filter> {
    filters
        .iter()
        .filter(|f| model.contains_field(&f.field))
        .cloned()
        .collect()
}

fn retain_selected(fields: &[String], model: &ModelConfiguration) -> Vec<String> {
    fields
        .iter()
        .filter(|f| model.contains_field(f))
        .cloned()
        .collect()
}
