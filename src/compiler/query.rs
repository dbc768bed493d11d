// src/compiler/query.rs
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::from_clause::build_from_clause;
use super::pivot::PivotColumn;
use super::predicate::where_conditions;
use super::resolve::Scope;
use super::sanitize::{sanitize_filters, sanitize_pivot};
use crate::model::{
    DiscoveredTable, FieldAliases, Filter, Join, ModelConfiguration, PivotConfig, PivotValue,
};
use crate::sql::Dialect;
use crate::store::{RelationalStore, StoreResult};

/// A snapshot of everything the user has configured.
///
/// Deserializes from the UI state shape, with every key but
/// `modelConfiguration` optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryRequest {
    pub model_configuration: ModelConfiguration,
    pub joins: Vec<Join>,
    pub pivot_config: PivotConfig,
    pub filters: Vec<Filter>,
    pub discovered_tables: Vec<DiscoveredTable>,
    pub field_aliases: FieldAliases,
    /// Explicit flat selection. `None` selects every model field, an empty
    /// list selects nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_fields: Option<Vec<String>>,
}

impl QueryRequest {
    pub fn new(model_configuration: ModelConfiguration) -> Self {
        Self {
            model_configuration,
            ..Default::default()
        }
    }

    pub fn with_joins(mut self, joins: Vec<Join>) -> Self {
        self.joins = joins;
        self
    }

    pub fn with_pivot(mut self, pivot_config: PivotConfig) -> Self {
        self.pivot_config = pivot_config;
        self
    }

    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_catalog(mut self, discovered_tables: Vec<DiscoveredTable>) -> Self {
        self.discovered_tables = discovered_tables;
        self
    }

    pub fn with_aliases(mut self, field_aliases: FieldAliases) -> Self {
        self.field_aliases = field_aliases;
        self
    }

    pub fn with_selected_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

/// Compiles a [`QueryRequest`] into SQL for one dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryCompiler {
    dialect: Dialect,
}

impl QueryCompiler {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub(crate) fn scope<'a>(&'a self, request: &'a QueryRequest) -> Scope<'a> {
        Scope {
            dialect: &self.dialect,
            model: &request.model_configuration,
            catalog: &request.discovered_tables,
            aliases: &request.field_aliases,
        }
    }

    /// Compile the request.
    ///
    /// `Ok(None)` means there is nothing to render. The store is read only
    /// when a pivot column and at least one value are configured; a failed
    /// read is returned unmodified and no SQL is produced.
    pub async fn generate_query<S>(
        &self,
        request: &QueryRequest,
        store: &S,
    ) -> StoreResult<Option<String>>
    where
        S: RelationalStore + ?Sized,
    {
        let model = &request.model_configuration;
        if model.is_empty() {
            return Ok(None);
        }

        let pivot = sanitize_pivot(&request.pivot_config, model);
        let filters = sanitize_filters(&request.filters, model);

        let scope = self.scope(request);
        let from_clause = build_from_clause(&self.dialect, model, &request.joins);
        let conditions = where_conditions(&self.dialect, &filters, model, &request.discovered_tables);

        let select = if pivot.is_pivoted() {
            match self
                .pivoted_select(&scope, &pivot, &from_clause, &conditions, store)
                .await?
            {
                Some(select) => select,
                None => return Ok(None),
            }
        } else if pivot.is_empty() {
            match flat_select(&scope, request.selected_fields.as_deref()) {
                Some(select) => select,
                None => return Ok(None),
            }
        } else {
            grouped_select(&scope, &pivot.rows, &pivot.values)
        };

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = assemble([
            format!("SELECT {}", select.columns.join(", ")),
            from_clause,
            where_clause,
            group_by(&select.group_by),
        ]);
        debug!(dialect = %self.dialect, sql = %sql, "compiled query");
        Ok(Some(sql))
    }

    async fn pivoted_select<S>(
        &self,
        scope: &Scope<'_>,
        pivot: &PivotConfig,
        from_clause: &str,
        conditions: &[String],
        store: &S,
    ) -> StoreResult<Option<Select>>
    where
        S: RelationalStore + ?Sized,
    {
        let Some(field) = pivot.columns.first() else {
            return Ok(None);
        };
        let Some(table) = scope.table(field) else {
            return Ok(None);
        };
        let column = PivotColumn {
            table,
            field: field.as_str(),
        };

        let sql = column.distinct_values_query(scope, from_clause, conditions);
        let values = column.fetch_values(store, &sql).await?;

        let mut select = rows_select(scope, &pivot.rows);
        select
            .columns
            .extend(column.select_expressions(scope, &values, &pivot.values));

        if select.columns.is_empty() {
            return Ok(None);
        }
        Ok(Some(select))
    }

    /// The placeholder-or-SQL preview of every selected field.
    pub fn generate_preview_query(&self, request: &QueryRequest) -> String {
        super::preview::preview_query(&self.scope(request), &request.joins)
    }
}

/// Compile `request` with the store's dialect.
pub async fn generate_query<S>(request: &QueryRequest, store: &S) -> StoreResult<Option<String>>
where
    S: RelationalStore + ?Sized,
{
    QueryCompiler::new(store.dialect())
        .generate_query(request, store)
        .await
}

/// Preview `request` with the default dialect.
pub fn generate_preview_query(request: &QueryRequest) -> String {
    QueryCompiler::default().generate_preview_query(request)
}

/// Select list plus GROUP BY columns.
#[derive(Debug, Default)]
struct Select {
    columns: Vec<String>,
    group_by: Vec<String>,
}

fn rows_select(scope: &Scope<'_>, rows: &[String]) -> Select {
    Select {
        columns: rows.iter().filter_map(|f| scope.projection(f)).collect(),
        group_by: rows.iter().filter_map(|f| scope.column(f)).collect(),
    }
}

fn grouped_select(scope: &Scope<'_>, rows: &[String], values: &[PivotValue]) -> Select {
    let mut select = rows_select(scope, rows);
    select.columns.extend(values.iter().filter_map(|v| {
        let column = scope.column(&v.field)?;
        Some(format!(
            "{}({}) AS {}",
            v.aggregation,
            column,
            scope.dialect.quote_identifier(&v.aggregate_label())
        ))
    }));

    if select.columns.is_empty() {
        select.columns.push("1".to_string());
    }
    select
}

fn flat_select(scope: &Scope<'_>, selected: Option<&[String]>) -> Option<Select> {
    let fields: Vec<&str> = match selected {
        Some(selected) => {
            let mut fields: Vec<&str> = Vec::with_capacity(selected.len());
            for field in selected {
                if scope.model.contains_field(field) && !fields.contains(&field.as_str()) {
                    fields.push(field);
                }
            }
            fields
        }
        None => scope.model.available_fields(),
    };

    let columns: Vec<String> = fields
        .iter()
        .filter_map(|f| scope.projection(f))
        .collect();
    if columns.is_empty() {
        return None;
    }

    Some(Select {
        columns,
        group_by: Vec::new(),
    })
}

fn group_by(columns: &[String]) -> String {
    if columns.is_empty() {
        String::new()
    } else {
        format!("GROUP BY {}", columns.join(", "))
    }
}

fn assemble<const N: usize>(parts: [String; N]) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
