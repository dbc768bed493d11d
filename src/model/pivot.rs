// src/model/pivot.rs
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ModelError;

static AGGREGATE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Pivot layout: row dimensions, an optional column dimension and the
/// aggregated values.
///
/// Only the first entry of `columns` is ever used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotConfig {
    #[serde(default)]
    pub rows: Vec<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub values: Vec<PivotValue>,
}

impl PivotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows<I, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows = rows.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_value(mut self, value: PivotValue) -> Self {
        self.values.push(value);
        self
    }

    /// True when a column dimension and at least one value are configured.
    pub fn is_pivoted(&self) -> bool {
        !self.columns.is_empty() && !self.values.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty() && self.values.is_empty()
    }
}

/// An aggregated value in the pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotValue {
    pub field: String,
    pub aggregation: Aggregation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl PivotValue {
    pub fn new(field: impl Into<String>, aggregation: Aggregation) -> Self {
        Self {
            field: field.into(),
            aggregation,
            display_name: None,
        }
    }

    pub fn named(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Label for a grouped aggregate column, e.g. `SUM_of_total_jobs`.
    pub fn aggregate_label(&self) -> String {
        self.display_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}_of_{}", self.aggregation, self.field))
    }

    /// Label for a pivoted aggregate column, e.g. `SUM of total_jobs`.
    pub fn pivot_label(&self) -> String {
        self.display_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} of {}", self.aggregation, self.field))
    }
}

/// SQL aggregate function applied to a pivot value.
///
/// Keywords beyond the five built-ins are accepted when they are bare SQL
/// identifiers, so the aggregate slot can never carry other SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Aggregation {
    Sum,
    Count,
    Avg,
    Min,
    Max,
    Custom(String),
}

impl Aggregation {
    pub fn as_str(&self) -> &str {
        match self {
            Aggregation::Sum => "SUM",
            Aggregation::Count => "COUNT",
            Aggregation::Avg => "AVG",
            Aggregation::Min => "MIN",
            Aggregation::Max => "MAX",
            Aggregation::Custom(keyword) => keyword,
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SUM" => Ok(Aggregation::Sum),
            "COUNT" => Ok(Aggregation::Count),
            "AVG" => Ok(Aggregation::Avg),
            "MIN" => Ok(Aggregation::Min),
            "MAX" => Ok(Aggregation::Max),
            _ if AGGREGATE_KEYWORD.is_match(s) => Ok(Aggregation::Custom(s.to_uppercase())),
            _ => Err(ModelError::InvalidAggregation(s.to_string())),
        }
    }
}

impl TryFrom<String> for Aggregation {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Aggregation> for String {
    fn from(aggregation: Aggregation) -> Self {
        aggregation.as_str().to_string()
    }
}
