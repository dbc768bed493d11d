// src/model/join.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// A declared join edge between two tables.
///
/// `on.from` is a field of `from`, `on.to` a field of `to`. The compiler
/// does not check this; a wrong field fails when the store runs the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub join_type: JoinType,
    pub on: JoinOn,
}

impl Join {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        join_type: JoinType,
        on: (impl Into<String>, impl Into<String>),
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            join_type,
            on: JoinOn {
                from: on.0.into(),
                to: on.1.into(),
            },
        }
    }

    pub fn touches(&self, table: &str) -> bool {
        self.from == table || self.to == table
    }
}

/// Join key columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOn {
    pub from: String,
    pub to: String,
}

/// SQL join kind, serialized as the keyword the UI uses (`"LEFT JOIN"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for JoinType {
    type Err = ModelError;

    /// Accepts `INNER`, `INNER JOIN`, `left outer join`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        let kind = normalized
            .strip_suffix(" JOIN")
            .unwrap_or(normalized.as_str())
            .trim_end_matches(" OUTER");
        match kind {
            "INNER" => Ok(JoinType::Inner),
            "LEFT" => Ok(JoinType::Left),
            "RIGHT" => Ok(JoinType::Right),
            "FULL" => Ok(JoinType::Full),
            _ => Err(ModelError::UnknownJoinType(s.to_string())),
        }
    }
}

impl TryFrom<String> for JoinType {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<JoinType> for String {
    fn from(join_type: JoinType) -> Self {
        join_type.as_sql().to_string()
    }
}
