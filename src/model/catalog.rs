// src/model/catalog.rs
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A table as introspected from the relational store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredTable {
    pub name: String,
    pub fields: Vec<String>,
}

impl DiscoveredTable {
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

/// Display names keyed by `"table.field"`.
///
/// Aliases only change the `AS` name of a projected column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldAliases(HashMap<String, String>);

impl FieldAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(table: &str, field: &str) -> String {
        format!("{}.{}", table, field)
    }

    pub fn insert(&mut self, table: &str, field: &str, alias: impl Into<String>) {
        self.0.insert(Self::key(table, field), alias.into());
    }

    pub fn with_alias(mut self, table: &str, field: &str, alias: impl Into<String>) -> Self {
        self.insert(table, field, alias);
        self
    }

    /// The alias for `table.field`, ignoring blank entries.
    pub fn get(&self, table: &str, field: &str) -> Option<&str> {
        self.0
            .get(&Self::key(table, field))
            .map(String::as_str)
            .filter(|alias| !alias.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
