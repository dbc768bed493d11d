// src/model/configuration.rs
use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ordered;

/// The user's active data model: selected tables and their selected fields.
///
/// Insertion order is significant. The first table is the base (driving)
/// table of every generated query, and when a field name appears in several
/// tables the earliest table wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelConfiguration {
    tables: Vec<(String, Vec<String>)>,
}

impl ModelConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, or replace its field list if it is already selected.
    pub fn insert<I, S>(&mut self, table: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = table.into();
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        match self.tables.iter_mut().find(|(t, _)| *t == table) {
            Some(entry) => entry.1 = fields,
            None => self.tables.push((table, fields)),
        }
    }

    /// Append the fields `table` does not list yet, adding the table at the
    /// end if it is not selected.
    pub fn extend_table<I, S>(&mut self, table: &str, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = match self.tables.iter().position(|(t, _)| t == table) {
            Some(index) => index,
            None => {
                self.tables.push((table.to_string(), Vec::new()));
                self.tables.len() - 1
            }
        };

        let selected = &mut self.tables[index].1;
        for field in fields {
            let field = field.into();
            if !selected.contains(&field) {
                selected.push(field);
            }
        }
    }

    /// Builder form of [`ModelConfiguration::insert`].
    pub fn with_table<I, S>(mut self, table: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(table, fields);
        self
    }

    /// Tables with their fields, in insertion order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.tables.iter().map(|(t, f)| (t.as_str(), f.as_slice()))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|(t, _)| t.as_str())
    }

    /// The first selected table.
    pub fn base_table(&self) -> Option<&str> {
        self.tables.first().map(|(t, _)| t.as_str())
    }

    pub fn fields(&self, table: &str) -> Option<&[String]> {
        self.tables
            .iter()
            .find(|(t, _)| t == table)
            .map(|(_, f)| f.as_slice())
    }

    pub fn contains_table(&self, table: &str) -> bool {
        self.tables.iter().any(|(t, _)| t == table)
    }

    /// Whether any selected table lists `field`.
    pub fn contains_field(&self, field: &str) -> bool {
        self.table_for_field(field).is_some()
    }

    /// The first table (in insertion order) whose field list contains `field`.
    pub fn table_for_field(&self, field: &str) -> Option<&str> {
        self.tables
            .iter()
            .find(|(_, fields)| fields.iter().any(|f| f == field))
            .map(|(t, _)| t.as_str())
    }

    /// Every selected field name, de-duplicated, in first-seen order.
    pub fn available_fields(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.tables
            .iter()
            .flat_map(|(_, fields)| fields.iter())
            .filter(|f| seen.insert(f.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Qualified `table.field` keys for every selected field.
    pub fn qualified_fields(&self) -> impl Iterator<Item = String> + '_ {
        self.tables
            .iter()
            .flat_map(|(t, fields)| fields.iter().map(move |f| format!("{}.{}", t, f)))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Serialize for ModelConfiguration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ordered::serialize(&self.tables, serializer)
    }
}

impl<'de> Deserialize<'de> for ModelConfiguration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            tables: ordered::deserialize(deserializer)?,
        })
    }
}
