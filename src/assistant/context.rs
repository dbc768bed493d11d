// src/assistant/context.rs
//! Semantic briefing for the AI service.
//!
//! The briefing is markdown built from five tiers, highest priority first:
//!
//! 1. active model (tables, fields, joins)
//! 2. field metadata
//! 3. metrics
//! 4. registry tables outside the model, with their foreign keys
//! 5. sample values
//!
//! Tiers are appended until the character budget would be exceeded. The
//! first tier is cut to fit; any later tier that does not fit ends the
//! briefing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Join, ModelConfiguration};

/// Default briefing size, in characters.
pub const DEFAULT_CONTEXT_BUDGET: usize = 10_000;

/// Sample values shown per field.
const SAMPLES_PER_FIELD: usize = 5;

const HEADER: &str = "# SEMANTIC CONTEXT\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticDataType {
    Dimension,
    Measure,
    Date,
    Identifier,
    Text,
    Boolean,
}

impl SemanticDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticDataType::Dimension => "dimension",
            SemanticDataType::Measure => "measure",
            SemanticDataType::Date => "date",
            SemanticDataType::Identifier => "identifier",
            SemanticDataType::Text => "text",
            SemanticDataType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<SemanticDataType>,
}

/// A named business formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub formula: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKey>,
}

/// A table known to the schema registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredTable {
    pub name: String,
    pub columns: Vec<RegisteredColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Inputs to [`build_semantic_context`].
///
/// Metadata and sample values are keyed by `"table.field"`, listed in the
/// order they should appear.
#[derive(Debug, Clone)]
pub struct ContextSources<'a> {
    pub model: &'a ModelConfiguration,
    pub joins: &'a [Join],
    pub field_metadata: &'a [(String, FieldMetadata)],
    pub metrics: &'a [Metric],
    pub registry: &'a [RegisteredTable],
    pub sample_values: &'a [(String, Vec<String>)],
    pub max_chars: usize,
}

impl<'a> ContextSources<'a> {
    pub fn new(model: &'a ModelConfiguration, joins: &'a [Join]) -> Self {
        Self {
            model,
            joins,
            field_metadata: &[],
            metrics: &[],
            registry: &[],
            sample_values: &[],
            max_chars: DEFAULT_CONTEXT_BUDGET,
        }
    }

    pub fn with_metadata(mut self, field_metadata: &'a [(String, FieldMetadata)]) -> Self {
        self.field_metadata = field_metadata;
        self
    }

    pub fn with_metrics(mut self, metrics: &'a [Metric]) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_registry(mut self, registry: &'a [RegisteredTable]) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_samples(mut self, sample_values: &'a [(String, Vec<String>)]) -> Self {
        self.sample_values = sample_values;
        self
    }

    pub fn with_budget(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }
}

/// Render the briefing for `sources`.
pub fn build_semantic_context(sources: &ContextSources<'_>) -> String {
    let model_fields: HashSet<String> = sources.model.qualified_fields().collect();

    let tiers = [
        active_model_tier(sources),
        metadata_tier(sources, &model_fields),
        metrics_tier(sources),
        registry_tier(sources),
        samples_tier(sources, &model_fields),
    ];

    let mut result = HEADER.to_string();
    for (i, tier) in tiers.into_iter().enumerate() {
        if tier.is_empty() {
            continue;
        }

        let candidate = format!("{}\n{}", result, tier);
        if candidate.chars().count() <= sources.max_chars {
            result = candidate;
            continue;
        }

        if i == 0 {
            result = candidate.chars().take(sources.max_chars).collect();
        }
        break;
    }

    result.trim().to_string()
}

fn active_model_tier(sources: &ContextSources<'_>) -> String {
    let mut lines = vec!["## ACTIVE MODEL".to_string()];

    if sources.model.is_empty() {
        lines.push("No tables selected.".to_string());
    } else {
        lines.push("### Tables & Fields".to_string());
        for (table, fields) in sources.model.tables() {
            lines.push(format!("- **{}**: {}", table, fields.join(", ")));
        }
    }

    if !sources.joins.is_empty() {
        lines.push(String::new());
        lines.push("### Joins".to_string());
        for join in sources.joins {
            lines.push(format!(
                "- {} {} {} ON {} = {}",
                join.from, join.join_type, join.to, join.on.from, join.on.to
            ));
        }
    }

    lines.join("\n")
}

fn metadata_tier(sources: &ContextSources<'_>, model_fields: &HashSet<String>) -> String {
    let entries: Vec<String> = sources
        .field_metadata
        .iter()
        .filter(|(key, _)| model_fields.contains(key))
        .filter_map(|(key, meta)| {
            let mut line = format!("- **{}**", key);
            if meta.data_type.is_none() && meta.description.is_none() {
                return None;
            }
            if let Some(data_type) = meta.data_type {
                line.push_str(&format!(" [{}]", data_type.as_str()));
            }
            if let Some(description) = meta.description.as_deref().filter(|d| !d.is_empty()) {
                line.push_str(&format!(" - {}", description));
            }
            Some(line)
        })
        .collect();

    section("## FIELD METADATA", None, entries)
}

fn metrics_tier(sources: &ContextSources<'_>) -> String {
    let entries = sources
        .metrics
        .iter()
        .map(|metric| {
            let mut line = format!("- **{}**: `{}`", metric.name, metric.formula);
            if let Some(description) = metric.description.as_deref().filter(|d| !d.is_empty()) {
                line.push_str(&format!(" - {}", description));
            }
            line
        })
        .collect();

    section("## AVAILABLE METRICS", None, entries)
}

fn registry_tier(sources: &ContextSources<'_>) -> String {
    let entries = sources
        .registry
        .iter()
        .filter(|table| !sources.model.contains_table(&table.name))
        .map(|table| {
            let relationships: Vec<String> = table
                .columns
                .iter()
                .filter_map(|c| {
                    c.foreign_key
                        .as_ref()
                        .map(|fk| format!("{} -> {}.{}", c.name, fk.table, fk.column))
                })
                .collect();

            if relationships.is_empty() {
                format!("- **{}**", table.name)
            } else {
                format!(
                    "- **{}** (Relationships: {})",
                    table.name,
                    relationships.join("; ")
                )
            }
        })
        .collect();

    section(
        "## OTHER AVAILABLE TABLES (In Registry)",
        Some("Not in the model yet. Offer them to the user with a suggest_fields command."),
        entries,
    )
}

fn samples_tier(sources: &ContextSources<'_>, model_fields: &HashSet<String>) -> String {
    let entries = sources
        .sample_values
        .iter()
        .filter(|(key, values)| model_fields.contains(key) && !values.is_empty())
        .map(|(key, values)| {
            let shown: Vec<&str> = values
                .iter()
                .take(SAMPLES_PER_FIELD)
                .map(String::as_str)
                .collect();
            format!("- {}: {}", key, shown.join(", "))
        })
        .collect();

    section("## SAMPLE VALUES", None, entries)
}

/// A blank line, the heading, an optional intro line and the entries, or
/// nothing when there are no entries.
fn section(heading: &str, intro: Option<&str>, entries: Vec<String>) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut lines = vec![String::new(), heading.to_string()];
    lines.extend(intro.map(str::to_string));
    lines.extend(entries);
    lines.join("\n")
}
