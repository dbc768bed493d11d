//! Interface to the conversational AI service.
//!
//! The service itself is external. This module defines what it is given
//! (chat history, a prompt, the selectable fields and a semantic briefing)
//! and what it may hand back: a reply text plus at most one action.
//!
//! ```text
//!   prompt ──► Assistant::respond ──► AssistantReply { action, text }
//!                                            │
//!                                            ▼ Analysis::apply
//!               pivot            → merge into the current pivot layout
//!               filter           → append to the current filters
//!               query            → run verbatim against the store
//!               propose_analysis → replace pivot layout and filters
//!               propose_model    → hand a new model back to the caller
//!               suggest_fields   → hand registry additions back to the caller
//! ```

mod analysis;
mod context;

pub use analysis::{ActionOutcome, Analysis};
pub use context::{
    build_semantic_context, ContextSources, FieldMetadata, ForeignKey, Metric, RegisteredColumn,
    RegisteredTable, SemanticDataType, DEFAULT_CONTEXT_BUDGET,
};

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{Filter, Join, ModelConfiguration, PivotConfig, PivotValue};
use crate::store::StoreError;

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```(?:json)?\s*\n?(.*?)\n?\s*```$").unwrap());

const MISSING_RESPONSE: &str = "No response text provided.";
const UNREADABLE_RESPONSE: &str = "I couldn't process the response format.";

/// Errors surfaced while talking to the assistant or acting on its reply.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("AI service error: {0}")]
    Service(String),
}

pub type AssistantResult<T> = Result<T, AssistantError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// A structured action proposed by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AiAction {
    /// Replace parts of the pivot layout.
    Pivot { config: PivotPatch },
    /// Add one filter.
    Filter { config: Filter },
    /// Run literal SQL, bypassing the compiler.
    Query { query: String },
    /// Replace the whole pivot layout and filter list.
    #[serde(rename_all = "camelCase")]
    ProposeAnalysis { analysis_proposal: AnalysisProposal },
    /// A new data model for the user to accept.
    #[serde(rename_all = "camelCase")]
    ProposeModel { model_proposal: ModelProposal },
    /// Registry tables and joins that would let the model answer the
    /// question.
    #[serde(rename_all = "camelCase")]
    SuggestFields {
        suggested_fields: Vec<FieldSuggestion>,
        #[serde(default)]
        suggested_joins: Vec<Join>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisProposal {
    #[serde(default)]
    pub pivot_config: PivotConfig,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProposal {
    pub model_configuration: ModelConfiguration,
    #[serde(default)]
    pub joins: Vec<Join>,
}

/// Fields of one registry table to add to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSuggestion {
    pub table: String,
    pub fields: Vec<String>,
}

/// Add `suggestions` to `model` and `suggested_joins` to `joins`.
///
/// Tables already in the model keep their position and gain only the
/// fields they lack; joins already declared are not repeated.
pub fn accept_suggestions(
    suggestions: &[FieldSuggestion],
    suggested_joins: &[Join],
    model: &mut ModelConfiguration,
    joins: &mut Vec<Join>,
) {
    for suggestion in suggestions {
        model.extend_table(&suggestion.table, suggestion.fields.iter().cloned());
    }
    for join in suggested_joins {
        if !joins.contains(join) {
            joins.push(join.clone());
        }
    }
}

/// A partial pivot layout. Missing parts keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<PivotValue>>,
}

impl PivotPatch {
    pub fn merge_into(&self, current: &PivotConfig) -> PivotConfig {
        PivotConfig {
            rows: self.rows.clone().unwrap_or_else(|| current.rows.clone()),
            columns: self.columns.clone().unwrap_or_else(|| current.columns.clone()),
            values: self.values.clone().unwrap_or_else(|| current.values.clone()),
        }
    }
}

/// What the assistant answered.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub action: Option<AiAction>,
    pub text: String,
}

impl AssistantReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            action: None,
            text: text.into(),
        }
    }

    pub fn with_action(mut self, action: AiAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// A conversational AI service.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Answer `prompt` given the prior conversation and the field names
    /// the user can currently work with.
    async fn respond(
        &self,
        history: &[ChatMessage],
        prompt: &str,
        available_fields: &[String],
    ) -> AssistantResult<AssistantReply>;
}

#[derive(Deserialize)]
struct RawReply {
    #[serde(default)]
    thought: Option<String>,
    #[serde(default)]
    confidence: Option<serde_json::Value>,
    #[serde(default)]
    command: Option<serde_json::Value>,
    #[serde(default)]
    response: Option<String>,
}

/// Parse the raw text of a model reply.
///
/// The reply is expected to be a JSON object
/// `{"thought", "confidence", "command", "response"}`, possibly wrapped in a
/// markdown fence or surrounded by prose. Unparseable content becomes a
/// plain text reply. A command the crate does not understand is dropped.
pub fn parse_reply(content: &str) -> AssistantReply {
    let mut json = content.trim();

    if let Some(inner) = FENCED_JSON.captures(json).and_then(|c| c.get(1)) {
        if !inner.as_str().is_empty() {
            json = inner.as_str().trim();
        }
    }

    if !json.starts_with('{') {
        if let (Some(start), Some(end)) = (json.find('{'), json.rfind('}')) {
            if end > start {
                json = &json[start..=end];
            }
        }
    }

    let raw: RawReply = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "failed to parse assistant reply as JSON");
            let text = if content.is_empty() {
                UNREADABLE_RESPONSE
            } else {
                content
            };
            return AssistantReply::text(text);
        }
    };

    if let Some(thought) = &raw.thought {
        debug!(thought = %thought, "assistant thought");
    }
    if let Some(confidence) = &raw.confidence {
        debug!(confidence = %confidence, "assistant confidence");
    }

    let action = raw
        .command
        .filter(|command| !command.is_null())
        .and_then(|command| match serde_json::from_value::<AiAction>(command) {
            Ok(action) => Some(action),
            Err(e) => {
                debug!(error = %e, "ignoring unsupported assistant command");
                None
            }
        });

    AssistantReply {
        action,
        text: raw
            .response
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| MISSING_RESPONSE.to_string()),
    }
}
