// src/assistant/analysis.rs
use tracing::debug;
use uuid::Uuid;

use super::{
    AiAction, Assistant, AssistantReply, AssistantResult, ChatMessage, FieldSuggestion,
    ModelProposal,
};
use crate::compiler::QueryRequest;
use crate::model::{DataRow, Filter, Join, ModelConfiguration, PivotConfig};
use crate::store::{RelationalStore, StoreResult};

/// The analysis state the assistant is allowed to change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub pivot_config: PivotConfig,
    pub filters: Vec<Filter>,
}

/// Result of applying an [`AiAction`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    PivotUpdated,
    /// Id of the appended filter.
    FilterAdded(String),
    /// Rows returned by a literal query.
    Rows(Vec<DataRow>),
    /// Pivot layout and filters were replaced wholesale.
    AnalysisReplaced,
    /// A model the caller may adopt; the analysis is unchanged.
    ModelProposed(ModelProposal),
    /// Registry additions the caller may accept with
    /// [`accept_suggestions`](super::accept_suggestions).
    FieldsSuggested {
        fields: Vec<FieldSuggestion>,
        joins: Vec<Join>,
    },
}

impl Analysis {
    pub fn new(pivot_config: PivotConfig, filters: Vec<Filter>) -> Self {
        Self {
            pivot_config,
            filters,
        }
    }

    /// Apply `action`. On error the analysis is left as it was.
    pub async fn apply<S>(&mut self, action: &AiAction, store: &S) -> StoreResult<ActionOutcome>
    where
        S: RelationalStore + ?Sized,
    {
        match action {
            AiAction::Pivot { config } => {
                self.pivot_config = config.merge_into(&self.pivot_config);
                debug!(pivot = ?self.pivot_config, "assistant updated pivot");
                Ok(ActionOutcome::PivotUpdated)
            }
            AiAction::Filter { config } => {
                let filter = with_filter_id(config);
                let id = filter.id.clone().unwrap_or_default();
                debug!(filter_id = %id, field = %filter.field, "assistant added filter");
                self.filters.push(filter);
                Ok(ActionOutcome::FilterAdded(id))
            }
            AiAction::Query { query } => {
                let rows = store.execute_query(query).await?;
                Ok(ActionOutcome::Rows(rows))
            }
            AiAction::ProposeAnalysis { analysis_proposal } => {
                self.pivot_config = analysis_proposal.pivot_config.clone();
                self.filters = analysis_proposal
                    .filters
                    .iter()
                    .map(with_filter_id)
                    .collect();
                debug!(
                    pivot = ?self.pivot_config,
                    filters = self.filters.len(),
                    "assistant replaced analysis"
                );
                Ok(ActionOutcome::AnalysisReplaced)
            }
            AiAction::ProposeModel { model_proposal } => {
                debug!(
                    tables = model_proposal.model_configuration.len(),
                    joins = model_proposal.joins.len(),
                    "assistant proposed a model"
                );
                Ok(ActionOutcome::ModelProposed(model_proposal.clone()))
            }
            AiAction::SuggestFields {
                suggested_fields,
                suggested_joins,
                reason,
            } => {
                debug!(
                    tables = suggested_fields.len(),
                    reason = reason.as_deref().unwrap_or_default(),
                    "assistant suggested fields"
                );
                Ok(ActionOutcome::FieldsSuggested {
                    fields: suggested_fields.clone(),
                    joins: suggested_joins.clone(),
                })
            }
        }
    }

    /// Ask `assistant` about the current model and apply whatever action it
    /// returns.
    pub async fn ask<A, S>(
        &mut self,
        assistant: &A,
        history: &[ChatMessage],
        prompt: &str,
        model: &ModelConfiguration,
        store: &S,
    ) -> AssistantResult<(AssistantReply, Option<ActionOutcome>)>
    where
        A: Assistant + ?Sized,
        S: RelationalStore + ?Sized,
    {
        let fields: Vec<String> = model
            .available_fields()
            .into_iter()
            .map(str::to_string)
            .collect();

        let reply = assistant.respond(history, prompt, &fields).await?;
        let outcome = match &reply.action {
            Some(action) => Some(self.apply(action, store).await?),
            None => None,
        };
        Ok((reply, outcome))
    }

    /// A compile request for `model` with this analysis' pivot and filters.
    pub fn request(&self, model: ModelConfiguration) -> QueryRequest {
        QueryRequest::new(model)
            .with_pivot(self.pivot_config.clone())
            .with_filters(self.filters.clone())
    }
}

/// `filter`, with a fresh id when it has none.
fn with_filter_id(filter: &Filter) -> Filter {
    match &filter.id {
        Some(_) => filter.clone(),
        None => filter.clone().with_id(Uuid::new_v4().to_string()),
    }
}
