//! Pipeline orchestrator
//!
//! Composition root for one request: fetch the catalog, enrich, select a
//! tool, transform the request to the tool's schema, execute. Stages run
//! sequentially; invocations share nothing but the dispatcher and adapter.

use std::sync::Arc;

use log::{debug, info};
use serde_json::Value;

use crate::enrichment::{EnrichmentOutcome, EnrichmentResolver};
use crate::reasoning::ReasoningAdapter;
use crate::tools::{ExecutionResult, ToolDispatcher};

use super::stage::{PipelineError, PipelineStage, StageOutcome};

/// End-to-end request pipeline
pub struct Pipeline {
    dispatcher: Arc<dyn ToolDispatcher>,
    reasoning: ReasoningAdapter,
    enrichment: Option<EnrichmentResolver>,
}

impl Pipeline {
    /// Create a pipeline with enrichment enabled
    pub fn new(dispatcher: Arc<dyn ToolDispatcher>, reasoning: ReasoningAdapter) -> Self {
        let enrichment = Some(EnrichmentResolver::new(Arc::clone(&dispatcher)));
        Self {
            dispatcher,
            reasoning,
            enrichment,
        }
    }

    /// Skip the enrichment stage entirely
    pub fn without_enrichment(mut self) -> Self {
        self.enrichment = None;
        self
    }

    /// Run one request through every stage
    pub async fn run(&self, request: Value) -> Result<ExecutionResult, PipelineError> {
        info!("Starting pipeline run");

        let catalog = StageOutcome::from_result(self.dispatcher.catalog().await).resolve(PipelineStage::CatalogFetch)?;
        debug!("Retrieved {} tools: {:?}", catalog.len(), catalog.names());

        let request = self.enrich(request).await.resolve(PipelineStage::Enrichment)?;

        let selection = StageOutcome::from_result(self.reasoning.select_tool(&request, &catalog).await)
            .resolve(PipelineStage::Selection)?;
        let tool_name = selection.primary();
        let tool = StageOutcome::from_result(catalog.require(tool_name)).resolve(PipelineStage::Selection)?;

        let input = StageOutcome::from_result(self.reasoning.transform(&request, tool).await)
            .resolve(PipelineStage::Transformation)?;
        debug!("Transformed input for '{}': {}", tool_name, input);

        let result = StageOutcome::from_result(self.dispatcher.execute(tool_name, input).await)
            .resolve(PipelineStage::Execution)?;

        info!(
            "Successfully executed tool '{}' ({}ms, {} bytes)",
            tool_name, result.metadata.execution_time_ms, result.metadata.response_size_bytes
        );
        Ok(result)
    }

    /// Enrichment never aborts: failures fall back to the untouched request
    async fn enrich(&self, request: Value) -> StageOutcome<Value> {
        let Some(resolver) = &self.enrichment else {
            return StageOutcome::Success(request);
        };

        match resolver.enrich(request).await {
            (request, EnrichmentOutcome::Unchanged) => StageOutcome::Success(request),
            (request, EnrichmentOutcome::Enriched { field, .. }) => {
                debug!("Request gained field '{}'", field);
                StageOutcome::Success(request)
            }
            (request, EnrichmentOutcome::Skipped { reason }) => StageOutcome::SoftFailure {
                fallback: request,
                reason,
            },
        }
    }
}
