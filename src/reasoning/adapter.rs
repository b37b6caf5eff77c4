//! Reasoning adapter - selection and transformation over a single LLM client
//!
//! Both protocols render a prompt, make one model call under a deadline, and
//! parse the reply. There are no retries: a malformed reply is a failure for
//! that request.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use serde_json::Value;

use crate::error::{RelayError, Result};
use crate::llm::LlmClient;
use crate::prompt::PromptRenderer;
use crate::tools::{ToolCatalog, ToolDefinition};

use super::selection::{SelectionOutcome, parse_selection};
use super::transform::parse_transformation;

/// Default per-call deadline for model calls
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Drives the model through the selection and transformation protocols
pub struct ReasoningAdapter {
    client: Arc<dyn LlmClient>,
    renderer: PromptRenderer,
    timeout: Duration,
}

impl ReasoningAdapter {
    /// Create an adapter with the built-in prompt templates
    pub fn new(client: Arc<dyn LlmClient>) -> Result<Self> {
        Ok(Self {
            client,
            renderer: PromptRenderer::new()?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set the per-call deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ask the model which catalog tool fits the request
    pub async fn select_tool(&self, request: &Value, catalog: &ToolCatalog) -> Result<SelectionOutcome> {
        if catalog.is_empty() {
            return Err(RelayError::Selection("Catalog is empty".to_string()));
        }

        let prompt = self.renderer.render_selection(request, &catalog.describe())?;
        let response = self.generate(&prompt).await.inspect_err(|e| {
            error!("Error during tool selection: {}", e);
        })?;
        debug!("Raw selection response: {}", response);

        match parse_selection(&response, catalog) {
            Ok(outcome) => {
                debug!("Selection reasoning: {}", outcome.reasoning());
                info!("Selected tool: {} (candidates: {:?})", outcome.primary(), outcome.chosen_tools());
                Ok(outcome)
            }
            Err(e) => {
                error!("Invalid selection response: {}", e);
                Err(e)
            }
        }
    }

    /// Ask the model to reshape the request to the tool's schema
    pub async fn transform(&self, request: &Value, tool: &ToolDefinition) -> Result<Value> {
        let prompt = self.renderer.render_transformation(request, &tool.schema)?;
        let response = self.generate(&prompt).await.inspect_err(|e| {
            error!("Error transforming request for '{}': {}", tool.name, e);
        })?;
        debug!("Raw transformation response for '{}': {}", tool.name, response);

        parse_transformation(&response).inspect_err(|e| {
            error!("Unusable transformation for '{}': {}. Raw response: {}", tool.name, e, response);
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        tokio::time::timeout(self.timeout, self.client.generate(prompt))
            .await
            .map_err(|_| RelayError::LlmTimeout(self.timeout.as_millis() as u64))?
    }
}
