//! Core LLM client trait and a scripted mock

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{RelayError, Result};

/// Stateless text-completion capability - each call is independent
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Submit a fully-rendered prompt and return the raw response text
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Whether the client is configured well enough to make calls
    fn is_ready(&self) -> bool;
}

/// Scripted client for tests: replays queued responses in order and records prompts
#[derive(Debug, Default)]
pub struct MockLlmClient {
    responses: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    /// Create a mock with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push(Ok(response.into()));
        self
    }

    /// Queue a failed call
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Number of generate calls made
    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }

    fn push(&self, entry: std::result::Result<String, String>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(entry);
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let next = self
            .responses
            .lock()
            .map_err(|_| RelayError::Llm("mock script lock poisoned".to_string()))?
            .pop_front();

        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(RelayError::Llm(message)),
            None => Err(RelayError::Llm("mock script exhausted".to_string())),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        true
    }
}
