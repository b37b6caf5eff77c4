//! HTTP client for an external tool host
//!
//! The host exposes `GET {base}/mcp/tools` returning the catalog listing and
//! `POST {base}/mcp/execute` taking `{tool, input}`. Any non-2xx status is a
//! failure; an `{error}` body supplies the message.
//!
//! `catalog()` fetches the listing and keeps it as the current snapshot.
//! `execute()` checks names against that snapshot, so one pipeline run reads
//! the listing once.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{RelayError, Result};

use super::catalog::ToolCatalog;
use super::dispatcher::{ExecutionResult, ToolDispatcher};

/// Dispatcher that forwards to a remote tool host
pub struct RemoteToolDispatcher {
    client: Client,
    base_url: String,
    snapshot: Mutex<Option<Arc<ToolCatalog>>>,
}

impl RemoteToolDispatcher {
    /// Create a dispatcher for the host at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Dispatch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            snapshot: Mutex::new(None),
        })
    }

    fn tools_url(&self) -> String {
        format!("{}/mcp/tools", self.base_url)
    }

    fn execute_url(&self) -> String {
        format!("{}/mcp/execute", self.base_url)
    }

    /// Fetch the host's current listing
    async fn fetch_catalog(&self) -> Result<ToolCatalog> {
        let url = self.tools_url();
        debug!("Requesting tools from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RelayError::Catalog(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Catalog(format!("Tool host returned {}", status)));
        }

        let listing: Value = response
            .json()
            .await
            .map_err(|e| RelayError::Catalog(format!("Failed to parse tool listing: {}", e)))?;

        ToolCatalog::from_wire(&listing)
    }

    /// Fetch the listing and make it the current snapshot
    async fn refresh(&self) -> Result<Arc<ToolCatalog>> {
        let catalog = Arc::new(self.fetch_catalog().await?);
        if let Ok(mut snapshot) = self.snapshot.lock() {
            *snapshot = Some(Arc::clone(&catalog));
        }
        Ok(catalog)
    }

    /// Current snapshot, fetching only if none has been taken yet
    async fn snapshot(&self) -> Result<Arc<ToolCatalog>> {
        match self.current_snapshot() {
            Some(catalog) => Ok(catalog),
            None => self.refresh().await,
        }
    }

    fn current_snapshot(&self) -> Option<Arc<ToolCatalog>> {
        self.snapshot.lock().ok().and_then(|snapshot| snapshot.clone())
    }
}

#[async_trait]
impl ToolDispatcher for RemoteToolDispatcher {
    async fn catalog(&self) -> Result<Arc<ToolCatalog>> {
        self.refresh().await
    }

    async fn execute(&self, tool: &str, input: Value) -> Result<ExecutionResult> {
        // never POST a name outside the listing
        self.snapshot().await?.require(tool)?;

        let url = self.execute_url();
        debug!("Executing tool '{}' at: {}", tool, url);

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&json!({ "tool": tool, "input": input }))
            .send()
            .await
            .map_err(|e| RelayError::Dispatch(format!("Request for tool '{}' failed: {}", tool, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.map_err(|e| {
                RelayError::Dispatch(format!("Tool host returned {} with an unreadable body: {}", status, e))
            })?;
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| format!("Tool host returned {}: {}", status, text.trim()));
            error!("Error executing tool '{}': {}", tool, message);
            return Err(RelayError::Dispatch(message));
        }

        let body: Value = response.json().await.map_err(|e| {
            error!("Tool '{}' returned a body that is not JSON: {}", tool, e);
            RelayError::Dispatch(format!("Tool '{}' returned a body that is not JSON: {}", tool, e))
        })?;
        if let Some(message) = error_message(&body) {
            error!("Error executing tool '{}': {}", tool, message);
            return Err(RelayError::Dispatch(message));
        }

        Ok(ExecutionResult::new(body, started))
    }
}

fn error_message(body: &Value) -> Option<String> {
    body.get("error").and_then(|e| e.as_str()).map(String::from)
}

impl std::fmt::Debug for RemoteToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteToolDispatcher")
            .field("base_url", &self.base_url)
            .finish()
    }
}
