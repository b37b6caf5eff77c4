//! Tool dispatch
//!
//! Defines the ToolDispatcher trait that both the pipeline and the enrichment
//! step use to reach tools, and LocalToolDispatcher for in-process execution.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RelayError, Result};

use super::catalog::ToolCatalog;
use super::handlers::{self, HandlerFn, ISIC_TO_AOC_MAPPING, SIMPLE_TOOL, SUBMISSION_INTAKE};

/// Measurements taken around a tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionMetadata {
    pub execution_time_ms: u64,
    pub response_size_bytes: u64,
}

/// Payload returned by a tool plus call metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub payload: Value,
    pub metadata: ExecutionMetadata,
}

impl ExecutionResult {
    /// Wrap a payload, measuring its serialized size
    pub fn new(payload: Value, started: Instant) -> Self {
        let response_size_bytes = serde_json::to_vec(&payload).map(|b| b.len() as u64).unwrap_or(0);
        Self {
            payload,
            metadata: ExecutionMetadata {
                execution_time_ms: started.elapsed().as_millis() as u64,
                response_size_bytes,
            },
        }
    }
}

/// Routes `(tool, input)` pairs to tool implementations
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    /// Snapshot of the tools this dispatcher can execute
    async fn catalog(&self) -> Result<Arc<ToolCatalog>>;

    /// Execute a tool; fails with `UnknownTool` for names outside the catalog
    async fn execute(&self, tool: &str, input: Value) -> Result<ExecutionResult>;
}

/// In-process dispatcher over a fixed catalog and handler table
pub struct LocalToolDispatcher {
    catalog: Arc<ToolCatalog>,
    handlers: HashMap<String, HandlerFn>,
}

impl LocalToolDispatcher {
    /// Create a dispatcher with no handlers registered
    pub fn new(catalog: ToolCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            handlers: HashMap::new(),
        }
    }

    /// Built-in catalog with the submission, simple, and ISIC mapping handlers
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(ToolCatalog::builtin()?).with_builtin_handlers())
    }

    /// Register the built-in handlers under their standard names
    pub fn with_builtin_handlers(self) -> Self {
        self.with_handler(SUBMISSION_INTAKE, handlers::submission_intake)
            .with_handler(SIMPLE_TOOL, handlers::simple_tool)
            .with_handler(ISIC_TO_AOC_MAPPING, handlers::isic_to_aoc_mapping)
    }

    /// Register a handler for a tool name
    pub fn with_handler(mut self, tool: impl Into<String>, handler: HandlerFn) -> Self {
        self.handlers.insert(tool.into(), handler);
        self
    }
}

#[async_trait]
impl ToolDispatcher for LocalToolDispatcher {
    async fn catalog(&self) -> Result<Arc<ToolCatalog>> {
        Ok(Arc::clone(&self.catalog))
    }

    async fn execute(&self, tool: &str, input: Value) -> Result<ExecutionResult> {
        self.catalog.require(tool)?;

        let handler = self.handlers.get(tool).ok_or_else(|| {
            warn!("Tool '{}' is in the catalog but has no handler", tool);
            RelayError::Dispatch(format!("No handler registered for tool '{}'", tool))
        })?;

        let started = Instant::now();
        let payload = handler(&input)?;
        let result = ExecutionResult::new(payload, started);
        debug!(
            "Executed tool '{}' in {}ms ({} bytes)",
            tool, result.metadata.execution_time_ms, result.metadata.response_size_bytes
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolDefinition;
    use serde_json::json;

    #[tokio::test]
    async fn test_local_execute_simple_tool() {
        let dispatcher = LocalToolDispatcher::builtin().unwrap();
        let result = dispatcher.execute(SIMPLE_TOOL, json!({"toolInput": "hello"})).await.unwrap();

        assert_eq!(result.payload, json!({"toolOutput": "Processed: hello"}));
        assert_eq!(
            result.metadata.response_size_bytes,
            serde_json::to_vec(&result.payload).unwrap().len() as u64
        );
    }

    #[tokio::test]
    async fn test_local_execute_unknown_tool() {
        let dispatcher = LocalToolDispatcher::builtin().unwrap();
        let err = dispatcher.execute("phantomTool", json!({})).await.unwrap_err();
        assert!(matches!(err, RelayError::UnknownTool(name) if name == "phantomTool"));
    }

    #[tokio::test]
    async fn test_local_execute_handler_error_propagates() {
        let dispatcher = LocalToolDispatcher::builtin().unwrap();
        let err = dispatcher
            .execute(ISIC_TO_AOC_MAPPING, json!({"isicCode": "111"}))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::CodeNotFound(_)));
    }

    #[tokio::test]
    async fn test_local_execute_catalog_entry_without_handler() {
        let catalog = ToolCatalog::from_definitions([ToolDefinition::new("orphan", "Orphan", "no handler")]).unwrap();
        let dispatcher = LocalToolDispatcher::new(catalog);
        let err = dispatcher.execute("orphan", json!({})).await.unwrap_err();
        assert!(matches!(err, RelayError::Dispatch(_)));
    }

    #[tokio::test]
    async fn test_handler_outside_catalog_is_unreachable() {
        let catalog = ToolCatalog::from_definitions([ToolDefinition::new("a", "A", "a")]).unwrap();
        let dispatcher = LocalToolDispatcher::new(catalog).with_handler(SIMPLE_TOOL, handlers::simple_tool);
        let err = dispatcher.execute(SIMPLE_TOOL, json!({"toolInput": "x"})).await.unwrap_err();
        assert!(matches!(err, RelayError::UnknownTool(_)));
    }

    #[tokio::test]
    async fn test_catalog_snapshot_is_shared() {
        let dispatcher = LocalToolDispatcher::builtin().unwrap();
        let a = dispatcher.catalog().await.unwrap();
        let b = dispatcher.catalog().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LocalToolDispatcher>();
    }

    #[test]
    fn test_execution_result_serialization() {
        let result = ExecutionResult {
            payload: json!({"ok": true}),
            metadata: ExecutionMetadata {
                execution_time_ms: 5,
                response_size_bytes: 11,
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["metadata"]["executionTimeMs"], 5);
        assert_eq!(json["metadata"]["responseSizeBytes"], 11);
    }
}
