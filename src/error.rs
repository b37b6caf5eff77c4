//! Error types for toolrelay
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in toolrelay
#[derive(Debug, Error)]
pub enum RelayError {
    /// Tool name is not registered in the catalog
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Lookup handler has no mapping for the given code
    #[error("Code not found: {0}")]
    CodeNotFound(String),

    /// Handler input lacks a field it needs
    #[error("Tool '{tool}' missing required field: {field}")]
    MissingField { tool: String, field: String },

    /// Two catalog entries share a name
    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    /// Catalog could not be built or fetched
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model call exceeded its deadline
    #[error("LLM call timed out after {0}ms")]
    LlmTimeout(u64),

    /// Model output did not yield a usable tool selection
    #[error("Selection failed: {0}")]
    Selection(String),

    /// Model output did not yield a usable JSON object
    #[error("Transformation failed: {0}")]
    Transformation(String),

    /// Tool host rejected or failed the call
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Invalid configuration or prompt template
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for toolrelay operations
pub type Result<T> = std::result::Result<T, RelayError>;
