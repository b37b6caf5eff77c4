//! Tool definitions
//!
//! A tool is a named capability with a declared input schema. Definitions are
//! built at startup and never change afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registered tool and its input contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name (e.g., "simpleTool")
    pub name: String,
    /// Short human-readable title
    pub title: String,
    /// What the tool does, shown to the model during selection
    pub description: String,
    /// JSON schema the tool's input must follow (opaque to this crate)
    pub schema: Value,
}

impl ToolDefinition {
    /// Create a new tool definition with an empty object schema
    pub fn new(name: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            schema: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    /// Set input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }

    /// One-line summary used in the selection prompt
    pub fn describe(&self) -> String {
        format!(
            "Tool Name: {}, Title: {}, Description: {}",
            self.name, self.title, self.description
        )
    }
}
