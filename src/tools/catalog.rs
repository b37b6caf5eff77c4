//! Tool catalog
//!
//! Read-only registry of tool definitions. A catalog is built once (from the
//! built-in set, a TOML file, or a tool host's wire listing) and shared as an
//! immutable snapshot afterwards. Any schema that fails to load fails the
//! whole build; there is no partial catalog.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RelayError, Result};

use super::definition::ToolDefinition;
use super::handlers::{ISIC_TO_AOC_MAPPING, SIMPLE_TOOL, SUBMISSION_INTAKE};

const SIMPLE_TOOL_SCHEMA: &str = include_str!("../../schemas/simple-tool.json");
const SUBMISSION_INTAKE_SCHEMA: &str = include_str!("../../schemas/submission-intake.json");
const ISIC_TO_AOC_SCHEMA: &str = include_str!("../../schemas/isic-to-aoc-mapping.json");

/// TOML representation of a tool definition
#[derive(Debug, Deserialize)]
struct TomlTool {
    name: String,
    title: String,
    description: String,
    /// Path to a JSON schema file, relative to the catalog file
    schema: PathBuf,
}

/// TOML file structure
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    #[serde(rename = "tool", default)]
    tools: Vec<TomlTool>,
}

/// Per-tool entry in the tool host's `{name: {...}}` listing
#[derive(Debug, Serialize, Deserialize)]
struct WireTool {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    schema: Value,
}

/// Immutable catalog of tool definitions keyed by name
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: BTreeMap<String, ToolDefinition>,
}

impl ToolCatalog {
    /// Build a catalog from definitions, rejecting duplicate names
    pub fn from_definitions(definitions: impl IntoIterator<Item = ToolDefinition>) -> Result<Self> {
        let mut tools = BTreeMap::new();
        for tool in definitions {
            if tools.contains_key(&tool.name) {
                return Err(RelayError::DuplicateTool(tool.name));
            }
            tools.insert(tool.name.clone(), tool);
        }
        Ok(Self { tools })
    }

    /// The tools served by the in-process dispatcher
    pub fn builtin() -> Result<Self> {
        Self::from_definitions([
            ToolDefinition::new(SUBMISSION_INTAKE, "Submission Intake", "Handles new submission requests")
                .with_schema(parse_schema(SUBMISSION_INTAKE, SUBMISSION_INTAKE_SCHEMA)?),
            ToolDefinition::new(SIMPLE_TOOL, "Simple Tool", "A very simple tool for demonstration")
                .with_schema(parse_schema(SIMPLE_TOOL, SIMPLE_TOOL_SCHEMA)?),
            ToolDefinition::new(
                ISIC_TO_AOC_MAPPING,
                "ISIC to AOC Mapping",
                "Translates an ISIC industry code into the matching Activity on Location (AOC) code",
            )
            .with_schema(parse_schema(ISIC_TO_AOC_MAPPING, ISIC_TO_AOC_SCHEMA)?),
        ])
    }

    /// Load catalog from a TOML file; schema paths resolve against its directory
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RelayError::Catalog(format!("Failed to read catalog file {}: {}", path.display(), e)))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml(&content, base_dir)
    }

    /// Load catalog from TOML string
    pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self> {
        let catalog: TomlCatalog =
            toml::from_str(content).map_err(|e| RelayError::Catalog(format!("Failed to parse TOML: {}", e)))?;

        let mut definitions = Vec::with_capacity(catalog.tools.len());
        for toml_tool in catalog.tools {
            let schema_path = base_dir.join(&toml_tool.schema);
            let raw = std::fs::read_to_string(&schema_path).map_err(|e| {
                RelayError::Catalog(format!(
                    "Failed to read schema {} for tool '{}': {}",
                    schema_path.display(),
                    toml_tool.name,
                    e
                ))
            })?;
            let schema = parse_schema(&toml_tool.name, &raw)?;
            definitions.push(
                ToolDefinition::new(toml_tool.name, toml_tool.title, toml_tool.description).with_schema(schema),
            );
        }

        Self::from_definitions(definitions)
    }

    /// Parse a tool host's `{name: {description, title, schema}}` listing
    pub fn from_wire(listing: &Value) -> Result<Self> {
        let entries = listing
            .as_object()
            .ok_or_else(|| RelayError::Catalog("Tool listing is not a JSON object".to_string()))?;

        let mut definitions = Vec::with_capacity(entries.len());
        for (name, entry) in entries {
            let wire: WireTool = serde_json::from_value(entry.clone())
                .map_err(|e| RelayError::Catalog(format!("Malformed entry for tool '{}': {}", name, e)))?;
            definitions.push(ToolDefinition::new(name.clone(), wire.title, wire.description).with_schema(wire.schema));
        }

        Self::from_definitions(definitions)
    }

    /// Render as the tool host's `{name: {description, title, schema}}` listing
    pub fn to_wire(&self) -> Value {
        let entries: serde_json::Map<String, Value> = self
            .tools
            .values()
            .map(|t| {
                let wire = WireTool {
                    title: t.title.clone(),
                    description: t.description.clone(),
                    schema: t.schema.clone(),
                };
                (t.name.clone(), serde_json::to_value(wire).unwrap_or(Value::Null))
            })
            .collect();
        Value::Object(entries)
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Get a tool by name, failing with `UnknownTool` when absent
    pub fn require(&self, name: &str) -> Result<&ToolDefinition> {
        self.get(name).ok_or_else(|| RelayError::UnknownTool(name.to_string()))
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all tool names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Get all tools
    pub fn iter(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    /// Get number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool list for the selection prompt, one tool per line
    pub fn describe(&self) -> String {
        self.tools.values().map(|t| format!("{}\n", t.describe())).collect()
    }
}

fn parse_schema(tool: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw)
        .map_err(|e| RelayError::Catalog(format!("Invalid schema for tool '{}': {}", tool, e)))
}
