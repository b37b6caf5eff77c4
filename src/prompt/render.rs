//! Prompt Renderer - Render the selection and transformation templates using Handlebars

use handlebars::Handlebars;
use serde_json::{Value, json};

use crate::error::{RelayError, Result};

use super::templates::{SELECT_TOOL, SELECT_TOOL_TEMPLATE, TRANSFORM_INPUT, TRANSFORM_INPUT_TEMPLATE};

/// Renders the fixed prompt templates with request data
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl PromptRenderer {
    /// Create a renderer with the built-in templates registered
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // Prompts are plain text; never HTML-escape JSON
        handlebars.register_escape_fn(handlebars::no_escape);

        let mut renderer = Self { handlebars };
        renderer.register_template(SELECT_TOOL, SELECT_TOOL_TEMPLATE)?;
        renderer.register_template(TRANSFORM_INPUT, TRANSFORM_INPUT_TEMPLATE)?;
        Ok(renderer)
    }

    fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| RelayError::Config(format!("Failed to register template '{}': {}", name, e)))
    }

    /// Prompt asking the model to pick a tool for the request
    pub fn render_selection(&self, user_request: &Value, tools_description: &str) -> Result<String> {
        let context = json!({
            "userRequest": pretty(user_request),
            "toolsDescription": tools_description,
        });
        self.render_named(SELECT_TOOL, &context)
    }

    /// Prompt asking the model to reshape the request to a schema
    pub fn render_transformation(&self, user_request: &Value, schema: &Value) -> Result<String> {
        let context = json!({
            "userData": pretty(user_request),
            "schema": pretty(schema),
        });
        self.render_named(TRANSFORM_INPUT, &context)
    }

    fn render_named(&self, name: &str, context: &Value) -> Result<String> {
        self.handlebars
            .render(name, context)
            .map_err(|e| RelayError::Config(format!("Failed to render template '{}': {}", name, e)))
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_template_is_config_error() {
        let renderer = PromptRenderer::new().unwrap();
        let err = renderer.render_named("nonexistent", &json!({})).unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }

    #[test]
    fn test_render_selection() {
        let renderer = PromptRenderer::new().unwrap();
        let request = json!({"title": "x", "toolInput": "hello"});

        let prompt = renderer
            .render_selection(&request, "Tool Name: simpleTool, Title: Simple Tool, Description: demo\n")
            .unwrap();

        assert!(prompt.contains("\"toolInput\": \"hello\""));
        assert!(prompt.contains("Tool Name: simpleTool"));
        assert!(prompt.contains("Final Answer:"));
    }

    #[test]
    fn test_render_transformation_no_escape() {
        let renderer = PromptRenderer::new().unwrap();
        let request = json!({"note": "<b>&</b>"});
        let schema = json!({"required": ["toolInput"]});

        let prompt = renderer.render_transformation(&request, &schema).unwrap();

        assert!(prompt.contains("<b>&</b>"));
        assert!(prompt.contains("\"toolInput\""));
        assert!(!prompt.contains("&quot;"));
    }

    #[test]
    fn test_override_template() {
        let mut renderer = PromptRenderer::new().unwrap();
        renderer.register_template(SELECT_TOOL, "Tools: {{toolsDescription}}").unwrap();

        let prompt = renderer.render_selection(&json!({}), "a, b").unwrap();
        assert_eq!(prompt, "Tools: a, b");
    }

    #[test]
    fn test_register_invalid_template() {
        let mut renderer = PromptRenderer::new().unwrap();
        assert!(renderer.register_template("broken", "{{#if}}").is_err());
    }
}
