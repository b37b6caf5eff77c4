//! Prompt System - the two fixed prompts sent to the model
//!
//! Templates are rendered with Handlebars; the user request and schema are
//! inserted as pretty-printed JSON.

mod render;
mod templates;

pub use render::PromptRenderer;
pub use templates::{DELIMITER, FINAL_ANSWER_LABEL, SELECT_TOOL, TRANSFORM_INPUT};
