//! Toolrelay - LLM-driven tool selection and input transformation
//!
//! A free-form JSON request is optionally enriched with derived codes, matched
//! to a tool from a catalog by a language model, reshaped to that tool's input
//! schema, and executed through a local or remote tool host.

pub mod config;
pub mod enrichment;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod reasoning;
pub mod tools;

pub use error::{RelayError, Result};
