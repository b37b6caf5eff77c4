//! LLM Client Layer - the text-completion capability behind selection and transformation
//!
//! This module provides:
//! - LlmClient trait (`generate(prompt) -> text`)
//! - AnthropicClient implementation
//! - MockLlmClient for scripted tests

pub mod anthropic;
pub mod client;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::{LlmClient, MockLlmClient};
