//! Tool System - tool definitions, catalog loading, and dispatch

mod catalog;
mod definition;
mod dispatcher;
pub mod handlers;
mod remote;

pub use catalog::ToolCatalog;
pub use definition::ToolDefinition;
pub use dispatcher::{ExecutionMetadata, ExecutionResult, LocalToolDispatcher, ToolDispatcher};
pub use handlers::{ISIC_TO_AOC_MAPPING, SIMPLE_TOOL, SUBMISSION_INTAKE};
pub use remote::RemoteToolDispatcher;
