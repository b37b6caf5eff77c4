//! CLI module for toolrelay - command-line interface and subcommands.
//!
//! Provides the entry point for listing tools, running a request through the
//! pipeline, and invoking a tool directly.

pub mod commands;

pub use commands::Cli;
