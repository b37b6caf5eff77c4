//! CLI command definitions using clap.
//!
//! - tools: list the tool catalog
//! - run: push a JSON request through the full pipeline
//! - execute: call one tool directly with JSON input

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Toolrelay - route free-form JSON requests to the right tool via an LLM
#[derive(Parser, Debug)]
#[command(name = "toolrelay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the tools the configured host offers
    Tools,

    /// Route a JSON request through enrichment, selection, transformation and execution
    Run {
        /// File holding the request (stdin when omitted)
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// Skip the enrichment stage
        #[arg(long)]
        no_enrichment: bool,
    },

    /// Execute a single tool with literal JSON input, bypassing the model
    Execute {
        /// Tool name as listed in the catalog
        tool: String,

        /// File holding the tool input (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}
