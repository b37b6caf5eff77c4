use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use toolrelay::config::{Config, ToolsMode};
use toolrelay::llm::{AnthropicClient, LlmClient};
use toolrelay::pipeline::Pipeline;
use toolrelay::reasoning::ReasoningAdapter;
use toolrelay::tools::{LocalToolDispatcher, RemoteToolDispatcher, ToolCatalog, ToolDispatcher};

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolrelay")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("toolrelay.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    let default_level = config.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_dispatcher(config: &Config) -> Result<Arc<dyn ToolDispatcher>> {
    match config.tools.mode {
        ToolsMode::Local => {
            let catalog = match &config.tools.catalog_path {
                Some(path) => ToolCatalog::from_file(path)
                    .context(format!("Failed to load catalog from {}", path.display()))?,
                None => ToolCatalog::builtin().context("Failed to load built-in catalog")?,
            };
            info!("Using local tool host with {} tools", catalog.len());
            Ok(Arc::new(LocalToolDispatcher::new(catalog).with_builtin_handlers()))
        }
        ToolsMode::Remote => {
            info!("Using remote tool host at {}", config.tools.server_url);
            let dispatcher = RemoteToolDispatcher::new(&config.tools.server_url, config.tools.timeout())
                .context("Failed to create remote tool client")?;
            Ok(Arc::new(dispatcher))
        }
    }
}

fn read_json(path: Option<&Path>) -> Result<Value> {
    let content = match path {
        Some(path) => fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };
    serde_json::from_str(&content).context("Input is not valid JSON")
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let dispatcher = build_dispatcher(config)?;

    match &cli.command {
        Commands::Tools => handle_tools_command(dispatcher.as_ref()).await,
        Commands::Run { request, no_enrichment } => {
            handle_run_command(dispatcher, request.as_deref(), *no_enrichment, cli.is_verbose(), config).await
        }
        Commands::Execute { tool, input } => handle_execute_command(dispatcher.as_ref(), tool, input.as_deref()).await,
    }
}

async fn handle_tools_command(dispatcher: &dyn ToolDispatcher) -> Result<()> {
    let catalog = dispatcher.catalog().await.context("Failed to fetch tool catalog")?;
    println!("{} {} tools", "Catalog:".green(), catalog.len());
    for tool in catalog.iter() {
        println!("  {} - {}", tool.name.cyan(), tool.title);
        println!("      {}", tool.description.dimmed());
    }
    Ok(())
}

async fn handle_run_command(
    dispatcher: Arc<dyn ToolDispatcher>,
    request: Option<&Path>,
    no_enrichment: bool,
    verbose: bool,
    config: &Config,
) -> Result<()> {
    let request = read_json(request)?;

    let client = Arc::new(AnthropicClient::new(config.llm.anthropic()).context("Failed to create LLM client")?);
    if !client.is_ready() {
        eyre::bail!("LLM client is not ready: {} is empty", config.llm.api_key_env);
    }
    info!("Using model {}", client.model());
    let reasoning = ReasoningAdapter::new(client.clone())
        .context("Failed to load prompt templates")?
        .with_timeout(config.llm.timeout());

    let mut pipeline = Pipeline::new(dispatcher, reasoning);
    if no_enrichment || !config.pipeline.enrichment {
        pipeline = pipeline.without_enrichment();
    }

    let outcome = pipeline.run(request).await;

    let usage = client.total_usage();
    info!("Token usage: {} input, {} output", usage.input_tokens, usage.output_tokens);

    match outcome {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result.payload)?);
            if verbose {
                println!(
                    "{} {}ms, {} bytes",
                    "Metadata:".cyan(),
                    result.metadata.execution_time_ms,
                    result.metadata.response_size_bytes
                );
                println!(
                    "{} {} input, {} output tokens",
                    "Usage:".cyan(),
                    usage.input_tokens,
                    usage.output_tokens
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "Failed:".red(), e);
            Err(e).context("Pipeline failed")
        }
    }
}

async fn handle_execute_command(dispatcher: &dyn ToolDispatcher, tool: &str, input: Option<&Path>) -> Result<()> {
    let input = read_json(input)?;
    info!("Executing tool '{}' directly", tool);

    let result = dispatcher
        .execute(tool, input)
        .await
        .context(format!("Tool '{}' failed", tool))?;
    println!("{}", serde_json::to_string_pretty(&result.payload)?);
    println!(
        "{} {}ms, {} bytes",
        "Metadata:".cyan(),
        result.metadata.execution_time_ms,
        result.metadata.response_size_bytes
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging once the level is known
    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
