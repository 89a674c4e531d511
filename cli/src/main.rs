//! # alfred CLI
//!
//! Command-line interface for Alfred - a tool-calling concierge agent.
//!
//! ## Usage
//!
//! - `alfred "question"` - Answer a single question
//! - `alfred tools` - Show available tools
//!
//! The question is answered by a language model that may consult the
//! built-in tools (web search, weather, hub stats, news) before replying.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod output;

use commands::{ask_command, tools_command};
use config::CliConfigLoader;

/// alfred - a tool-calling concierge agent
#[derive(Parser)]
#[command(name = "alfred")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A tool-calling concierge agent written in Rust")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Protocol to use (openai, anthropic, azure_openai)
    #[arg(long)]
    protocol: Option<String>,

    /// API key override
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL override
    #[arg(long)]
    base_url: Option<String>,

    /// Model name override
    #[arg(long)]
    model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output mode (default is normal mode)
    #[arg(short = 'd', long = "debug")]
    debug_output: bool,

    /// Maximum number of model/tool cycles before giving up
    #[arg(long)]
    max_steps: Option<usize>,

    /// Per-step timeout in seconds for model and tool calls
    #[arg(long)]
    step_timeout: Option<u64>,

    /// Output trajectory file
    #[arg(long)]
    trajectory_file: Option<PathBuf>,

    /// The question to answer
    question: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show available tools
    Tools,
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(protocol) = &cli.protocol {
        loader = loader.with_protocol_override(protocol.clone());
    }

    if let Some(api_key) = &cli.api_key {
        loader = loader.with_api_key_override(api_key.clone());
    }

    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }

    if let Some(model) = &cli.model {
        loader = loader.with_model_override(model.clone());
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose || cli.debug_output {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let config_loader = build_config_loader(&cli);

    match (cli.question, cli.command) {
        (Some(question), None) => {
            ask_command(
                question,
                config_loader,
                cli.max_steps,
                cli.step_timeout,
                cli.trajectory_file,
                cli.debug_output,
            )
            .await
        }
        (Some(_), Some(_)) => {
            eprintln!("Error: Cannot specify both a question and a subcommand");
            std::process::exit(2);
        }
        (None, Some(Commands::Tools)) => tools_command().await,
        (None, None) => {
            eprintln!("Error: A question is required. Try: alfred \"What's the weather in Hanoi?\"");
            std::process::exit(2);
        }
    }
}
