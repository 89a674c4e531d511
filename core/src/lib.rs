//! # Alfred Core
//!
//! Core library for Alfred - a tool-calling concierge agent.
//!
//! This library wires a language model to a small set of named tools: a
//! conversation is seeded with one question, the model either answers or
//! requests a tool call, tool results are appended back into the
//! conversation, and the loop repeats until a final answer is produced or
//! the loop budget runs out.

// Core modules
pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod tools;
pub mod trajectory;

// Re-export commonly used types
pub use agent::{Agent, AgentBuilder, AgentConfig, AgentCore, AgentExecution, Decision, Router};
pub use config::{ModelParams, Protocol, ResolvedLlmConfig};
pub use llm::Conversation;
pub use tools::{ToolDispatcher, ToolRegistry};
pub use trajectory::TrajectoryRecorder;

/// Current version of the alfred-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for the library
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// Initialize tracing with a specific debug mode
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
