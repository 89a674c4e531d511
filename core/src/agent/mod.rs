//! Agent core logic and execution engine

pub mod base;
pub mod config;
pub mod core;
pub mod execution;
pub mod prompt;
pub mod router;

pub use base::{Agent, AgentResult};
pub use config::{AgentBuilder, AgentConfig};
pub use core::AgentCore;
pub use execution::AgentExecution;
pub use prompt::{build_system_prompt, ALFRED_SYSTEM_PROMPT};
pub use router::{Decision, Router};
