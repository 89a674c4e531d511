//! Agent execution result structures

use crate::llm::LlmMessage;
use crate::output::TokenUsage;
use serde::{Deserialize, Serialize};

/// Result of a completed agent run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentExecution {
    /// The final answer text produced by the model
    pub final_answer: String,

    /// Number of model/tool cycles executed
    pub steps_executed: usize,

    /// Total execution time in milliseconds
    pub duration_ms: u64,

    /// Accumulated token usage
    pub token_usage: TokenUsage,

    /// The full conversation, in insertion order
    pub messages: Vec<LlmMessage>,
}

impl AgentExecution {
    /// Create an execution result
    pub fn new(
        final_answer: String,
        steps_executed: usize,
        duration_ms: u64,
        token_usage: TokenUsage,
        messages: Vec<LlmMessage>,
    ) -> Self {
        Self {
            final_answer,
            steps_executed,
            duration_ms,
            token_usage,
            messages,
        }
    }
}
