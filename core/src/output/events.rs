//! Agent events and the output handler trait

use crate::tools::{ToolCall, ToolResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result type for output operations
pub type OutputResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Accumulated token usage for an execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// Context describing one agent execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentExecutionContext {
    /// The seed question being answered
    pub task: String,

    /// Maximum number of loop steps
    pub max_steps: usize,

    /// Current step number
    pub current_step: usize,

    /// Elapsed execution time
    pub execution_time: Duration,

    /// Accumulated token usage
    pub token_usage: TokenUsage,
}

/// Status of a tool execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolExecutionStatus {
    Executing,
    Success,
    Error,
}

/// Information about a single tool execution, for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExecutionInfo {
    /// Call id issued by the model
    pub call_id: String,

    /// Name of the tool
    pub tool_name: String,

    /// Raw input the model supplied
    pub input: serde_json::Value,

    /// Current status
    pub status: ToolExecutionStatus,

    /// Tool output, once available
    pub output: Option<String>,
}

impl ToolExecutionInfo {
    /// Build display info from a call and, once finished, its result
    pub fn from_call(
        call: &ToolCall,
        status: ToolExecutionStatus,
        result: Option<&ToolResult>,
    ) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            input: call.input.clone(),
            status,
            output: result.map(|r| r.content.clone()),
        }
    }
}

/// Message severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageLevel {
    Debug,
    Info,
    Normal,
    Warning,
    Error,
}

/// Events emitted by the agent during execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgentEvent {
    /// Execution has started
    ExecutionStarted { context: AgentExecutionContext },

    /// A tool execution has started
    ToolExecutionStarted { tool_info: ToolExecutionInfo },

    /// A tool execution has completed
    ToolExecutionCompleted { tool_info: ToolExecutionInfo },

    /// Token usage was updated after a model call
    TokenUsageUpdated { token_usage: TokenUsage },

    /// Execution has completed
    ExecutionCompleted {
        context: AgentExecutionContext,
        success: bool,
        summary: String,
    },

    /// A plain message
    Message {
        level: MessageLevel,
        content: String,
    },
}

/// Trait for handling agent output
#[async_trait]
pub trait AgentOutput: Send + Sync {
    /// Handle an agent event
    async fn emit_event(&self, event: AgentEvent) -> OutputResult;

    /// Emit a normal message
    async fn normal(&self, content: &str) -> OutputResult {
        self.emit_event(AgentEvent::Message {
            level: MessageLevel::Normal,
            content: content.to_string(),
        })
        .await
    }

    /// Emit a debug message
    async fn debug(&self, content: &str) -> OutputResult {
        self.emit_event(AgentEvent::Message {
            level: MessageLevel::Debug,
            content: content.to_string(),
        })
        .await
    }

    /// Emit a warning message
    async fn warning(&self, content: &str) -> OutputResult {
        self.emit_event(AgentEvent::Message {
            level: MessageLevel::Warning,
            content: content.to_string(),
        })
        .await
    }

    /// Emit an error message
    async fn error(&self, content: &str) -> OutputResult {
        self.emit_event(AgentEvent::Message {
            level: MessageLevel::Error,
            content: content.to_string(),
        })
        .await
    }

    /// Flush any buffered output
    async fn flush(&self) -> OutputResult {
        Ok(())
    }
}

/// Output handler that discards everything (for tests and library embedding)
pub struct NullOutput;

#[async_trait]
impl AgentOutput for NullOutput {
    async fn emit_event(&self, _event: AgentEvent) -> OutputResult {
        Ok(())
    }
}
