//! Trajectory entry structures

use crate::llm::{LlmMessage, Usage};
use crate::tools::{ToolCall, ToolResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded event in an execution trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryEntry {
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,

    /// Loop step this entry belongs to (0 for task-level entries)
    pub step: usize,

    /// The recorded event
    #[serde(flatten)]
    pub entry_type: EntryType,
}

/// The kinds of events a trajectory records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryType {
    /// Task execution started
    TaskStart { task: String },

    /// Messages sent to the LLM
    LlmRequest {
        message_count: usize,
        model: String,
        provider: String,
    },

    /// Response received from the LLM
    LlmResponse {
        message: LlmMessage,
        usage: Option<Usage>,
    },

    /// A tool call requested by the model
    ToolCallRequested { call: ToolCall },

    /// The result of a dispatched tool call
    ToolCallCompleted { result: ToolResult },

    /// Task execution finished
    TaskComplete {
        success: bool,
        summary: String,
        duration_ms: u64,
    },

    /// An error occurred
    Error { message: String },
}

impl TrajectoryEntry {
    fn new(step: usize, entry_type: EntryType) -> Self {
        Self {
            timestamp: Utc::now(),
            step,
            entry_type,
        }
    }

    pub fn task_start(task: String) -> Self {
        Self::new(0, EntryType::TaskStart { task })
    }

    pub fn llm_request(message_count: usize, model: String, provider: String, step: usize) -> Self {
        Self::new(
            step,
            EntryType::LlmRequest {
                message_count,
                model,
                provider,
            },
        )
    }

    pub fn llm_response(message: LlmMessage, usage: Option<Usage>, step: usize) -> Self {
        Self::new(step, EntryType::LlmResponse { message, usage })
    }

    pub fn tool_call(call: ToolCall, step: usize) -> Self {
        Self::new(step, EntryType::ToolCallRequested { call })
    }

    pub fn tool_result(result: ToolResult, step: usize) -> Self {
        Self::new(step, EntryType::ToolCallCompleted { result })
    }

    pub fn task_complete(success: bool, summary: String, step: usize, duration_ms: u64) -> Self {
        Self::new(
            step,
            EntryType::TaskComplete {
                success,
                summary,
                duration_ms,
            },
        )
    }

    pub fn error(message: String, step: usize) -> Self {
        Self::new(step, EntryType::Error { message })
    }
}
