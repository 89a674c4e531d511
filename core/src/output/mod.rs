//! Agent output handling

pub mod events;

pub use events::{
    AgentEvent, AgentExecutionContext, AgentOutput, MessageLevel, NullOutput, OutputResult,
    TokenUsage, ToolExecutionInfo, ToolExecutionStatus,
};
