//! Tool system and built-in tools

pub mod base;
pub mod builtin;
pub mod dispatch;
pub mod registry;

pub use base::{Tool, ToolCall, ToolResult};
pub use dispatch::ToolDispatcher;
pub use registry::{ToolDescription, ToolFactory, ToolRegistry};
