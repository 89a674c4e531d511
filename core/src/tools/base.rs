//! Base tool traits and structures

use crate::error::{Result, ToolError};
use crate::llm::{FunctionDefinition, LlmMessage, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Trait for all tools
///
/// Every tool takes exactly one string argument and returns one string.
/// The argument is declared by name so the model sees a one-property object
/// schema; anything richer belongs in a different system.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the name of the tool
    fn name(&self) -> &str;

    /// Get the description of the tool
    fn description(&self) -> &str;

    /// Name of the tool's single string argument
    fn argument_name(&self) -> &str {
        "input"
    }

    /// Description of the tool's single string argument
    fn argument_description(&self) -> &str {
        "Input for the tool"
    }

    /// Execute the tool with its single string argument
    async fn invoke(&self, argument: &str) -> Result<String>;

    /// JSON schema for the tool's parameters, derived from the declared argument
    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                self.argument_name(): {
                    "type": "string",
                    "description": self.argument_description(),
                }
            },
            "required": [self.argument_name()],
        })
    }

    /// The definition presented to the language model
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: self.name().to_string(),
                description: self.description().to_string(),
                parameters: self.parameters_schema(),
            },
        }
    }
}

/// A call to a tool, as requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,

    /// Name of the tool to call
    pub name: String,

    /// Raw input for the tool as sent by the model
    pub input: serde_json::Value,
}

impl ToolCall {
    /// Create a new tool call with a generated id
    pub fn new<S: Into<String>>(name: S, input: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            input,
        }
    }

    /// Extract the single string argument this call carries for `tool`.
    ///
    /// Accepts either an object keyed by the tool's declared argument name or
    /// a bare string (some providers flatten single-argument calls).
    pub fn argument_for(&self, tool: &dyn Tool) -> Result<String> {
        match &self.input {
            serde_json::Value::String(argument) => Ok(argument.clone()),
            serde_json::Value::Object(map) => map
                .get(tool.argument_name())
                .and_then(|value| value.as_str())
                .map(|argument| argument.to_string())
                .ok_or_else(|| {
                    ToolError::InvalidArgument {
                        message: format!(
                            "missing string argument '{}' for tool '{}'",
                            tool.argument_name(),
                            self.name
                        ),
                    }
                    .into()
                }),
            other => Err(ToolError::InvalidArgument {
                message: format!(
                    "expected a string argument for tool '{}', got: {}",
                    self.name, other
                ),
            }
            .into()),
        }
    }
}

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this is a result for
    pub tool_call_id: String,

    /// Whether the execution was successful
    pub success: bool,

    /// Result content
    pub content: String,

    /// Execution duration in milliseconds
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success<S: Into<String>>(tool_call_id: S, content: S) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            success: true,
            content: content.into(),
            duration_ms: None,
        }
    }

    /// Create an error result
    pub fn error<S: Into<String>>(tool_call_id: S, error: S) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            success: false,
            content: format!("Error: {}", error.into()),
            duration_ms: None,
        }
    }

    /// Set execution duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Render this result as a tool-role conversation message
    pub fn into_message(self) -> LlmMessage {
        LlmMessage::tool_result(self.tool_call_id, !self.success, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its argument"
        }

        fn argument_name(&self) -> &str {
            "text"
        }

        async fn invoke(&self, argument: &str) -> Result<String> {
            Ok(argument.to_string())
        }
    }

    #[test]
    fn schema_declares_the_single_argument() {
        let schema = EchoTool.parameters_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["text"]["type"], "string");
        assert_eq!(schema["required"][0], "text");
    }

    #[test]
    fn argument_is_extracted_from_object_input() {
        let call = ToolCall::new("echo", json!({"text": "hello"}));
        assert_eq!(call.argument_for(&EchoTool).unwrap(), "hello");
    }

    #[test]
    fn bare_string_input_is_accepted() {
        let call = ToolCall::new("echo", json!("hello"));
        assert_eq!(call.argument_for(&EchoTool).unwrap(), "hello");
    }

    #[test]
    fn missing_argument_is_an_error() {
        let call = ToolCall::new("echo", json!({"wrong_key": "hello"}));
        assert!(call.argument_for(&EchoTool).is_err());
    }

    #[test]
    fn error_result_renders_as_error_flagged_tool_message() {
        let result = ToolResult::error("call_1", "boom");
        assert_eq!(result.content, "Error: boom");

        let message = result.into_message();
        assert_eq!(message.role, crate::llm::MessageRole::Tool);
        match &message.content {
            crate::llm::MessageContent::Blocks(blocks) => match &blocks[0] {
                crate::llm::ContentBlock::ToolResult {
                    tool_use_id,
                    is_error,
                    content,
                } => {
                    assert_eq!(tool_use_id, "call_1");
                    assert_eq!(*is_error, Some(true));
                    assert_eq!(content, "Error: boom");
                }
                other => panic!("unexpected block: {:?}", other),
            },
            other => panic!("unexpected content: {:?}", other),
        }
    }
}
