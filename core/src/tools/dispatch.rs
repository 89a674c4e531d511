//! Tool dispatcher
//!
//! The dispatcher is the boundary past which tool failures do not travel:
//! unknown names, malformed arguments and tool errors all come back as
//! error-flagged results rendered into the conversation, never as `Err`.

use std::collections::HashMap;

use crate::error::ToolError;
use crate::llm::ToolDefinition;
use crate::tools::{Tool, ToolCall, ToolResult};

/// Executes tool calls against a fixed set of registered tools
pub struct ToolDispatcher {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolDispatcher {
    /// Create a new empty dispatcher
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool; names must be unique
    pub fn register_tool(&mut self, tool: Box<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolError::DuplicateName { name });
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&i| self.tools[i].as_ref())
    }

    /// List all registered tool names in registration order
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Get tool definitions for LLM function calling, in registration order
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Describe every registered tool, in registration order
    pub fn describe(&self) -> Vec<crate::tools::ToolDescription> {
        self.tools
            .iter()
            .map(|tool| crate::tools::ToolDescription {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
            })
            .collect()
    }

    /// Execute a tool call.
    ///
    /// Always returns a result; failures are rendered into the result's
    /// content so the model can see them and react.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        let start_time = std::time::Instant::now();

        let result = match self.get_tool(&call.name) {
            None => ToolResult::error(
                call.id.clone(),
                ToolError::NotFound {
                    name: call.name.clone(),
                }
                .to_string(),
            ),
            Some(tool) => match call.argument_for(tool) {
                Err(e) => ToolResult::error(call.id.clone(), e.to_string()),
                Ok(argument) => match tool.invoke(&argument).await {
                    Ok(content) => ToolResult::success(call.id.clone(), content),
                    Err(e) => ToolResult::error(call.id.clone(), e.to_string()),
                },
            },
        };

        result.with_duration(start_time.elapsed().as_millis() as u64)
    }
}

impl Default for ToolDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;
    use serde_json::json;

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercases its argument"
        }

        fn argument_name(&self) -> &str {
            "text"
        }

        async fn invoke(&self, argument: &str) -> Result<String> {
            Ok(argument.to_uppercase())
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        async fn invoke(&self, _argument: &str) -> Result<String> {
            Err(ToolError::ExecutionFailed {
                name: "failing".to_string(),
                message: "deliberate failure".to_string(),
            }
            .into())
        }
    }

    fn dispatcher() -> ToolDispatcher {
        let mut dispatcher = ToolDispatcher::new();
        dispatcher.register_tool(Box::new(UpperTool)).unwrap();
        dispatcher.register_tool(Box::new(FailingTool)).unwrap();
        dispatcher
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut dispatcher = dispatcher();
        let result = dispatcher.register_tool(Box::new(UpperTool));
        assert!(matches!(result, Err(ToolError::DuplicateName { .. })));
    }

    #[tokio::test]
    async fn dispatch_executes_the_named_tool() {
        let call = ToolCall::new("upper", json!({"text": "hanoi"}));
        let result = dispatcher().dispatch(&call).await;

        assert!(result.success);
        assert_eq!(result.content, "HANOI");
        assert_eq!(result.tool_call_id, call.id);
    }

    #[tokio::test]
    async fn unknown_tool_yields_error_result_not_panic() {
        let call = ToolCall::new("no_such_tool", json!({"text": "x"}));
        let result = dispatcher().dispatch(&call).await;

        assert!(!result.success);
        assert!(!result.content.is_empty());
        assert!(result.content.contains("no_such_tool"));
    }

    #[tokio::test]
    async fn tool_failure_is_absorbed_into_content() {
        let call = ToolCall::new("failing", json!({"input": "x"}));
        let result = dispatcher().dispatch(&call).await;

        assert!(!result.success);
        assert!(result.content.starts_with("Error: "));
        assert!(result.content.contains("deliberate failure"));
    }

    #[tokio::test]
    async fn malformed_argument_is_absorbed_into_content() {
        let call = ToolCall::new("upper", json!(42));
        let result = dispatcher().dispatch(&call).await;

        assert!(!result.success);
        assert!(result.content.starts_with("Error: "));
    }
}
