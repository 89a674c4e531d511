//! Anthropic Claude client implementation

use crate::config::ResolvedLlmConfig;
use crate::error::{LlmError, Result};
use crate::llm::{
    ChatOptions, ContentBlock, FinishReason, LlmClient, LlmMessage, LlmResponse, MessageContent,
    MessageRole, ToolDefinition, Usage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Anthropic Claude client
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    /// Create a new Anthropic client from resolved LLM config
    pub fn new(config: &ResolvedLlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(crate::error::Error::Llm(LlmError::Authentication {
                message: "No API key found for Anthropic".to_string(),
            }));
        }

        Ok(Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    fn build_request(
        &self,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: Option<ChatOptions>,
    ) -> AnthropicRequest {
        let options = options.unwrap_or_default();

        // Separate system messages from conversation messages
        let mut system_message = None;
        let mut conversation_messages = Vec::new();

        for message in messages {
            match message.role {
                MessageRole::System => {
                    if let Some(text) = message.get_text() {
                        system_message = Some(text);
                    }
                }
                _ => conversation_messages.push(Self::convert_message(message)),
            }
        }

        AnthropicRequest {
            model: self.model.clone(),
            max_tokens: options.max_tokens.unwrap_or(4096),
            temperature: options.temperature.unwrap_or(0.0),
            system: system_message,
            messages: conversation_messages,
            tools: tools.map(|defs| {
                defs.into_iter()
                    .map(|tool| AnthropicTool {
                        name: tool.function.name,
                        description: tool.function.description,
                        input_schema: tool.function.parameters,
                    })
                    .collect()
            }),
            stop_sequences: options.stop,
        }
    }

    /// Convert an internal message into the Anthropic wire format.
    ///
    /// Tool-role messages travel as user-role messages carrying tool_result
    /// blocks; everything else maps block-for-block.
    fn convert_message(message: LlmMessage) -> AnthropicMessage {
        let role = match message.role {
            MessageRole::Assistant => "assistant",
            _ => "user",
        };

        let content = match message.content {
            MessageContent::Text(text) => vec![AnthropicContentBlock::Text { text }],
            MessageContent::Blocks(blocks) => blocks
                .into_iter()
                .map(|block| match block {
                    ContentBlock::Text { text } => AnthropicContentBlock::Text { text },
                    ContentBlock::ToolUse { id, name, input } => {
                        AnthropicContentBlock::ToolUse { id, name, input }
                    }
                    ContentBlock::ToolResult {
                        tool_use_id,
                        is_error,
                        content,
                    } => AnthropicContentBlock::ToolResult {
                        tool_use_id,
                        is_error,
                        content,
                    },
                })
                .collect(),
        };

        AnthropicMessage {
            role: role.to_string(),
            content,
        }
    }

    fn convert_response(&self, response: AnthropicResponse) -> LlmResponse {
        let blocks: Vec<ContentBlock> = response
            .content
            .into_iter()
            .map(|block| match block {
                AnthropicContentBlock::Text { text } => ContentBlock::Text { text },
                AnthropicContentBlock::ToolUse { id, name, input } => {
                    ContentBlock::ToolUse { id, name, input }
                }
                AnthropicContentBlock::ToolResult {
                    tool_use_id,
                    is_error,
                    content,
                } => ContentBlock::ToolResult {
                    tool_use_id,
                    is_error,
                    content,
                },
            })
            .collect();

        let has_tool_use = blocks
            .iter()
            .any(|block| matches!(block, ContentBlock::ToolUse { .. }));

        let content = if !has_tool_use && blocks.len() == 1 {
            match blocks.into_iter().next() {
                Some(ContentBlock::Text { text }) => MessageContent::Text(text),
                Some(other) => MessageContent::Blocks(vec![other]),
                None => MessageContent::Text(String::new()),
            }
        } else {
            MessageContent::Blocks(blocks)
        };

        let message = LlmMessage {
            role: MessageRole::Assistant,
            content,
        };

        let usage = response.usage.map(|u| Usage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        });

        let finish_reason = match response.stop_reason.as_str() {
            "end_turn" => Some(FinishReason::Stop),
            "max_tokens" => Some(FinishReason::Length),
            "tool_use" => Some(FinishReason::ToolCalls),
            other => Some(FinishReason::Other(other.to_string())),
        };

        LlmResponse {
            message,
            usage,
            model: response.model,
            finish_reason,
        }
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn chat_completion(
        &self,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: Option<ChatOptions>,
    ) -> Result<LlmResponse> {
        let request = self.build_request(messages, tools, options);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err((LlmError::ApiError {
                status,
                message: error_text,
            })
            .into());
        }

        let anthropic_response: AnthropicResponse =
            response.json().await.map_err(|e| LlmError::Network {
                message: format!("Failed to parse response: {}", e),
            })?;

        Ok(self.convert_response(anthropic_response))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<AnthropicTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
        content: String,
    },
}

#[derive(Debug, Serialize)]
struct AnthropicTool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<AnthropicContentBlock>,
    stop_reason: String,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Protocol;

    fn client() -> AnthropicClient {
        AnthropicClient::new(&ResolvedLlmConfig::new(
            Protocol::Anthropic,
            "https://api.anthropic.com".to_string(),
            "test-key".to_string(),
            "claude-sonnet-4-20250514".to_string(),
        ))
        .unwrap()
    }

    #[test]
    fn system_message_is_lifted_out_of_the_conversation() {
        let request = client().build_request(
            vec![
                LlmMessage::system("You are a concierge."),
                LlmMessage::user("hello"),
            ],
            None,
            None,
        );

        assert_eq!(request.system.as_deref(), Some("You are a concierge."));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
    }

    #[test]
    fn tool_role_messages_travel_as_user_tool_results() {
        let request = client().build_request(
            vec![
                LlmMessage::user("hello"),
                LlmMessage::tool_result("call_1", false, "sunny"),
            ],
            None,
            None,
        );

        assert_eq!(request.messages[1].role, "user");
        assert!(matches!(
            request.messages[1].content[0],
            AnthropicContentBlock::ToolResult { .. }
        ));
    }

    #[test]
    fn tool_use_stop_reason_maps_to_tool_calls() {
        let response = client().convert_response(AnthropicResponse {
            model: "claude-sonnet-4-20250514".to_string(),
            content: vec![AnthropicContentBlock::ToolUse {
                id: "toolu_1".to_string(),
                name: "get_weather_info".to_string(),
                input: serde_json::json!({"location": "Hanoi"}),
            }],
            stop_reason: "tool_use".to_string(),
            usage: None,
        });

        assert_eq!(response.finish_reason, Some(FinishReason::ToolCalls));
        assert!(response.message.has_tool_use());
    }
}
