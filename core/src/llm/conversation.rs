//! Append-only conversation state

use std::collections::HashSet;

use crate::error::{AgentError, Result};

use super::message::{ContentBlock, LlmMessage, MessageRole};

/// The ordered message history shared between the model and the tool loop.
///
/// Messages are append-only; insertion order is the only ordering guarantee.
/// A tool-role message may only reference a call id previously issued by an
/// assistant message in this conversation — violations are structural errors,
/// not something the model gets to see.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<LlmMessage>,
    issued_call_ids: HashSet<String>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation seeded with a single user message
    pub fn seeded<S: Into<String>>(seed: S) -> Self {
        let mut conversation = Self::new();
        conversation
            .push(LlmMessage::user(seed))
            .expect("seeding a conversation cannot violate the call-id invariant");
        conversation
    }

    /// Append a message, enforcing the tool call-id invariant
    pub fn push(&mut self, message: LlmMessage) -> Result<()> {
        if message.role == MessageRole::Tool {
            for block in self.tool_result_blocks(&message) {
                if let ContentBlock::ToolResult { tool_use_id, .. } = block {
                    if !self.issued_call_ids.contains(tool_use_id) {
                        return Err(AgentError::OrphanToolResult {
                            tool_use_id: tool_use_id.clone(),
                        }
                        .into());
                    }
                }
            }
        }

        if message.role == MessageRole::Assistant {
            for block in message.get_tool_uses() {
                if let ContentBlock::ToolUse { id, .. } = block {
                    self.issued_call_ids.insert(id.clone());
                }
            }
        }

        self.messages.push(message);
        Ok(())
    }

    /// All messages in insertion order
    pub fn messages(&self) -> &[LlmMessage] {
        &self.messages
    }

    /// The most recently appended message
    pub fn last(&self) -> Option<&LlmMessage> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the conversation holds no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn tool_result_blocks<'a>(&self, message: &'a LlmMessage) -> Vec<&'a ContentBlock> {
        match &message.content {
            super::message::MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter(|block| matches!(block, ContentBlock::ToolResult { .. }))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message::MessageContent;
    use serde_json::json;

    fn assistant_with_call(id: &str) -> LlmMessage {
        LlmMessage {
            role: MessageRole::Assistant,
            content: MessageContent::Blocks(vec![ContentBlock::ToolUse {
                id: id.to_string(),
                name: "get_latest_news".to_string(),
                input: json!({"topic": "sports"}),
            }]),
        }
    }

    #[test]
    fn push_preserves_insertion_order() {
        let mut conversation = Conversation::seeded("hello");
        conversation.push(LlmMessage::assistant("hi")).unwrap();

        let roles: Vec<MessageRole> = conversation
            .messages()
            .iter()
            .map(|message| message.role)
            .collect();
        assert_eq!(roles, vec![MessageRole::User, MessageRole::Assistant]);
    }

    #[test]
    fn tool_result_for_issued_call_id_is_accepted() {
        let mut conversation = Conversation::seeded("hello");
        conversation.push(assistant_with_call("call_1")).unwrap();

        let result = conversation.push(LlmMessage::tool_result("call_1", false, "ok"));
        assert!(result.is_ok());
    }

    #[test]
    fn orphan_tool_result_is_rejected() {
        let mut conversation = Conversation::seeded("hello");
        conversation.push(assistant_with_call("call_1")).unwrap();

        let result = conversation.push(LlmMessage::tool_result("call_999", false, "ok"));
        assert!(matches!(
            result,
            Err(crate::error::Error::Agent(
                AgentError::OrphanToolResult { .. }
            ))
        ));
        // The rejected message must not have been appended
        assert_eq!(conversation.len(), 2);
    }
}
