//! Routing decision between tool dispatch and termination

use crate::llm::{ContentBlock, LlmMessage};
use crate::tools::ToolCall;

/// What the loop does next, decided from the latest assistant message
#[derive(Debug, Clone)]
pub enum Decision {
    /// Dispatch these tool calls, then hand control back to the model
    CallTools(Vec<ToolCall>),

    /// Terminate the loop; the text is the final answer
    FinalAnswer(String),
}

/// Decides, after each model turn, whether to invoke tools or terminate.
pub struct Router;

impl Router {
    /// Inspect the latest message and decide the next action.
    ///
    /// A message is a tool-call request if and only if it carries at least
    /// one tool-use block. No other signal is consulted — content heuristics
    /// would make ordinary prose about tools ambiguous.
    pub fn decide(latest: &LlmMessage) -> Decision {
        let calls: Vec<ToolCall> = latest
            .get_tool_uses()
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => Some(ToolCall {
                    id: id.clone(),
                    name: name.clone(),
                    input: input.clone(),
                }),
                _ => None,
            })
            .collect();

        if calls.is_empty() {
            Decision::FinalAnswer(latest.get_text().unwrap_or_default())
        } else {
            Decision::CallTools(calls)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MessageContent, MessageRole};
    use serde_json::json;

    fn assistant_with_tool_use() -> LlmMessage {
        LlmMessage {
            role: MessageRole::Assistant,
            content: MessageContent::Blocks(vec![
                ContentBlock::Text {
                    text: "Checking the weather.".to_string(),
                },
                ContentBlock::ToolUse {
                    id: "call_1".to_string(),
                    name: "get_weather_info".to_string(),
                    input: json!({"location": "Hanoi"}),
                },
            ]),
        }
    }

    #[test]
    fn tool_use_presence_routes_to_dispatch() {
        match Router::decide(&assistant_with_tool_use()) {
            Decision::CallTools(calls) => {
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].name, "get_weather_info");
                assert_eq!(calls[0].id, "call_1");
            }
            Decision::FinalAnswer(_) => panic!("expected tool dispatch"),
        }
    }

    #[test]
    fn tool_use_absence_routes_to_final_answer() {
        let message = LlmMessage::assistant("It is sunny in Hanoi today.");
        match Router::decide(&message) {
            Decision::FinalAnswer(text) => assert_eq!(text, "It is sunny in Hanoi today."),
            Decision::CallTools(_) => panic!("expected final answer"),
        }
    }

    #[test]
    fn prose_mentioning_tools_is_still_a_final_answer() {
        // Only the structured field counts, never the content
        let message = LlmMessage::assistant("You could call get_weather_info for that.");
        assert!(matches!(
            Router::decide(&message),
            Decision::FinalAnswer(_)
        ));
    }

    #[test]
    fn decision_is_stable_for_the_same_message() {
        let message = assistant_with_tool_use();
        for _ in 0..3 {
            assert!(matches!(Router::decide(&message), Decision::CallTools(_)));
        }
    }

    #[test]
    fn multiple_tool_uses_are_kept_in_message_order() {
        let message = LlmMessage {
            role: MessageRole::Assistant,
            content: MessageContent::Blocks(vec![
                ContentBlock::ToolUse {
                    id: "call_1".to_string(),
                    name: "get_weather_info".to_string(),
                    input: json!({"location": "Hanoi"}),
                },
                ContentBlock::ToolUse {
                    id: "call_2".to_string(),
                    name: "get_latest_news".to_string(),
                    input: json!({"topic": "sports"}),
                },
            ]),
        };

        match Router::decide(&message) {
            Decision::CallTools(calls) => {
                let ids: Vec<&str> = calls.iter().map(|c| c.id.as_str()).collect();
                assert_eq!(ids, vec!["call_1", "call_2"]);
            }
            Decision::FinalAnswer(_) => panic!("expected tool dispatch"),
        }
    }
}
