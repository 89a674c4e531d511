//! System prompt construction

use crate::tools::ToolDescription;

/// Default system prompt for the concierge agent
pub const ALFRED_SYSTEM_PROMPT: &str = "\
You are Alfred, a courteous and precise concierge assistant.

Answer the user's question directly when you already know the answer. \
When a question needs fresh or external information, call one of the \
available tools with a single, well-chosen argument, read its result, \
and only then answer. Tool results appear in the conversation; quote \
the relevant parts rather than inventing details. When a tool reports \
an error, say so briefly or try a different tool — never fabricate the \
data it failed to fetch.

When you are done, reply with the final answer as plain text and no \
further tool calls.";

/// Build the system prompt, appending the available capability list
pub fn build_system_prompt(base: Option<&str>, tools: &[ToolDescription]) -> String {
    let base = base.unwrap_or(ALFRED_SYSTEM_PROMPT);

    if tools.is_empty() {
        return base.to_string();
    }

    let mut prompt = String::from(base);
    prompt.push_str("\n\nAvailable tools:\n");
    for tool in tools {
        prompt.push_str(&format!("- {}: {}\n", tool.name, tool.description));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_list_is_appended_in_order() {
        let tools = vec![
            ToolDescription {
                name: "web_search".to_string(),
                description: "Searches the web.".to_string(),
            },
            ToolDescription {
                name: "get_latest_news".to_string(),
                description: "Fetches news.".to_string(),
            },
        ];

        let prompt = build_system_prompt(None, &tools);
        let search_pos = prompt.find("web_search").unwrap();
        let news_pos = prompt.find("get_latest_news").unwrap();
        assert!(search_pos < news_pos);
        assert!(prompt.starts_with("You are Alfred"));
    }

    #[test]
    fn custom_base_prompt_replaces_the_default() {
        let prompt = build_system_prompt(Some("You are a test harness."), &[]);
        assert_eq!(prompt, "You are a test harness.");
    }
}
