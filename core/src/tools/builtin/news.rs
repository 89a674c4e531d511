//! Canned news lookup tool

use crate::error::Result;
use crate::impl_tool_factory;
use crate::tools::Tool;
use async_trait::async_trait;

/// Fixed topic table; lookups are case-insensitive on the topic
const NEWS_TOPICS: &[(&str, &str)] = &[
    (
        "ai",
        "Breaking: New GPT-5 model announced with unprecedented reasoning capabilities.",
    ),
    (
        "technology",
        "Tech giants announce new AR glasses coming in 2024.",
    ),
    (
        "politics",
        "World leaders gather for climate summit to discuss new emissions targets.",
    ),
    (
        "sports",
        "National team wins championship in dramatic final match.",
    ),
    (
        "entertainment",
        "Award-winning director announces new film project with A-list cast.",
    ),
];

/// Returns a canned headline for a handful of known topics.
///
/// Like the weather tool, a deliberate stub with no real backing feed.
pub struct NewsTool;

impl NewsTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for NewsTool {
    fn name(&self) -> &str {
        "get_latest_news"
    }

    fn description(&self) -> &str {
        "Fetches the latest news about a specific topic."
    }

    fn argument_name(&self) -> &str {
        "topic"
    }

    fn argument_description(&self) -> &str {
        "The topic to fetch news about"
    }

    async fn invoke(&self, argument: &str) -> Result<String> {
        let needle = argument.to_lowercase();
        let hit = NEWS_TOPICS
            .iter()
            .find(|(topic, _)| *topic == needle)
            .map(|(_, headline)| *headline);

        Ok(match hit {
            Some(headline) => format!("Latest news about {}: {}", argument, headline),
            None => format!("No recent news found about {}.", argument),
        })
    }
}

impl Default for NewsTool {
    fn default() -> Self {
        Self::new()
    }
}

impl_tool_factory!(
    NewsToolFactory,
    NewsTool,
    "get_latest_news",
    "Fetches the latest news about a specific topic."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_topic_returns_its_canned_headline() {
        let result = NewsTool::new().invoke("sports").await.unwrap();
        assert_eq!(
            result,
            "Latest news about sports: National team wins championship in dramatic final match."
        );
    }

    #[tokio::test]
    async fn topic_match_is_case_insensitive() {
        let result = NewsTool::new().invoke("Sports").await.unwrap();
        assert_eq!(
            result,
            "Latest news about Sports: National team wins championship in dramatic final match."
        );
    }

    #[tokio::test]
    async fn unknown_topic_returns_not_found_message() {
        let result = NewsTool::new().invoke("finance").await.unwrap();
        assert_eq!(result, "No recent news found about finance.");
    }
}
