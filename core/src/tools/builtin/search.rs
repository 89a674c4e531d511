//! Web search tool backed by the DuckDuckGo instant-answer API

use crate::error::Result;
use crate::impl_tool_factory;
use crate::tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_SEARCH_URL: &str = "https://api.duckduckgo.com";

/// Forwards a free-text query to DuckDuckGo and returns its textual answer
pub struct SearchTool {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Answer", default)]
    answer: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text", default)]
    text: String,
}

impl SearchTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }

    /// Point the tool at a different search endpoint
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn pick_result(response: SearchResponse, query: &str) -> String {
        if !response.answer.is_empty() {
            return response.answer;
        }
        if !response.abstract_text.is_empty() {
            return response.abstract_text;
        }
        if let Some(topic) = response
            .related_topics
            .iter()
            .find(|topic| !topic.text.is_empty())
        {
            return topic.text.clone();
        }
        format!("No search results found for '{}'.", query)
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Searches the web for a free-text query and returns the best textual answer."
    }

    fn argument_name(&self) -> &str {
        "query"
    }

    fn argument_description(&self) -> &str {
        "The search query"
    }

    async fn invoke(&self, argument: &str) -> Result<String> {
        let response: SearchResponse = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[
                ("q", argument),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Self::pick_result(response, argument))
    }
}

impl Default for SearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl_tool_factory!(
    SearchToolFactory,
    SearchTool,
    "web_search",
    "Searches the web for a free-text query and returns the best textual answer."
);
