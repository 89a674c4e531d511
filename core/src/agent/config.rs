//! Agent configuration structures

use serde::{Deserialize, Serialize};

/// Configuration for an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of model/tool cycles before the loop is declared stuck
    pub max_steps: usize,

    /// Per-step timeout in seconds for model and tool calls
    #[serde(default)]
    pub step_timeout_secs: Option<u64>,

    /// List of tools available to this agent
    pub tools: Vec<String>,

    /// Custom system prompt for the agent (optional)
    /// If not provided, the default system prompt will be used
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 10,
            step_timeout_secs: Some(60),
            tools: vec![
                "web_search".to_string(),
                "get_weather_info".to_string(),
                "get_hub_stats".to_string(),
                "get_latest_news".to_string(),
            ],
            system_prompt: None,
        }
    }
}

/// Builder for creating agents with resolved LLM configuration
pub struct AgentBuilder {
    llm_config: crate::config::ResolvedLlmConfig,
    agent_config: AgentConfig,
}

impl AgentBuilder {
    /// Create a new agent builder with LLM configuration
    pub fn new(llm_config: crate::config::ResolvedLlmConfig) -> Self {
        Self {
            llm_config,
            agent_config: AgentConfig::default(),
        }
    }

    /// Set agent configuration
    pub fn with_agent_config(mut self, agent_config: AgentConfig) -> Self {
        self.agent_config = agent_config;
        self
    }

    /// Set maximum steps
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.agent_config.max_steps = max_steps;
        self
    }

    /// Set the per-step timeout in seconds
    pub fn with_step_timeout_secs(mut self, step_timeout_secs: Option<u64>) -> Self {
        self.agent_config.step_timeout_secs = step_timeout_secs;
        self
    }

    /// Set tools
    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.agent_config.tools = tools;
        self
    }

    /// Set system prompt
    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.agent_config.system_prompt = system_prompt;
        self
    }

    /// Build the agent with the given output handler
    pub async fn build_with_output(
        self,
        output: Box<dyn crate::output::AgentOutput>,
    ) -> crate::error::Result<super::AgentCore> {
        super::AgentCore::new_with_llm_config(self.agent_config, self.llm_config, output).await
    }

    /// Build the agent with a custom tool registry and output handler
    pub async fn build_with_output_and_registry(
        self,
        output: Box<dyn crate::output::AgentOutput>,
        registry: crate::tools::ToolRegistry,
    ) -> crate::error::Result<super::AgentCore> {
        super::AgentCore::new_with_registry(self.agent_config, self.llm_config, output, registry)
            .await
    }

    /// Build the agent with null output (for testing and embedding)
    pub async fn build(self) -> crate::error::Result<super::AgentCore> {
        use crate::output::NullOutput;
        self.build_with_output(Box::new(NullOutput)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_carries_the_builtin_tools() {
        let config = AgentConfig::default();
        assert_eq!(
            config.tools,
            vec![
                "web_search",
                "get_weather_info",
                "get_hub_stats",
                "get_latest_news"
            ]
        );
        assert!(config.max_steps > 0);
        assert_eq!(config.system_prompt, None);
    }

    #[test]
    fn config_round_trips_through_serde() {
        let mut config = AgentConfig::default();
        config.system_prompt = Some("Custom prompt".to_string());
        config.step_timeout_secs = None;

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: AgentConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.system_prompt, Some("Custom prompt".to_string()));
        assert_eq!(deserialized.step_timeout_secs, None);
        assert_eq!(deserialized.max_steps, config.max_steps);
    }
}
