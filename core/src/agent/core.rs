//! AgentCore implementation

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::config::AgentConfig;
use super::prompt::build_system_prompt;
use super::router::{Decision, Router};
use super::{Agent, AgentExecution, AgentResult};
use crate::error::{AgentError, LlmError, Result};
use crate::llm::{
    ChatOptions, Conversation, LlmClient, LlmMessage, LlmResponse, ToolChoice,
};
use crate::output::{
    AgentEvent, AgentExecutionContext, AgentOutput, TokenUsage, ToolExecutionInfo,
    ToolExecutionStatus,
};
use crate::tools::{ToolCall, ToolDispatcher, ToolRegistry};
use crate::trajectory::{TrajectoryEntry, TrajectoryRecorder};

/// The loop controller: alternates model calls and tool dispatch until the
/// model produces a final answer or the loop budget runs out.
pub struct AgentCore {
    config: AgentConfig,
    llm_client: Arc<dyn LlmClient>,
    dispatcher: ToolDispatcher,
    chat_options: ChatOptions,
    trajectory_recorder: Option<TrajectoryRecorder>,
    conversation: Conversation,
    output: Box<dyn AgentOutput>,
    token_usage: TokenUsage,
}

impl AgentCore {
    /// Create a new AgentCore with resolved LLM configuration and the
    /// default tool registry
    pub async fn new_with_llm_config(
        agent_config: AgentConfig,
        llm_config: crate::config::ResolvedLlmConfig,
        output: Box<dyn AgentOutput>,
    ) -> Result<Self> {
        Self::new_with_registry(agent_config, llm_config, output, ToolRegistry::default()).await
    }

    /// Create a new AgentCore with a custom tool registry
    pub async fn new_with_registry(
        agent_config: AgentConfig,
        llm_config: crate::config::ResolvedLlmConfig,
        output: Box<dyn AgentOutput>,
        registry: ToolRegistry,
    ) -> Result<Self> {
        let llm_client = Self::create_llm_client(&llm_config)?;
        let dispatcher = registry.create_dispatcher(&agent_config.tools)?;

        let chat_options = ChatOptions {
            max_tokens: llm_config.params.max_tokens.or(Some(4096)),
            temperature: llm_config.params.temperature.or(Some(0.0)),
            top_p: llm_config.params.top_p,
            stop: llm_config.params.stop_sequences.clone(),
            tool_choice: Some(ToolChoice::Auto),
        };

        Ok(Self {
            config: agent_config,
            llm_client,
            dispatcher,
            chat_options,
            trajectory_recorder: None,
            conversation: Conversation::new(),
            output,
            token_usage: TokenUsage::default(),
        })
    }

    /// Create the LLM client matching the configured protocol
    fn create_llm_client(
        llm_config: &crate::config::ResolvedLlmConfig,
    ) -> Result<Arc<dyn LlmClient>> {
        match &llm_config.protocol {
            crate::config::Protocol::OpenAICompat | crate::config::Protocol::AzureOpenAI => {
                Ok(Arc::new(crate::llm::OpenAiClient::new(llm_config)?))
            }
            crate::config::Protocol::Anthropic => {
                Ok(Arc::new(crate::llm::AnthropicClient::new(llm_config)?))
            }
            crate::config::Protocol::Custom(name) => Err(LlmError::UnsupportedProtocol {
                protocol: name.clone(),
            }
            .into()),
        }
    }

    /// Get agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    async fn record(&self, entry: TrajectoryEntry) -> Result<()> {
        if let Some(recorder) = &self.trajectory_recorder {
            recorder.record(entry).await?;
        }
        Ok(())
    }

    fn execution_context(&self, task: &str, step: usize, elapsed: Duration) -> AgentExecutionContext {
        AgentExecutionContext {
            task: task.to_string(),
            max_steps: self.config.max_steps,
            current_step: step,
            execution_time: elapsed,
            token_usage: self.token_usage.clone(),
        }
    }

    async fn call_model(&self, step: usize) -> Result<LlmResponse> {
        let messages = self.conversation.messages().to_vec();
        let tool_definitions = self.dispatcher.tool_definitions();

        self.record(TrajectoryEntry::llm_request(
            messages.len(),
            self.llm_client.model_name().to_string(),
            self.llm_client.provider_name().to_string(),
            step,
        ))
        .await?;

        let _ = self.output.debug("Thinking...").await;

        let client = Arc::clone(&self.llm_client);
        let request = client.chat_completion(
            messages,
            Some(tool_definitions),
            Some(self.chat_options.clone()),
        );

        let response = match self.config.step_timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), request).await??,
            None => request.await?,
        };

        Ok(response)
    }

    async fn dispatch_call(&self, call: &ToolCall) -> Result<crate::tools::ToolResult> {
        let dispatch = self.dispatcher.dispatch(call);

        let result = match self.config.step_timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), dispatch).await?,
            None => dispatch.await,
        };

        Ok(result)
    }

    /// Execute a single model/tool cycle.
    ///
    /// Returns the final answer once the router terminates the loop.
    async fn execute_step(&mut self, step: usize) -> Result<Option<String>> {
        let response = match self.call_model(step).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("LLM request failed for step {}: {}", step, e);
                let _ = self
                    .output
                    .error(&format!("LLM request failed: {}", e))
                    .await;
                return Err(e);
            }
        };

        if let Some(usage) = &response.usage {
            self.token_usage.input_tokens += usage.prompt_tokens;
            self.token_usage.output_tokens += usage.completion_tokens;
            self.token_usage.total_tokens += usage.total_tokens;

            let _ = self
                .output
                .emit_event(AgentEvent::TokenUsageUpdated {
                    token_usage: self.token_usage.clone(),
                })
                .await;
        }

        self.record(TrajectoryEntry::llm_response(
            response.message.clone(),
            response.usage.clone(),
            step,
        ))
        .await?;

        self.conversation.push(response.message.clone())?;

        match Router::decide(&response.message) {
            Decision::FinalAnswer(text) => {
                if !text.trim().is_empty() {
                    let _ = self.output.normal(&text).await;
                }
                Ok(Some(text))
            }
            Decision::CallTools(calls) => {
                for call in calls {
                    let _ = self
                        .output
                        .emit_event(AgentEvent::ToolExecutionStarted {
                            tool_info: ToolExecutionInfo::from_call(
                                &call,
                                ToolExecutionStatus::Executing,
                                None,
                            ),
                        })
                        .await;

                    self.record(TrajectoryEntry::tool_call(call.clone(), step))
                        .await?;

                    let result = self.dispatch_call(&call).await?;

                    let _ = self
                        .output
                        .emit_event(AgentEvent::ToolExecutionCompleted {
                            tool_info: ToolExecutionInfo::from_call(
                                &call,
                                if result.success {
                                    ToolExecutionStatus::Success
                                } else {
                                    ToolExecutionStatus::Error
                                },
                                Some(&result),
                            ),
                        })
                        .await;

                    self.record(TrajectoryEntry::tool_result(result.clone(), step))
                        .await?;

                    self.conversation.push(result.into_message())?;
                }

                // Tool results are appended; the next step lets the model
                // read them and continue.
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl Agent for AgentCore {
    async fn run(&mut self, seed: &str) -> AgentResult<AgentExecution> {
        self.run_conversation(seed).await
    }

    fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn agent_type(&self) -> &str {
        "alfred"
    }

    fn set_trajectory_recorder(&mut self, recorder: TrajectoryRecorder) {
        self.trajectory_recorder = Some(recorder);
    }

    fn trajectory_recorder(&self) -> Option<&TrajectoryRecorder> {
        self.trajectory_recorder.as_ref()
    }
}

impl AgentCore {
    /// Run one conversation from a seed question to a final answer.
    ///
    /// The loop is bounded: a model that keeps requesting tools past
    /// `max_steps` fails the conversation with `LoopBudgetExceeded` rather
    /// than being trusted to converge.
    pub async fn run_conversation(&mut self, seed: &str) -> AgentResult<AgentExecution> {
        let start_time = Instant::now();

        self.conversation = Conversation::new();
        self.token_usage = TokenUsage::default();

        let system_prompt =
            build_system_prompt(self.config.system_prompt.as_deref(), &self.dispatcher.describe());
        self.conversation.push(LlmMessage::system(system_prompt))?;
        self.conversation.push(LlmMessage::user(seed))?;

        self.record(TrajectoryEntry::task_start(seed.to_string())).await?;
        let _ = self
            .output
            .emit_event(AgentEvent::ExecutionStarted {
                context: self.execution_context(seed, 0, start_time.elapsed()),
            })
            .await;

        let mut final_answer = None;
        let mut step = 0;

        while step < self.config.max_steps && final_answer.is_none() {
            step += 1;

            match self.execute_step(step).await {
                Ok(answer) => final_answer = answer,
                Err(e) => {
                    self.record(TrajectoryEntry::error(e.to_string(), step)).await?;
                    let _ = self
                        .output
                        .emit_event(AgentEvent::ExecutionCompleted {
                            context: self.execution_context(seed, step, start_time.elapsed()),
                            success: false,
                            summary: format!("Failed in step {}: {}", step, e),
                        })
                        .await;
                    return Err(e);
                }
            }
        }

        let duration = start_time.elapsed();
        let duration_ms = duration.as_millis() as u64;

        match final_answer {
            Some(answer) => {
                self.record(TrajectoryEntry::task_complete(
                    true,
                    answer.clone(),
                    step,
                    duration_ms,
                ))
                .await?;

                let _ = self
                    .output
                    .emit_event(AgentEvent::ExecutionCompleted {
                        context: self.execution_context(seed, step, duration),
                        success: true,
                        summary: format!("Answered after {} steps", step),
                    })
                    .await;

                Ok(AgentExecution::new(
                    answer,
                    step,
                    duration_ms,
                    self.token_usage.clone(),
                    self.conversation.messages().to_vec(),
                ))
            }
            None => {
                let error = AgentError::LoopBudgetExceeded {
                    max_steps: self.config.max_steps,
                };

                self.record(TrajectoryEntry::error(error.to_string(), step)).await?;
                let _ = self
                    .output
                    .emit_event(AgentEvent::ExecutionCompleted {
                        context: self.execution_context(seed, step, duration),
                        success: false,
                        summary: error.to_string(),
                    })
                    .await;

                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{
        ContentBlock, FinishReason, MessageContent, MessageRole, ToolDefinition, Usage,
    };
    use crate::output::NullOutput;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn text_response(text: &str) -> LlmResponse {
        LlmResponse {
            message: LlmMessage::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".to_string(),
            finish_reason: Some(FinishReason::Stop),
        }
    }

    fn tool_use_response(id: &str, name: &str, input: serde_json::Value) -> LlmResponse {
        LlmResponse {
            message: LlmMessage {
                role: MessageRole::Assistant,
                content: MessageContent::Blocks(vec![ContentBlock::ToolUse {
                    id: id.to_string(),
                    name: name.to_string(),
                    input,
                }]),
            },
            usage: None,
            model: "mock-model".to_string(),
            finish_reason: Some(FinishReason::ToolCalls),
        }
    }

    /// Mock client that plays back a fixed script of responses
    struct ScriptedClient {
        responses: Mutex<VecDeque<LlmResponse>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<LlmResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn chat_completion(
            &self,
            _messages: Vec<LlmMessage>,
            _tools: Option<Vec<ToolDefinition>>,
            _options: Option<ChatOptions>,
        ) -> Result<LlmResponse> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| "scripted client ran out of responses".into())
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }

        fn provider_name(&self) -> &str {
            "mock"
        }
    }

    /// Mock client that requests a tool on every turn, never answering
    struct LoopingClient {
        counter: AtomicUsize,
    }

    impl LoopingClient {
        fn new() -> Self {
            Self {
                counter: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmClient for LoopingClient {
        async fn chat_completion(
            &self,
            _messages: Vec<LlmMessage>,
            _tools: Option<Vec<ToolDefinition>>,
            _options: Option<ChatOptions>,
        ) -> Result<LlmResponse> {
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            Ok(tool_use_response(
                &format!("call_{}", n),
                "get_latest_news",
                json!({"topic": "sports"}),
            ))
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }

        fn provider_name(&self) -> &str {
            "mock"
        }
    }

    fn agent_with_client(client: Arc<dyn LlmClient>, max_steps: usize) -> AgentCore {
        let registry = ToolRegistry::default();
        let dispatcher = registry
            .create_dispatcher_with_all()
            .expect("built-in registry is consistent");

        AgentCore {
            config: AgentConfig {
                max_steps,
                ..Default::default()
            },
            llm_client: client,
            dispatcher,
            chat_options: ChatOptions::default(),
            trajectory_recorder: None,
            conversation: Conversation::new(),
            output: Box::new(NullOutput),
            token_usage: TokenUsage::default(),
        }
    }

    #[tokio::test]
    async fn plain_answer_terminates_in_one_step() {
        let client = Arc::new(ScriptedClient::new(vec![text_response("Hello there.")]));
        let mut agent = agent_with_client(client, 10);

        let execution = agent.run_conversation("Say hello").await.unwrap();

        assert_eq!(execution.final_answer, "Hello there.");
        assert_eq!(execution.steps_executed, 1);
        assert_eq!(execution.token_usage.total_tokens, 15);
        // system, user, assistant
        assert_eq!(execution.messages.len(), 3);
    }

    #[tokio::test]
    async fn weather_scenario_round_trips_through_the_tool() {
        let client = Arc::new(ScriptedClient::new(vec![
            tool_use_response("call_1", "get_weather_info", json!({"location": "Hanoi"})),
            text_response("Alfred checked: see the latest weather report above."),
        ]));
        let mut agent = agent_with_client(client, 10);

        let execution = agent
            .run_conversation("What's the weather in Hanoi?")
            .await
            .unwrap();

        assert_eq!(execution.steps_executed, 2);
        assert_eq!(
            execution.final_answer,
            "Alfred checked: see the latest weather report above."
        );

        // system, user, assistant(tool use), tool, assistant(final)
        assert_eq!(execution.messages.len(), 5);
        let tool_message = &execution.messages[3];
        assert_eq!(tool_message.role, MessageRole::Tool);
        match &tool_message.content {
            MessageContent::Blocks(blocks) => match &blocks[0] {
                ContentBlock::ToolResult {
                    tool_use_id,
                    is_error,
                    content,
                } => {
                    assert_eq!(tool_use_id, "call_1");
                    assert_eq!(*is_error, Some(false));
                    let expected = [
                        "Weather in Hanoi: Rainy, 15°C",
                        "Weather in Hanoi: Clear, 25°C",
                        "Weather in Hanoi: Windy, 20°C",
                    ];
                    assert!(
                        expected.contains(&content.as_str()),
                        "unexpected weather report: {}",
                        content
                    );
                }
                other => panic!("unexpected block: {:?}", other),
            },
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_to_the_model_not_fatal() {
        let client = Arc::new(ScriptedClient::new(vec![
            tool_use_response("call_1", "imaginary_tool", json!({"input": "x"})),
            text_response("That tool does not exist, sorry."),
        ]));
        let mut agent = agent_with_client(client, 10);

        let execution = agent.run_conversation("Use the imaginary tool").await.unwrap();

        let tool_message = &execution.messages[3];
        match &tool_message.content {
            MessageContent::Blocks(blocks) => match &blocks[0] {
                ContentBlock::ToolResult {
                    is_error, content, ..
                } => {
                    assert_eq!(*is_error, Some(true));
                    assert!(content.contains("imaginary_tool"));
                }
                other => panic!("unexpected block: {:?}", other),
            },
            other => panic!("unexpected content: {:?}", other),
        }
        assert_eq!(execution.final_answer, "That tool does not exist, sorry.");
    }

    #[tokio::test]
    async fn loop_budget_is_enforced_at_exactly_the_bound() {
        let client = Arc::new(LoopingClient::new());
        let mut agent = agent_with_client(client.clone(), 3);

        let result = agent.run_conversation("never finishes").await;

        assert!(matches!(
            result,
            Err(crate::error::Error::Agent(
                AgentError::LoopBudgetExceeded { max_steps: 3 }
            ))
        ));
        // The model was consulted exactly max_steps times, not more
        assert_eq!(client.counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn trajectory_records_the_full_cycle() {
        let client = Arc::new(ScriptedClient::new(vec![
            tool_use_response("call_1", "get_latest_news", json!({"topic": "sports"})),
            text_response("The national team won."),
        ]));
        let mut agent = agent_with_client(client, 10);
        agent.set_trajectory_recorder(TrajectoryRecorder::new());

        agent.run_conversation("Any sports news?").await.unwrap();

        let entries = agent.trajectory_recorder().unwrap().get_entries().await;
        // task_start, llm_request, llm_response, tool_call, tool_result,
        // llm_request, llm_response, task_complete
        assert_eq!(entries.len(), 8);
    }
}
