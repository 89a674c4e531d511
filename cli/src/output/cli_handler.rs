//! CLI output handler implementation

use async_trait::async_trait;
use colored::Colorize;
use tracing::{debug, warn};

use alfred_core::output::{
    AgentEvent, AgentOutput, MessageLevel, OutputResult, ToolExecutionStatus,
};

/// CLI output configuration
#[derive(Debug, Clone, Default)]
pub struct CliOutputConfig {
    /// Whether to show debug-level messages and execution statistics
    pub debug: bool,
}

/// CLI output handler that formats agent events for terminal display
pub struct CliOutputHandler {
    config: CliOutputConfig,
}

impl CliOutputHandler {
    /// Create a new CLI output handler
    pub fn new(config: CliOutputConfig) -> Self {
        Self { config }
    }

    /// Render a tool input for a one-line status display
    fn format_input(input: &serde_json::Value) -> String {
        let rendered = match input {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(map) => {
                // Single-argument tools: show just the value
                let mut values = map.values();
                match (values.next(), values.next()) {
                    (Some(serde_json::Value::String(s)), None) => s.clone(),
                    _ => input.to_string(),
                }
            }
            other => other.to_string(),
        };

        if rendered.chars().count() > 60 {
            let truncated: String = rendered.chars().take(57).collect();
            format!("{}...", truncated)
        } else {
            rendered
        }
    }
}

#[async_trait]
impl AgentOutput for CliOutputHandler {
    async fn emit_event(&self, event: AgentEvent) -> OutputResult {
        match event {
            AgentEvent::ExecutionStarted { context } => {
                debug!("Starting execution: {}", context.task);
            }

            AgentEvent::ToolExecutionStarted { tool_info } => {
                println!(
                    "{} {}({})",
                    "→".cyan(),
                    tool_info.tool_name.bold(),
                    Self::format_input(&tool_info.input).dimmed()
                );
            }

            AgentEvent::ToolExecutionCompleted { tool_info } => {
                let marker = match tool_info.status {
                    ToolExecutionStatus::Success => "●".green(),
                    ToolExecutionStatus::Error => "●".red(),
                    ToolExecutionStatus::Executing => "●".white(),
                };

                if let Some(output) = &tool_info.output {
                    let first_line = output.lines().next().unwrap_or("");
                    println!("{} {}", marker, first_line.dimmed());
                } else {
                    println!("{} {}", marker, tool_info.tool_name);
                }
            }

            AgentEvent::TokenUsageUpdated { token_usage } => {
                debug!(
                    "Tokens: {} input + {} output = {} total",
                    token_usage.input_tokens, token_usage.output_tokens, token_usage.total_tokens
                );
            }

            AgentEvent::ExecutionCompleted {
                context,
                success,
                summary,
            } => {
                if self.config.debug {
                    let status = if success { "done" } else { "failed" };
                    println!(
                        "\n{} {} after {} steps in {:.2}s",
                        status.dimmed(),
                        summary.dimmed(),
                        context.current_step,
                        context.execution_time.as_secs_f64()
                    );
                    if context.token_usage.total_tokens > 0 {
                        println!(
                            "{}",
                            format!(
                                "tokens: {} input + {} output = {} total",
                                context.token_usage.input_tokens,
                                context.token_usage.output_tokens,
                                context.token_usage.total_tokens
                            )
                            .dimmed()
                        );
                    }
                }
            }

            AgentEvent::Message { level, content } => match level {
                MessageLevel::Debug => {
                    if self.config.debug {
                        println!("{}", content.dimmed());
                    } else {
                        debug!("{}", content);
                    }
                }
                MessageLevel::Info => {
                    println!("{}", content);
                }
                MessageLevel::Normal => {
                    // The final answer, plain and unadorned
                    println!("{}", content);
                }
                MessageLevel::Warning => {
                    warn!("{}", content);
                    eprintln!("{} {}", "warning:".yellow().bold(), content);
                }
                MessageLevel::Error => {
                    eprintln!("{} {}", "error:".red().bold(), content);
                }
            },
        }

        Ok(())
    }

    async fn flush(&self) -> OutputResult {
        use std::io::Write;
        std::io::stdout().flush().map_err(|e| e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_argument_objects_render_as_their_value() {
        assert_eq!(
            CliOutputHandler::format_input(&json!({"location": "Hanoi"})),
            "Hanoi"
        );
    }

    #[test]
    fn bare_strings_render_verbatim() {
        assert_eq!(CliOutputHandler::format_input(&json!("sports")), "sports");
    }

    #[test]
    fn long_inputs_are_truncated() {
        let long = "x".repeat(100);
        let rendered = CliOutputHandler::format_input(&json!(long));
        assert_eq!(rendered.chars().count(), 60);
        assert!(rendered.ends_with("..."));
    }
}
