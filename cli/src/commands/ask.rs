//! Single question execution command

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::output::cli_handler::{CliOutputConfig, CliOutputHandler};
use alfred_core::{Agent, AgentBuilder, AgentConfig, TrajectoryRecorder};

/// Answer a single question
pub async fn ask_command(
    question: String,
    config_loader: crate::config::CliConfigLoader,
    max_steps: Option<usize>,
    step_timeout: Option<u64>,
    trajectory_file: Option<PathBuf>,
    debug_output: bool,
) -> Result<()> {
    info!("Answering question: {}", question);

    // Load LLM configuration
    let llm_config = config_loader.load().await?;
    info!("Using protocol: {}", llm_config.protocol.as_str());
    info!("Using model: {}", llm_config.model);

    // Create agent configuration
    let mut agent_config = AgentConfig::default();
    if let Some(steps) = max_steps {
        agent_config.max_steps = steps;
    }
    if let Some(secs) = step_timeout {
        agent_config.step_timeout_secs = Some(secs);
    }

    // Create CLI output handler
    let cli_output = Box::new(CliOutputHandler::new(CliOutputConfig {
        debug: debug_output,
    }));

    // Build agent with the default tool registry
    let mut agent = AgentBuilder::new(llm_config)
        .with_agent_config(agent_config)
        .build_with_output(cli_output)
        .await?;

    if let Some(path) = &trajectory_file {
        debug!("Recording trajectory to {}", path.display());
        agent.set_trajectory_recorder(TrajectoryRecorder::with_file(path));
    }

    // The final answer is printed by the output handler as it arrives
    let execution = agent.run(&question).await?;

    debug!(
        "Answered in {} steps ({} ms, {} tokens)",
        execution.steps_executed, execution.duration_ms, execution.token_usage.total_tokens
    );

    if let Some(path) = &trajectory_file {
        info!("Trajectory saved to {}", path.display());
    }

    Ok(())
}
