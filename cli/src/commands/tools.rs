//! Tools listing command

use anyhow::Result;
use colored::Colorize;
use tracing::info;

use alfred_core::ToolRegistry;

/// Show available tools
pub async fn tools_command() -> Result<()> {
    info!("Listing available tools");

    println!("{}\n", "Available tools".bold());

    let registry = ToolRegistry::default();
    for tool in registry.describe() {
        println!("  {}", tool.name.cyan().bold());
        // Show first line of description only for brevity
        let first_line = tool.description.lines().next().unwrap_or(&tool.description);
        println!("    {}\n", first_line);
    }

    Ok(())
}
