//! CLI output handling

pub mod cli_handler;

pub use cli_handler::{CliOutputConfig, CliOutputHandler};
