//! Command line interface for signtool-batch.
//!
//! The CLI is the presentation layer over [`crate::signer`]: it collects the
//! credential and file list, renders progress events, and answers recovery
//! prompts from the terminal.

mod args;
pub mod commands;
mod output;
mod prompt;

pub use args::{Args, Command, RuntimeConfig, SignArgs, ToolArgs};
pub use output::OutputManager;
pub use prompt::StdinPrompt;

use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    validate_args(&args).map_err(|reason| CliError::InvalidArguments { reason })?;

    let config = create_runtime_config(&args);

    match &args.command {
        Command::Sign(sign) => commands::sign(sign, &config).await,
        Command::Status(tool) => commands::status(tool, &config).await,
        Command::Install(tool) => commands::install(tool, &config).await,
        Command::DownloadPage => commands::download_page(&config).await,
    }
}

/// Validate arguments without executing (for testing)
pub fn validate_args(args: &Args) -> std::result::Result<(), String> {
    args.validate()
}

/// Create runtime configuration from arguments
pub fn create_runtime_config(args: &Args) -> RuntimeConfig {
    RuntimeConfig::from(args)
}
