//! Promptlab: file-based prompt authoring with placeholder templates,
//! version history and LLM test runs.
//!
//! This is the main entry point for the `promptlab` CLI. It parses arguments,
//! sets up logging, dispatches to the appropriate command handler, and maps
//! errors to exit codes.

mod cli;
mod commands;
pub mod compare;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod execution;
pub mod exit_codes;
pub mod fs;
pub mod history;
pub mod locks;
pub mod prompt;
pub mod store;
pub mod template;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn setup_logging(level: tracing::Level) {
    // Diagnostics go to stderr so rendered prompts and model replies on
    // stdout stay pipeable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_logging(cli.log_level);

    match commands::dispatch(cli.command).await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            if let Some(hint) = err.hint() {
                eprintln!("{}", hint);
            }
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
