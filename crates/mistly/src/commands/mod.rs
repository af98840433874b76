//! Command dispatch: bridges CLI args -> cache operations -> output formatting.

pub mod cache;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Cache(args) => cache::handle(args, global).await,
    }
}
