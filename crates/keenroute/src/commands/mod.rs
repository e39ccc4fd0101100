//! Command dispatch: bridges CLI args to core route operations.

pub mod backup;
pub mod clear;
pub mod config_cmd;
pub mod list;
pub mod resolve;
pub mod upload;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a route command to its handler.
///
/// Handlers open the router session themselves, after any local
/// validation, so a broken routes file never costs a login.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Upload(args) => upload::handle(args, global).await,
        Command::Backup(args) => backup::handle(args, global).await,
        Command::Clear => clear::handle(global).await,
        Command::Resolve(args) => resolve::handle(args, global).await,
        Command::List(args) => list::handle(args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
