//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use keenroute_core::Router;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

/// Build a router session from config, environment and flags.
pub fn connect(global: &GlobalOpts) -> Result<Router, CliError> {
    let router_config = config::router_config(global)?;
    tracing::debug!(url = %router_config.url, user = %router_config.username, "opening router session");
    Ok(Router::new(&router_config)?)
}

/// Fail with a usage error unless `path` exists.
pub fn require_file(path: &Path) -> Result<(), CliError> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
