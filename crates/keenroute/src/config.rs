//! CLI configuration: thin wrapper around `keenroute_config`.
//!
//! Applies `GlobalOpts` flag overrides on top of the file and environment
//! layers, then builds the core `RouterConfig`.

use secrecy::SecretString;

use keenroute_core::RouterConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use keenroute_config::{Config, config_path, load_config, save_config};

/// Effective config: file, then `KEENETIC_*`, then command-line flags.
pub fn effective_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config()?;
    apply_flags(&mut cfg, global);
    Ok(cfg)
}

fn apply_flags(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref host) = global.host {
        cfg.host.clone_from(host);
    }
    if let Some(ref user) = global.user {
        cfg.user.clone_from(user);
    }
    if let Some(ref password) = global.password {
        cfg.password = Some(SecretString::from(password.clone()));
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if global.insecure {
        cfg.insecure = true;
    }
}

/// Validated router connection settings for commands that talk to the router.
pub fn router_config(global: &GlobalOpts) -> Result<RouterConfig, CliError> {
    Ok(effective_config(global)?.to_router_config()?)
}
