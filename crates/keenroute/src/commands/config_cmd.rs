//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::Input;
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the password.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "host = \"{}\"", cfg.host);
    let _ = writeln!(out, "user = \"{}\"", cfg.user);
    if cfg.password.is_some() {
        let _ = writeln!(out, "password = \"****\"");
    }
    let _ = writeln!(out, "timeout = {}", cfg.timeout);
    let _ = writeln!(out, "insecure = {}", cfg.insecure);
    if let Some(ref ca) = cfg.ca_cert {
        let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
    }
    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_text(prompt: &str, current: &str) -> Result<String, CliError> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if !current.is_empty() {
        input = input.default(current.to_owned());
    }
    Ok(input.interact_text().map_err(prompt_err)?.trim().to_owned())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = config::config_path();
            eprintln!("keenroute configuration wizard");
            eprintln!("   Config path: {}\n", path.display());

            let mut cfg = config::effective_config(global)?;
            cfg.host = prompt_text("Router host (e.g., 192.168.100.1:280)", &cfg.host)?;
            cfg.user = prompt_text("Username", &cfg.user)?;
            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            cfg.password = Some(SecretString::from(password.trim().to_owned()));

            cfg.validate()?;
            cfg.base_url()?;
            let saved = config::save_config(&cfg)?;

            output::success(
                &format!("Configuration saved to {}", saved.display()),
                global.quiet,
                global.color,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::effective_config(global)?;
            output::print_output(&format_config_redacted(&cfg), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
