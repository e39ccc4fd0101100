//! Output formatting: table, JSON, YAML, plain, and status lines.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of items in the chosen format.
///
/// - `table`: builds rows with `to_row` and the `Tabled` derive
/// - `json` / `yaml`: serializes the items via serde
/// - `plain`: calls `id_fn` on each item, one per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)
            .unwrap_or_else(|e| format!("serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(data).unwrap_or_else(|e| format!("serialization failed: {e}"))
        }
        OutputFormat::Plain => data.iter().map(id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Print rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a one-line success message to stdout.
pub fn success(message: &str, quiet: bool, color: ColorMode) {
    if quiet {
        return;
    }
    if should_color(color) {
        println!("{} {message}", "✓".green());
    } else {
        println!("{message}");
    }
}

/// Print a warning to stderr. Shown even in quiet mode.
pub fn warn(message: &str, color: ColorMode) {
    if should_color(color) && io::stderr().is_terminal() {
        eprintln!("{} {message}", "warning:".yellow().bold());
    } else {
        eprintln!("warning: {message}");
    }
}
