//! Output formatting: plain text or JSON, selected by `--output`.

use std::io::{self, Write};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Render a single serde-serializable item in the chosen format.
///
/// `plain_fn` produces the human-readable form.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Plain => Ok(plain_fn(data)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
    }
}

/// Print the rendered output to stdout.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Aligned `label: value` lines.
pub fn key_values(rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(k, v)| format!("{k:<width$}  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
