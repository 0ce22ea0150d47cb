//! Output formatting functions.

pub mod pretty;

use crate::cli::OutputFormat;

/// Format a value as JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

/// Format a value for output.
pub fn format_output<T: serde::Serialize>(
    value: &T,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => format_json(value),
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
    }
}
