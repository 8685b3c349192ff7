//! Output formatting for CLI results

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod formatters;
pub mod json;
pub mod table;

/// Format a raw API response body according to the specified format.
///
/// Bodies that are not valid JSON are passed through untouched in pretty
/// mode and embedded as a string in JSON mode.
pub fn format_payload(body: &str, format: OutputFormat) -> Result<String> {
    let parsed = serde_json::from_str::<Value>(body).ok();

    let output = match format {
        OutputFormat::Pretty => match parsed {
            Some(value) => serde_json::to_string_pretty(&value)?,
            None => body.to_string(),
        },
        OutputFormat::Json => {
            let data = parsed.unwrap_or_else(|| Value::String(body.to_string()));
            json::format_json(&data)?
        }
    };

    Ok(output)
}

/// Format and print a response body to stdout
pub fn print_payload(body: &str, format: OutputFormat) -> Result<()> {
    let output = format_payload(body, format)?;
    println!("{}", output);
    Ok(())
}
