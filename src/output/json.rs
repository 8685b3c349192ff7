//! `--format json` envelope for recipe API bodies
//!
//! A Spoonacular body (recipe information, an ingredient widget, or a search
//! result array) is embedded unchanged under `data`. Bodies that do not
//! parse as JSON arrive here as a JSON string.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A recipe API body plus a record of when and by which CLI build it was printed
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T> {
    /// Spoonacular response body, as returned (cached or fetched)
    pub data: T,

    pub meta: Metadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Metadata {
    /// RFC 3339 time the envelope was built, not when the body was fetched
    pub timestamp: String,

    /// `dishify` package version
    pub version: String,
}

impl<T> JsonOutput<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

/// Wrap a recipe body and render it as indented JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    let output = JsonOutput::new(data);
    serde_json::to_string_pretty(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_json_output_carries_version_and_timestamp() {
        let output = JsonOutput::new(json!({"id": 42}));

        assert_eq!(output.data["id"], 42);
        assert_eq!(output.meta.version, env!("CARGO_PKG_VERSION"));
        assert!(chrono::DateTime::parse_from_rfc3339(&output.meta.timestamp).is_ok());
    }

    #[test]
    fn test_format_json_envelope() {
        let body = json!([{"id": 1, "title": "Apple Pie"}]);
        let result = format_json(&body).unwrap();

        let parsed: JsonOutput<Value> = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed.data[0]["title"], "Apple Pie");
        assert_eq!(parsed.meta.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_format_json_empty_results() {
        let result = format_json(&json!([])).unwrap();
        assert!(result.contains("\"data\": []"));
    }
}
