//! JSON output formatting

use chrono::Utc;
use serde::Serialize;

/// Envelope for JSON output: `{ "data": ..., "meta": {...} }`
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a, T: Serialize + ?Sized> {
    pub data: &'a T,
    pub meta: Metadata,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize)]
pub struct Metadata {
    /// Timestamp of the response
    pub timestamp: String,

    /// CLI version
    pub version: String,

    /// Number of records, for list results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<'a, T: Serialize + ?Sized> JsonOutput<'a, T> {
    pub fn new(data: &'a T, count: Option<usize>) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                count,
            },
        }
    }
}

/// Format a single value as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data, None))
}

/// Format a list as pretty-printed JSON with a record count
pub fn format_json_list<T: Serialize>(data: &[T]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data, Some(data.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_format_json_has_envelope() {
        let out = format_json(&true).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["data"], true);
        assert_eq!(parsed["meta"]["version"], env!("CARGO_PKG_VERSION"));
        assert!(parsed["meta"].get("count").is_none());
    }

    #[test]
    fn test_format_json_list_counts() {
        let out = format_json_list(&["a", "b"]).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["meta"]["count"], 2);
        assert_eq!(parsed["data"][1], "b");
    }

    #[test]
    fn test_format_json_list_empty() {
        let empty: Vec<String> = vec![];
        let parsed: Value = serde_json::from_str(&format_json_list(&empty).unwrap()).unwrap();

        assert_eq!(parsed["meta"]["count"], 0);
        assert!(parsed["data"].as_array().unwrap().is_empty());
    }
}
