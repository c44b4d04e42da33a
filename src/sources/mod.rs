//! Record sources: local JSON exports and the backend REST API

mod api;
mod file;

pub use api::ApiSource;
pub use file::FileSource;

use crate::types::{FinancialRecord, RecordKind, Result};
use chrono::FixedOffset;
use serde_json::Value;
use std::path::PathBuf;

/// Anything that can hand back the raw records of a collection
pub trait RecordSource: Send + Sync {
    /// Source name for log output (e.g., "file", "api")
    fn name(&self) -> &str;

    /// Raw records of `collection` ("orders", "donations", "users")
    fn fetch(&self, collection: &str) -> Result<Vec<Value>>;

    /// Fetch and convert into financial records of `kind`
    fn load_records(&self, kind: RecordKind, tz: &FixedOffset) -> Result<Vec<FinancialRecord>> {
        let values = self.fetch(kind.collection())?;
        tracing::debug!(
            source = self.name(),
            collection = kind.collection(),
            count = values.len(),
            "fetched records"
        );
        Ok(FinancialRecord::from_values(&values, kind, tz))
    }
}

/// Pull the record array out of a response body.
///
/// Accepted shapes, first match wins: a bare array, `result.data`, `data`,
/// then `<collection>`. Anything else yields no records.
pub fn unwrap_envelope(value: Value, collection: &str) -> Vec<Value> {
    let value = match value {
        Value::Array(items) => return items,
        Value::Object(map) => map,
        other => {
            tracing::warn!(collection, kind = json_kind(&other), "unexpected response shape");
            return Vec::new();
        }
    };

    let nested = value
        .get("result")
        .and_then(|r| r.get("data"))
        .and_then(Value::as_array);
    let found = nested
        .or_else(|| value.get("data").and_then(Value::as_array))
        .or_else(|| value.get(collection).and_then(Value::as_array));

    match found {
        Some(items) => items.clone(),
        None => {
            tracing::warn!(collection, "no record array in response");
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Expand a file path or glob pattern into existing files, sorted
pub fn collect_files(pattern: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = glob::glob(pattern)
        .map(|paths| {
            paths
                .filter_map(|e| e.ok())
                .filter(|p| p.is_file())
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_bare_array() {
        let items = unwrap_envelope(json!([{"a": 1}, {"a": 2}]), "orders");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_unwrap_result_data_first() {
        let body = json!({
            "result": {"data": [{"a": 1}]},
            "data": [{"a": 2}, {"a": 3}]
        });
        let items = unwrap_envelope(body, "orders");
        assert_eq!(items, vec![json!({"a": 1})]);
    }

    #[test]
    fn test_unwrap_data_then_collection_key() {
        let items = unwrap_envelope(json!({"data": [{"a": 1}]}), "orders");
        assert_eq!(items.len(), 1);

        let items = unwrap_envelope(json!({"donations": [{"a": 1}, {"a": 2}]}), "donations");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_unwrap_unknown_shapes() {
        assert!(unwrap_envelope(json!({"orders": [1]}), "donations").is_empty());
        assert!(unwrap_envelope(json!({"data": {"not": "array"}}), "orders").is_empty());
        assert!(unwrap_envelope(json!("oops"), "orders").is_empty());
        assert!(unwrap_envelope(Value::Null, "orders").is_empty());
    }

    #[test]
    fn test_collect_files_glob() {
        let files = collect_files("tests/fixtures/multi/*.json");
        assert_eq!(files.len(), 3);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_collect_files_missing() {
        assert!(collect_files("tests/fixtures/nonexistent/*.json").is_empty());
        assert!(collect_files("tests/fixtures/absent.json").is_empty());
    }
}
