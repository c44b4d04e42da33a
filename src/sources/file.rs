//! JSON export files (one file or a glob of files)

use super::{collect_files, unwrap_envelope, RecordSource};
use crate::types::{InsightsError, Result};
use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads records from a JSON file or every file matching a glob pattern.
/// Each file may hold any of the response shapes the backend emits.
pub struct FileSource {
    pattern: String,
}

impl FileSource {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parse a single file into its raw JSON value
    pub fn parse_file(path: &Path) -> Result<Value> {
        let mut bytes = fs::read(path)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Array(Vec::new()));
        }
        simd_json::from_slice(&mut bytes)
            .map_err(|e| InsightsError::Parse(format!("{}: {}", path.display(), e)))
    }
}

impl RecordSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    /// Files are parsed in parallel; a file that fails to parse is skipped
    fn fetch(&self, collection: &str) -> Result<Vec<Value>> {
        let files: Vec<PathBuf> = collect_files(&self.pattern);
        if files.is_empty() {
            tracing::warn!(pattern = %self.pattern, "no files matched");
        }

        let records: Vec<Value> = files
            .par_iter()
            .flat_map(|f| match Self::parse_file(f) {
                Ok(value) => unwrap_envelope(value, collection),
                Err(e) => {
                    tracing::warn!(file = %f.display(), error = %e, "skipping unreadable file");
                    Vec::new()
                }
            })
            .collect();

        Ok(records)
    }
}
