// scoutseed — dataset.rs
// Loads the records to seed from a JSON file.
// Author: d65v <https://github.com/d65v>

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::{Record, Result, SeedError};

/// Ordered records read once at run start. Never mutated afterwards.
pub type Dataset = Vec<Record>;

/// Read `path` fully into memory. The file must hold a single JSON array;
/// its elements are kept exactly as written, whatever their shape.
///
/// # Errors
/// `SeedError::DataFile` if the file cannot be read,
/// `SeedError::MalformedData` if it is not valid JSON or not an array.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| SeedError::DataFile {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_dataset(&raw).map_err(|reason| SeedError::MalformedData {
        path: path.to_path_buf(),
        reason,
    })?;

    log::debug!("load_dataset: {} records from {}", records.len(), path.display());
    Ok(records)
}

fn parse_dataset(raw: &str) -> std::result::Result<Dataset, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(other) => Err(format!("expected a JSON array, found {}", kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
