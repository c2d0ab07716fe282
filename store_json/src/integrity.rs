//! Integrity checks for the transaction document.
//!
//! Run on startup (or via `charity-daemon check`) to detect a damaged store
//! before the server begins accepting appends.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub path: PathBuf,
    /// Whether the document exists at all. A missing document is healthy.
    pub exists: bool,
    /// Number of entries in the array, if it parsed.
    pub records: usize,
    /// Indices of entries that are `{}`.
    pub empty_records: Vec<usize>,
    /// Indices of entries that are not JSON objects.
    pub non_object_records: Vec<usize>,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty() && self.non_object_records.is_empty()
    }
}

/// Inspect the document at `path`.
///
/// Never fails: read and parse problems are recorded in the report.
pub fn check_integrity(path: &Path) -> IntegrityReport {
    let mut report = IntegrityReport {
        path: path.to_path_buf(),
        exists: false,
        records: 0,
        empty_records: Vec::new(),
        non_object_records: Vec::new(),
        errors: Vec::new(),
    };

    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return report,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            report.exists = true;
            report.errors.push(format!("parse failed: not valid UTF-8: {e}"));
            return report;
        }
        Err(e) => {
            report.exists = true;
            report.errors.push(format!("read failed: {e}"));
            return report;
        }
    };
    report.exists = true;

    if contents.trim().is_empty() {
        return report;
    }

    let entries = match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            report.errors.push("top-level value is not an array".into());
            return report;
        }
        Err(e) => {
            report.errors.push(format!("parse failed: {e}"));
            return report;
        }
    };

    report.records = entries.len();
    for (i, entry) in entries.iter().enumerate() {
        match entry {
            Value::Object(map) if map.is_empty() => report.empty_records.push(i),
            Value::Object(_) => {}
            _ => report.non_object_records.push(i),
        }
    }
    report
}
