//! JSON export of the current review.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::types::{Issue, ReviewResult};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No review to export yet")]
    NothingToExport,
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),
}

/// The exported document. Keys are camelCase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub timestamp: DateTime<Utc>,
    pub language: Option<String>,
    pub quality_score: Option<f64>,
    pub issues: Vec<Issue>,
    pub optimized_code: String,
    pub explanation: String,
}

impl ExportDocument {
    pub fn from_result(result: &ReviewResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            language: result.detected_language.clone(),
            quality_score: result.quality_score,
            issues: result.issues.clone(),
            optimized_code: result.optimized_code.clone(),
            explanation: result.explanation.clone(),
        }
    }

    /// `coderefine-review-<timestamp>.json`.
    pub fn file_name(&self) -> String {
        format!(
            "coderefine-review-{}.json",
            self.timestamp.format("%Y%m%dT%H%M%S")
        )
    }
}

/// Writes the review in `result` into `dir`, returning the file's path.
pub fn write_export(
    dir: &Path,
    result: Option<&ReviewResult>,
    timestamp: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let result = result.ok_or(ExportError::NothingToExport)?;
    let doc = ExportDocument::from_result(result, timestamp);
    std::fs::create_dir_all(dir)?;
    let path = dir.join(doc.file_name());
    let json = serde_json::to_string_pretty(&doc)?;
    std::fs::write(&path, json)?;
    info!(path = %path.display(), "review exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use chrono::TimeZone;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn document_uses_camel_case_keys() {
        let result = ReviewResult {
            detected_language: Some("Go".into()),
            quality_score: Some(91.0),
            issues: vec![Issue::new("x", Severity::Warning)],
            optimized_code: "package main".into(),
            explanation: "ok".into(),
            ..ReviewResult::default()
        };
        let doc = ExportDocument::from_result(&result, stamp());
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["language"], "Go");
        assert_eq!(json["qualityScore"], 91.0);
        assert_eq!(json["optimizedCode"], "package main");
        assert_eq!(json["issues"][0]["severity"], "warning");
        assert_eq!(json["timestamp"], "2026-03-14T09:26:53Z");
    }

    #[test]
    fn file_name_carries_timestamp() {
        let doc = ExportDocument::from_result(&ReviewResult::default(), stamp());
        assert_eq!(doc.file_name(), "coderefine-review-20260314T092653.json");
    }

    #[test]
    fn export_without_result_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_export(dir.path(), None, stamp()).unwrap_err();
        assert!(matches!(err, ExportError::NothingToExport));
    }

    #[test]
    fn export_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReviewResult {
            explanation: "done".into(),
            ..ReviewResult::default()
        };
        let path = write_export(&dir.path().join("out"), Some(&result), stamp()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let back: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(back["explanation"], "done");
        assert!(raw.contains('\n'));
    }
}
