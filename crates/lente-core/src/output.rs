//! Persistence of result records as JSON files.
//!
//! Each processed image yields exactly one file under the output directory,
//! named after the image stem plus the write time in unix seconds.

use crate::error::PipelineError;
use crate::types::ProcessedRecord;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Writes one pretty-printed JSON file per record.
pub struct RecordWriter {
    output_dir: PathBuf,
}

impl RecordWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Persist a record, returning the path it landed at.
    ///
    /// Re-running the same image produces a new file (new timestamp suffix)
    /// rather than overwriting the previous record. Writes within the same
    /// second do overwrite; that collision is accepted.
    pub fn write(&self, record: &ProcessedRecord) -> Result<PathBuf, PipelineError> {
        let path = self.record_path(record.image_path(), Utc::now().timestamp());

        let content =
            serde_json::to_string_pretty(record).map_err(|e| PipelineError::Persist {
                path: path.clone(),
                message: format!("serialization failed: {e}"),
            })?;
        std::fs::write(&path, content).map_err(|e| PipelineError::Persist {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::info!("Saved result record to {}", path.display());
        Ok(path)
    }

    fn record_path(&self, image_path: &Path, unix_seconds: i64) -> PathBuf {
        let stem = image_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        self.output_dir.join(format!("{stem}_{unix_seconds}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalysisResult;

    #[test]
    fn test_file_name_is_stem_plus_unix_seconds() {
        let writer = RecordWriter::new("out");
        let path = writer.record_path(Path::new("input/praia de col.jpeg"), 1700000000);
        assert_eq!(path, Path::new("out/praia de col_1700000000.json"));
    }

    #[test]
    fn test_writes_pretty_json_preserving_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RecordWriter::new(dir.path());
        let record = ProcessedRecord::success(
            "input/praia.jpg",
            AnalysisResult {
                caption: "uma praia ao pôr do sol".to_string(),
                confidence: 0.9,
                ..Default::default()
            },
            "Descrição: céu alaranjado.",
        );

        let path = writer.write(&record).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        assert!(content.contains('\n'));
        assert!(content.contains("uma praia ao pôr do sol"));
        assert!(content.contains("Descrição: céu alaranjado."));
        assert!(!content.contains("\\u"));
    }

    #[test]
    fn test_failure_records_are_persisted_too() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RecordWriter::new(dir.path());
        let record = ProcessedRecord::failure("input/quebrada.png", "Vision analysis failed");

        let path = writer.write(&record).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value["error"], "Vision analysis failed");
        assert!(value.get("analysis").is_none());
    }

    #[test]
    fn test_missing_output_dir_is_a_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RecordWriter::new(dir.path().join("nowhere"));
        let record = ProcessedRecord::failure("a.jpg", "err");

        let err = writer.write(&record).unwrap_err();
        assert!(matches!(err, PipelineError::Persist { .. }));
    }
}
