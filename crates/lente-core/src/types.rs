//! Core data types for the Lente image description pipeline.
//!
//! These types carry the normalized vision analysis and the per-image result
//! record that gets persisted to disk.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Normalized output of the vision analysis service.
///
/// Both the unified Image Analysis API and the legacy three-endpoint API are
/// mapped into this shape; absent sections deserialize to their defaults.
/// Instances are never mutated after the backend builds them.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisResult {
    /// Primary caption for the whole image
    #[serde(default)]
    pub caption: String,

    /// Confidence of the primary caption, 0.0 to 1.0
    #[serde(default)]
    pub confidence: f32,

    /// Region-level captions (or caption candidates on the legacy API)
    #[serde(default)]
    pub dense_captions: Vec<DenseCaption>,

    /// Content tags with confidence scores
    #[serde(default)]
    pub tags: Vec<Tag>,

    /// Detected objects with bounding boxes
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
}

/// A caption for a region of the image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseCaption {
    pub text: String,
    pub confidence: f32,
}

/// A content tag with confidence score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// The tag label (e.g., "cat", "indoor", "furniture")
    pub name: String,

    /// Confidence score from 0.0 to 1.0
    pub confidence: f32,
}

impl Tag {
    /// Create a new tag with the given name and confidence.
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// An object located in the image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Object class name
    pub name: String,

    /// Detection confidence from 0.0 to 1.0
    pub confidence: f32,

    /// Pixel rectangle around the object
    pub bounding_box: BoundingBox,
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The persisted outcome for one image: either a full analysis with its
/// generated description, or the error that stopped the image.
///
/// Serialized flat (untagged), so a success record is
/// `{timestamp, image_path, analysis, generated_text}` and a failure record
/// is `{timestamp, image_path, error}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessedRecord {
    Success {
        timestamp: String,
        image_path: PathBuf,
        analysis: AnalysisResult,
        generated_text: String,
    },
    Failure {
        timestamp: String,
        image_path: PathBuf,
        error: String,
    },
}

impl ProcessedRecord {
    /// Build a success record stamped with the current local time.
    pub fn success(
        image_path: impl Into<PathBuf>,
        analysis: AnalysisResult,
        generated_text: impl Into<String>,
    ) -> Self {
        ProcessedRecord::Success {
            timestamp: Local::now().to_rfc3339(),
            image_path: image_path.into(),
            analysis,
            generated_text: generated_text.into(),
        }
    }

    /// Build a failure record stamped with the current local time.
    pub fn failure(image_path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        ProcessedRecord::Failure {
            timestamp: Local::now().to_rfc3339(),
            image_path: image_path.into(),
            error: error.into(),
        }
    }

    /// Path of the source image this record describes.
    pub fn image_path(&self) -> &Path {
        match self {
            ProcessedRecord::Success { image_path, .. } => image_path,
            ProcessedRecord::Failure { image_path, .. } => image_path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessedRecord::Success { .. })
    }
}

/// Statistics for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunStats {
    /// Images that produced a success record
    pub succeeded: usize,

    /// Images that produced a failure record
    pub failed: usize,

    /// Wall-clock time for the whole batch in seconds
    pub total_seconds: f64,
}

impl RunStats {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}
