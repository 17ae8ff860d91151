//! Error types for the Lente image description pipeline.
//!
//! Errors are organized by phase: configuration problems halt the run before
//! any image is touched, while per-image pipeline errors carry enough context
//! (paths, HTTP status codes) to be recorded and reported without stopping
//! the batch.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Lente operations.
#[derive(Error, Debug)]
pub enum LenteError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to write the config template
    #[error("Failed to write config template: {0}")]
    WriteError(std::io::Error),

    /// Failed to parse JSON configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// No config file existed, so a placeholder template was written.
    /// The caller is expected to report where it landed and halt.
    #[error("Config file not found; wrote template to {0}")]
    TemplateWritten(PathBuf),
}

/// Per-image pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The vision analysis service rejected or failed the request
    #[error("Vision analysis failed: {message}")]
    Vision {
        message: String,
        status_code: Option<u16>,
    },

    /// The chat-completion service rejected or failed the request
    #[error("Completion request failed: {message}")]
    Completion {
        message: String,
        status_code: Option<u16>,
    },

    /// Reading the image bytes from disk failed
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Writing the result record failed
    #[error("Failed to persist record to {path}: {message}")]
    Persist { path: PathBuf, message: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Convenience type alias for Lente results.
pub type Result<T> = std::result::Result<T, LenteError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
