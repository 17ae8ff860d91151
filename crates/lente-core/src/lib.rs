//! Lente Core - Azure-backed image description library.
//!
//! Lente reads local images, analyzes each one with Azure Computer Vision,
//! asks an Azure OpenAI deployment for a Portuguese description of the
//! analysis, and persists one JSON record per image.
//!
//! # Architecture
//!
//! ```text
//! Image → Vision analysis (unified or legacy API) → Description (GPT) → JSON record
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use lente_core::{Config, ImagePipeline};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> lente_core::Result<()> {
//!     let config = Config::load(Path::new("config.json"))?;
//!     let pipeline = ImagePipeline::connect(&config).await?;
//!
//!     let stats = pipeline.process_all().await;
//!     println!("{} records written", stats.total());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod types;
pub mod vision;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, LenteError, PipelineError, PipelineResult, Result};
pub use llm::{AzureOpenAiClient, CompletionModel, Describer};
pub use output::RecordWriter;
pub use pipeline::ImagePipeline;
pub use types::{AnalysisResult, ProcessedRecord, RunStats, Tag};
pub use vision::VisionBackend;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
