//! Pipeline orchestration - wires analysis, description and persistence.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult, Result};
use crate::llm::{AzureOpenAiClient, Describer};
use crate::output::RecordWriter;
use crate::types::{ProcessedRecord, RunStats};
use crate::vision::{self, VisionBackend};

use super::discovery;

/// The main pipeline: analyze with the vision backend, describe with the
/// completion model, persist the record. One image at a time.
pub struct ImagePipeline {
    vision: Box<dyn VisionBackend>,
    describer: Describer,
    writer: RecordWriter,
    input_dir: PathBuf,
}

impl ImagePipeline {
    /// Assemble a pipeline from already-built parts.
    pub fn new(
        vision: Box<dyn VisionBackend>,
        describer: Describer,
        writer: RecordWriter,
        input_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            vision,
            describer,
            writer,
            input_dir: input_dir.into(),
        }
    }

    /// Build the pipeline for a validated config.
    ///
    /// Creates the input/output directories, probes the vision resource to
    /// pick the analysis API, and wires up the Azure OpenAI describer. Fails
    /// when the probe cannot reach the resource, since no backend was chosen.
    pub async fn connect(config: &Config) -> Result<Self> {
        tokio::fs::create_dir_all(&config.storage.input_dir).await?;
        tokio::fs::create_dir_all(&config.storage.output_dir).await?;

        let vision = vision::connect(&config.vision).await?;
        let describer = Describer::new(Box::new(AzureOpenAiClient::new(&config.openai)));
        let writer = RecordWriter::new(&config.storage.output_dir);

        Ok(Self::new(vision, describer, writer, &config.storage.input_dir))
    }

    /// Process one image end to end.
    ///
    /// Never returns an error: a stage failure becomes a failure record, and
    /// whichever record results is persisted before returning. A success
    /// record that cannot be persisted is demoted to a failure record, since
    /// its data never reached disk.
    pub async fn process_image(&self, path: &Path) -> ProcessedRecord {
        tracing::info!("Processing image: {}", path.display());

        let record = match self.run_stages(path).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Failed to process {}: {e}", path.display());
                ProcessedRecord::failure(path, e.to_string())
            }
        };

        match self.writer.write(&record) {
            Ok(_) => record,
            Err(e) if record.is_success() => {
                tracing::error!("Failed to persist record for {}: {e}", path.display());
                let failure = ProcessedRecord::failure(path, e.to_string());
                if let Err(e) = self.writer.write(&failure) {
                    tracing::error!("Failed to persist failure record for {}: {e}", path.display());
                }
                failure
            }
            Err(e) => {
                tracing::error!("Failed to persist failure record for {}: {e}", path.display());
                record
            }
        }
    }

    async fn run_stages(&self, path: &Path) -> PipelineResult<ProcessedRecord> {
        let bytes = tokio::fs::read(path).await.map_err(|e| PipelineError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::debug!(
            "Analyzing {} ({} bytes) via {} API",
            path.display(),
            bytes.len(),
            self.vision.name()
        );
        let analysis = self.vision.analyze(&bytes).await?;
        tracing::debug!(
            "Analysis of {} found {} tags, {} objects",
            path.display(),
            analysis.tags.len(),
            analysis.objects.len()
        );

        let generated_text = self.describer.describe(&analysis).await;

        Ok(ProcessedRecord::success(path, analysis, generated_text))
    }

    /// Process every image in the input directory, strictly sequentially.
    ///
    /// An empty directory is reported and yields zero stats, not an error.
    pub async fn process_all(&self) -> RunStats {
        let start = Instant::now();
        let images = discovery::list_images(&self.input_dir);

        if images.is_empty() {
            tracing::warn!(
                "No images found in {} (accepted extensions: {})",
                self.input_dir.display(),
                discovery::IMAGE_EXTENSIONS.join(", ")
            );
            return RunStats::default();
        }

        tracing::info!("Found {} images in {}", images.len(), self.input_dir.display());

        let mut stats = RunStats::default();
        for path in &images {
            let record = self.process_image(path).await;
            if record.is_success() {
                stats.succeeded += 1;
            } else {
                stats.failed += 1;
            }
        }
        stats.total_seconds = start.elapsed().as_secs_f64();

        tracing::info!(
            "Batch complete: {} succeeded, {} failed in {:.1}s",
            stats.succeeded,
            stats.failed,
            stats.total_seconds
        );
        stats
    }
}
