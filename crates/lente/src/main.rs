//! Lente CLI - describe local images with Azure Computer Vision and Azure OpenAI.
//!
//! Reads images from the configured input directory (or a single file via
//! `--image`), analyzes each one, generates a Portuguese description, and
//! writes one JSON record per image to the output directory.
//!
//! # Usage
//!
//! ```bash
//! # First run: writes config.json template, then halts for credentials
//! lente
//!
//! # Process everything in the input directory
//! lente
//!
//! # Process a single image
//! lente --image ./ferias/praia.jpg
//! ```

use clap::Parser;
use lente_core::{ConfigError, ImagePipeline, LenteError, PipelineError};
use std::path::PathBuf;

mod logging;

/// Lente - Azure-backed image description pipeline.
#[derive(Parser, Debug)]
#[command(name = "lente")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Process a single image instead of the input directory
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config problems go to stderr directly.
    let config = match lente_core::Config::load_or_init(&cli.config) {
        Ok(config) => config,
        Err(ConfigError::TemplateWritten(path)) => {
            eprintln!(
                "No config file found. A template was written to {}.\n  \
                 Fill in your Azure credentials and run lente again.",
                path.display()
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: failed to load config: {e}");
            std::process::exit(1);
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Lente v{}", lente_core::VERSION);

    let pipeline = ImagePipeline::connect(&config).await?;

    match cli.image {
        Some(image) => {
            if !image.exists() {
                return Err(LenteError::Pipeline(PipelineError::FileNotFound(image)).into());
            }
            let record = pipeline.process_image(&image).await;
            if !record.is_success() {
                tracing::warn!("Image could not be described; see the error record");
            }
        }
        None => {
            pipeline.process_all().await;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["lente"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(cli.image.is_none());
        assert!(!cli.verbose);
        assert!(!cli.json_logs);
    }

    #[test]
    fn test_single_image_flag() {
        let cli = Cli::try_parse_from(["lente", "--image", "praia.jpg", "-v"]).unwrap();
        assert_eq!(cli.image, Some(PathBuf::from("praia.jpg")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_custom_config_path() {
        let cli = Cli::try_parse_from(["lente", "-c", "conf/azure.json"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("conf/azure.json"));
    }
}
