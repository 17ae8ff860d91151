//! Configuration management for Lente.
//!
//! Configuration lives in a single JSON file (default `config.json`). When the
//! file is missing, a placeholder template is written and
//! [`ConfigError::TemplateWritten`] is returned so the caller can point the
//! user at it and halt before any image is touched.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure for Lente.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Azure Computer Vision service
    pub vision: VisionConfig,

    /// Azure OpenAI service
    pub openai: OpenAiConfig,

    /// Input/output directories
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a specific file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, bootstrapping a template if the file is absent.
    ///
    /// The template carries placeholder credentials that must be edited before
    /// a real run, so bootstrapping always returns
    /// [`ConfigError::TemplateWritten`] rather than the parsed template.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            write_template(path)?;
            Err(ConfigError::TemplateWritten(path.to_path_buf()))
        }
    }
}

/// Placeholder template written on first run.
const CONFIG_TEMPLATE: &str = r#"{
    "vision": {
        "endpoint": "https://your-vision-service.cognitiveservices.azure.com/",
        "api_key": "your-vision-api-key"
    },
    "openai": {
        "endpoint": "https://your-openai-service.openai.azure.com/",
        "api_key": "your-openai-api-key",
        "api_version": "2023-12-01-preview",
        "deployment_name": "gpt-4o"
    }
}
"#;

/// Write the placeholder config template to `path`.
fn write_template(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(ConfigError::WriteError)?;
        }
    }
    std::fs::write(path, CONFIG_TEMPLATE).map_err(ConfigError::WriteError)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"{
        "vision": {
            "endpoint": "https://vision.cognitiveservices.azure.com/",
            "api_key": "vision-key"
        },
        "openai": {
            "endpoint": "https://openai.openai.azure.com/",
            "api_key": "openai-key",
            "deployment_name": "gpt-4o"
        }
    }"#;

    #[test]
    fn test_missing_file_writes_template_and_halts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let err = Config::load_or_init(&path).unwrap_err();
        match err {
            ConfigError::TemplateWritten(written) => assert_eq!(written, path),
            other => panic!("expected TemplateWritten, got {other}"),
        }
        assert!(path.exists());

        // The template must parse and carry both placeholder sections.
        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            value["vision"]["endpoint"],
            "https://your-vision-service.cognitiveservices.azure.com/"
        );
        assert_eq!(value["openai"]["deployment_name"], "gpt-4o");
        assert_eq!(value["openai"]["api_version"], "2023-12-01-preview");
    }

    #[test]
    fn test_template_loads_on_second_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert!(Config::load_or_init(&path).is_err());
        let config = Config::load_or_init(&path).unwrap();
        assert_eq!(config.openai.deployment_name, "gpt-4o");
        assert_eq!(config.vision.api, ApiPreference::Auto);
    }

    #[test]
    fn test_api_version_defaults_when_omitted() {
        let config: Config = serde_json::from_str(VALID_CONFIG).unwrap();
        assert_eq!(config.openai.api_version, "2023-12-01-preview");
    }

    #[test]
    fn test_storage_defaults_to_input_and_output() {
        let config: Config = serde_json::from_str(VALID_CONFIG).unwrap();
        assert_eq!(config.storage.input_dir, "input");
        assert_eq!(config.storage.output_dir, "output");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_api_preference_parses_lowercase() {
        let json = VALID_CONFIG.replace(
            "\"api_key\": \"vision-key\"",
            "\"api_key\": \"vision-key\", \"api\": \"legacy\"",
        );
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.vision.api, ApiPreference::Legacy);
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_section_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"vision": {"endpoint": "https://v/", "api_key": "k"}}"#)
            .unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
