//! Sub-configuration structs for the two Azure services and local storage.

use serde::{Deserialize, Serialize};

/// Azure Computer Vision settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Resource endpoint, e.g. `https://my-vision.cognitiveservices.azure.com/`
    pub endpoint: String,

    /// Subscription key sent as `Ocp-Apim-Subscription-Key`
    pub api_key: String,

    /// Which analysis API to use. `auto` probes the resource at startup.
    #[serde(default)]
    pub api: ApiPreference,
}

/// Which vision analysis API generation to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiPreference {
    /// Probe the unified route once at startup and fall back to legacy on 404
    #[default]
    Auto,

    /// Image Analysis 4.0 (single `imageanalysis:analyze` call)
    Unified,

    /// Computer Vision v3.2 (separate describe/tag/detect calls)
    Legacy,
}

/// Azure OpenAI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Resource endpoint, e.g. `https://my-openai.openai.azure.com/`
    pub endpoint: String,

    /// API key sent as the `api-key` header
    pub api_key: String,

    /// REST API version query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Chat-completion deployment to address
    pub deployment_name: String,
}

fn default_api_version() -> String {
    "2023-12-01-preview".to_string()
}

/// Local directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory scanned for input images
    pub input_dir: String,

    /// Directory result records are written to
    pub output_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            input_dir: "input".to_string(),
            output_dir: "output".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
