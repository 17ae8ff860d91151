//! Configuration validation with endpoint and credential checks.

use crate::error::ConfigError;

use super::Config;

fn check_endpoint(name: &str, endpoint: &str) -> Result<(), ConfigError> {
    if endpoint.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{name}.endpoint must not be empty"
        )));
    }
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "{name}.endpoint must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Validate that the service sections are usable before any request is made.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        check_endpoint("vision", &self.vision.endpoint)?;
        if self.vision.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "vision.api_key must not be empty".into(),
            ));
        }

        check_endpoint("openai", &self.openai.endpoint)?;
        if self.openai.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "openai.api_key must not be empty".into(),
            ));
        }
        if self.openai.api_version.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "openai.api_version must not be empty".into(),
            ));
        }
        if self.openai.deployment_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "openai.deployment_name must not be empty".into(),
            ));
        }

        if self.storage.input_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.input_dir must not be empty".into(),
            ));
        }
        if self.storage.output_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.output_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}
