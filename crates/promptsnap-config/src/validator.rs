//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Style names the Gemini analyzer understands.
const KNOWN_STYLES: [&str; 4] = ["creative", "technical", "artistic", "commercial"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn collected errors into a single [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        if self.is_valid() {
            return Ok(self.warnings);
        }
        let message = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(ConfigError::Invalid(message))
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_batch(config, &mut result);
        Self::validate_gemini(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_batch(config: &Config, result: &mut ValidationResult) {
        if config.batch.max_concurrent == 0 {
            result.add_error(ValidationError::new(
                "batch.max_concurrent",
                "max_concurrent must be at least 1",
            ));
        }

        if config.batch.max_concurrent > 20 {
            result.add_warning(ValidationWarning::new(
                "batch.max_concurrent",
                "max_concurrent is very high (>20), the API is likely to rate limit",
            ));
        }

        if config.batch.retry_attempts == 0 {
            result.add_error(ValidationError::new(
                "batch.retry_attempts",
                "retry_attempts must be at least 1",
            ));
        }

        if config.batch.retry_attempts > 8 {
            result.add_warning(ValidationWarning::new(
                "batch.retry_attempts",
                "retry_attempts is very high (>8), backoff delays grow exponentially",
            ));
        }
    }

    fn validate_gemini(config: &Config, result: &mut ValidationResult) {
        let gemini = &config.gemini;

        if !gemini.base_url.starts_with("http://") && !gemini.base_url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "gemini.base_url",
                "base_url must start with http:// or https://",
            ));
        }

        if gemini.model.is_empty() {
            result.add_error(ValidationError::new("gemini.model", "Model cannot be empty"));
        }

        if !(0.0..=2.0).contains(&gemini.temperature) {
            result.add_error(ValidationError::new(
                "gemini.temperature",
                "temperature must be between 0.0 and 2.0",
            ));
        }

        if !(gemini.top_p > 0.0 && gemini.top_p <= 1.0) {
            result.add_error(ValidationError::new(
                "gemini.top_p",
                "top_p must be in (0.0, 1.0]",
            ));
        }

        if gemini.max_output_tokens == 0 {
            result.add_error(ValidationError::new(
                "gemini.max_output_tokens",
                "max_output_tokens must be greater than 0",
            ));
        }

        if gemini.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "gemini.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }

        if !KNOWN_STYLES.contains(&gemini.default_style.as_str()) {
            result.add_warning(ValidationWarning::new(
                "gemini.default_style",
                format!(
                    "Unknown style '{}', falls back to 'creative'. Valid values: {:?}",
                    gemini.default_style, KNOWN_STYLES
                ),
            ));
        }

        if gemini.resolved_api_keys().is_empty() {
            result.add_warning(ValidationWarning::new(
                "gemini.api_keys",
                "No API keys configured and GEMINI_API_KEY is not set",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if config.logging.level.trim().is_empty() {
            result.add_error(ValidationError::new(
                "logging.level",
                "Log level cannot be empty",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
