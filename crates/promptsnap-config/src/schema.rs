//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Environment variable consulted when no keys are configured.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub batch: BatchSettings,

    #[serde(default)]
    pub gemini: GeminiSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Batch pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    #[serde(default = "default_delay_between_batches")]
    pub delay_between_batches_ms: u64,

    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            delay_between_batches_ms: default_delay_between_batches(),
            retry_attempts: default_retry_attempts(),
        }
    }
}

fn default_max_concurrent() -> usize {
    5
}

fn default_delay_between_batches() -> u64 {
    1000
}

fn default_retry_attempts() -> u32 {
    3
}

/// Gemini API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// Keys rotated round-robin.
    #[serde(default)]
    pub api_keys: Vec<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    #[serde(default = "default_style")]
    pub default_style: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            default_style: default_style(),
        }
    }
}

impl GeminiSettings {
    /// Configured keys, or the `GEMINI_API_KEY` environment variable when
    /// none are configured.
    pub fn resolved_api_keys(&self) -> Vec<String> {
        let configured: Vec<String> = self
            .api_keys
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if !configured.is_empty() {
            return configured;
        }

        std::env::var(GEMINI_API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .into_iter()
            .collect()
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_k() -> u32 {
    40
}

fn default_top_p() -> f32 {
    0.9
}

fn default_max_output_tokens() -> u32 {
    400
}

fn default_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_style() -> String {
    "creative".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for daily-rotated log files; console only when unset.
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
