//! Gemini-backed [`Analyzer`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use promptsnap_batch::{AnalyzeError, Analyzer};

use crate::cleanup::clean_prompt;
use crate::client::{GeminiClient, DEFAULT_MODEL};
use crate::error::GeminiError;
use crate::key_pool::KeyPool;
use crate::style::PromptStyle;
use crate::types::*;

/// Describes images with Gemini, rotating through a [`KeyPool`].
pub struct GeminiAnalyzer {
    client: GeminiClient,
    keys: Arc<KeyPool>,
    model: String,
    generation_config: GenerationConfig,
}

impl GeminiAnalyzer {
    /// Create an analyzer with the default model and sampling.
    pub fn new(client: GeminiClient, keys: Arc<KeyPool>) -> Self {
        Self {
            client,
            keys,
            model: DEFAULT_MODEL.to_string(),
            generation_config: GenerationConfig::image_description(),
        }
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling parameters.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = config;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn keys(&self) -> &Arc<KeyPool> {
        &self.keys
    }

    /// Request body for one image.
    pub fn build_request(&self, style: PromptStyle, image: InlineData) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Text {
                        text: style.instruction(),
                    },
                    Part::InlineData { inline_data: image },
                ],
            }],
            generation_config: Some(self.generation_config.clone()),
        }
    }

    /// Describe the image at `source` in the style named by `variation`.
    pub async fn describe(&self, source: &str, variation: &str) -> Result<String, GeminiError> {
        let key = self.keys.acquire()?;
        let style = PromptStyle::parse_lossy(variation);
        let image = self.client.fetch_image(source).await?;
        let request = self.build_request(style, image);

        debug!("Describing {} (style={}, key={})", source, style, key.id);
        let response = self
            .client
            .generate_content(&key.key, &self.model, &request)
            .await;

        if let Err(e) = self.keys.record_usage(&key.id) {
            warn!("Failed to record key usage: {}", e);
        }

        let text = response?
            .first_text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or(GeminiError::EmptyResponse)?;

        Ok(clean_prompt(&text))
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(&self, source: &str, variation: &str) -> Result<String, AnalyzeError> {
        self.describe(source, variation)
            .await
            .map_err(|e| AnalyzeError::from_error(&e))
    }
}

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod tests;
