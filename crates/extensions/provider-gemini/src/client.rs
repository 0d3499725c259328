//! Gemini API client.

use std::path::Path;
use std::time::Duration;

use base64::Engine;
use reqwest::Client;
use tracing::debug;

use crate::error::GeminiError;
use crate::types::*;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Used when an image response carries no usable `Content-Type`.
const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a client against the public endpoint.
    pub fn new() -> Result<Self, GeminiError> {
        Self::with_base_url(DEFAULT_BASE_URL, Duration::from_secs(60), Duration::from_secs(10))
    }

    /// Create a client against `base_url` with explicit timeouts.
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate content (non-streaming).
    pub async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        debug!("Gemini generate_content: model={}", model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<GeminiErrorBody>(&body) {
                Ok(e) => e.error.message,
                Err(_) if body.trim().is_empty() => status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
                Err(_) => body,
            };
            return Err(GeminiError::from_api_response(status.as_u16(), message));
        }

        serde_json::from_str(&body)
            .map_err(|e| GeminiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Load an image as base64 inline data.
    ///
    /// `data:` URLs are decoded in place, `http(s)` URLs are fetched and
    /// anything else is read as a local file.
    pub async fn fetch_image(&self, source: &str) -> Result<InlineData, GeminiError> {
        if let Some(inline) = parse_data_url(source) {
            return Ok(inline);
        }
        if !source.starts_with("http://") && !source.starts_with("https://") {
            return read_local_image(source).await;
        }

        debug!("Fetching image: {}", source);

        let fetch_error = |message: String| GeminiError::ImageFetch {
            url: source.to_string(),
            message,
        };

        let response = self
            .client
            .get(source)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status.as_u16())));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        Ok(InlineData {
            mime_type,
            data: base64::engine::general_purpose::STANDARD.encode(&bytes),
        })
    }
}

/// Read an image file, taking the mime type from its extension.
async fn read_local_image(source: &str) -> Result<InlineData, GeminiError> {
    let path = Path::new(source.strip_prefix("file://").unwrap_or(source));
    debug!("Reading image file: {}", path.display());

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| GeminiError::ImageFetch {
            url: source.to_string(),
            message: e.to_string(),
        })?;

    Ok(InlineData {
        mime_type: mime_type_for_path(path).to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(&bytes),
    })
}

fn mime_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Split `data:<mime>;base64,<payload>` into inline data.
fn parse_data_url(source: &str) -> Option<InlineData> {
    let rest = source.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime_type = meta.strip_suffix(";base64")?;

    Some(InlineData {
        mime_type: if mime_type.is_empty() {
            FALLBACK_MIME_TYPE.to_string()
        } else {
            mime_type.to_string()
        },
        data: payload.to_string(),
    })
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
