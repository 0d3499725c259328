//! Gemini analyzer errors.

use thiserror::Error;

use crate::key_pool::KeyPoolError;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini API error: {message}")]
    Api { status: u16, message: String },

    #[error("Gemini API error: rate limited: {0}")]
    RateLimited(String),

    #[error("Gemini API error: authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No response generated from Gemini API")]
    EmptyResponse,

    #[error("Failed to fetch image {url}: {message}")]
    ImageFetch { url: String, message: String },

    #[error(transparent)]
    KeyPool(#[from] KeyPoolError),
}

impl GeminiError {
    /// Classify a non-success API response.
    pub fn from_api_response(status: u16, message: String) -> Self {
        match status {
            401 | 403 => GeminiError::AuthenticationFailed(message),
            429 => GeminiError::RateLimited(message),
            _ => GeminiError::Api { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_response_auth() {
        let err = GeminiError::from_api_response(403, "API key not valid".to_string());
        assert!(matches!(err, GeminiError::AuthenticationFailed(_)));
    }

    #[test]
    fn test_from_api_response_rate_limited() {
        let err = GeminiError::from_api_response(429, "Resource exhausted".to_string());
        assert!(matches!(err, GeminiError::RateLimited(_)));
    }

    #[test]
    fn test_from_api_response_other() {
        let err = GeminiError::from_api_response(400, "Bad image".to_string());
        assert_eq!(err.to_string(), "Gemini API error: Bad image");
    }

    #[test]
    fn test_server_error_keeps_status() {
        let err = GeminiError::from_api_response(503, "Overloaded".to_string());
        assert!(matches!(err, GeminiError::Api { status: 503, .. }));
    }

    #[test]
    fn test_empty_response_message() {
        assert_eq!(
            GeminiError::EmptyResponse.to_string(),
            "No response generated from Gemini API"
        );
    }

    #[test]
    fn test_key_pool_error_transparent() {
        let err = GeminiError::from(KeyPoolError::NoActiveKeys);
        assert_eq!(err.to_string(), KeyPoolError::NoActiveKeys.to_string());
    }
}
