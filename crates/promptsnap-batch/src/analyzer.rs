//! Analyzer contract consumed by the batch processor.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single analysis attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AnalyzeError {
    message: String,
}

impl AnalyzeError {
    /// Create an error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Capture the display text of another error.
    pub fn from_error<E: std::error::Error + ?Sized>(error: &E) -> Self {
        Self::new(error.to_string())
    }

    /// The message recorded in failed results.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for AnalyzeError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for AnalyzeError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Turns one image reference into text.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze `source` using the style named by `variation`.
    async fn analyze(&self, source: &str, variation: &str) -> Result<String, AnalyzeError>;
}

#[async_trait]
impl<T: Analyzer + ?Sized> Analyzer for Arc<T> {
    async fn analyze(&self, source: &str, variation: &str) -> Result<String, AnalyzeError> {
        self.as_ref().analyze(source, variation).await
    }
}

/// Adapts an async closure into an [`Analyzer`].
///
/// ```rust
/// use promptsnap_batch::{AnalyzeError, FnAnalyzer};
///
/// let analyzer = FnAnalyzer::new(|source: String, variation: String| async move {
///     Ok::<_, AnalyzeError>(format!("{variation}: {source}"))
/// });
/// # let _ = analyzer;
/// ```
pub struct FnAnalyzer<F> {
    func: F,
}

impl<F> FnAnalyzer<F> {
    /// Wrap `func`.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F, Fut> Analyzer for FnAnalyzer<F>
where
    F: Fn(String, String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, AnalyzeError>> + Send,
{
    async fn analyze(&self, source: &str, variation: &str) -> Result<String, AnalyzeError> {
        (self.func)(source.to_string(), variation.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_error_message() {
        let err = AnalyzeError::new("Gemini API error: quota");
        assert_eq!(err.message(), "Gemini API error: quota");
        assert_eq!(err.to_string(), "Gemini API error: quota");
    }

    #[test]
    fn test_analyze_error_from_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = AnalyzeError::from_error(&io);
        assert_eq!(err.message(), "disk gone");
    }

    #[tokio::test]
    async fn test_fn_analyzer() {
        let analyzer = FnAnalyzer::new(|source: String, variation: String| async move {
            Ok::<_, AnalyzeError>(format!("{}:{}", variation, source))
        });
        let text = analyzer.analyze("img.png", "creative").await.unwrap();
        assert_eq!(text, "creative:img.png");
    }

    #[tokio::test]
    async fn test_arc_analyzer() {
        let analyzer: Arc<dyn Analyzer> = Arc::new(FnAnalyzer::new(
            |_: String, _: String| async { Err(AnalyzeError::from("nope")) },
        ));
        let err = analyzer.analyze("a", "b").await.unwrap_err();
        assert_eq!(err.message(), "nope");
    }
}
