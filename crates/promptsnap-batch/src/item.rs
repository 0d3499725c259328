//! Work items and per-item results.

use serde::{Deserialize, Serialize};

/// One image to analyze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Identifier the result is keyed by (usually the page URL).
    pub id: String,
    /// Human-readable label reported through progress callbacks.
    #[serde(default)]
    pub label: String,
    /// Reference handed to the analyzer (image URL, thumbnail, data URL).
    pub source: String,
}

impl WorkItem {
    /// Create a new work item.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            source: source.into(),
        }
    }

    /// Item whose identifier, label and source are the same URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: url.clone(),
            label: url.clone(),
            source: url,
        }
    }
}

/// Outcome of one item.
///
/// Exactly one of `value` and `error` is set, matching `success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub item_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchResult {
    /// Successful result carrying the analyzer's text.
    pub fn success(item_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            success: true,
            value: Some(value.into()),
            error: None,
        }
    }

    /// Failed result carrying the last error message.
    pub fn failure(item_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            success: false,
            value: None,
            error: Some(error.into()),
        }
    }

    /// View the result as a `Result` of the value or the error message.
    pub fn outcome(&self) -> Result<&str, &str> {
        if self.success {
            Ok(self.value.as_deref().unwrap_or_default())
        } else {
            Err(self.error.as_deref().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_from_url() {
        let item = WorkItem::from_url("https://example.com/a.jpg");
        assert_eq!(item.id, item.source);
        assert_eq!(item.label, "https://example.com/a.jpg");
    }

    #[test]
    fn test_work_item_deserialize_without_label() {
        let item: WorkItem =
            serde_json::from_str(r#"{"id": "page-1", "source": "thumb.jpg"}"#).unwrap();
        assert_eq!(item.id, "page-1");
        assert!(item.label.is_empty());
    }

    #[test]
    fn test_result_success_sets_value_only() {
        let result = BatchResult::success("a", "a prompt");
        assert!(result.success);
        assert_eq!(result.value.as_deref(), Some("a prompt"));
        assert!(result.error.is_none());
        assert_eq!(result.outcome(), Ok("a prompt"));
    }

    #[test]
    fn test_result_failure_sets_error_only() {
        let result = BatchResult::failure("a", "boom");
        assert!(!result.success);
        assert!(result.value.is_none());
        assert_eq!(result.outcome(), Err("boom"));
    }

    #[test]
    fn test_result_serialization_skips_missing_field() {
        let json = serde_json::to_string(&BatchResult::failure("a", "boom")).unwrap();
        assert!(json.contains("\"error\":\"boom\""));
        assert!(!json.contains("value"));
    }
}
