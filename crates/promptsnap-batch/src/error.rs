//! Batch errors.

use thiserror::Error;

/// Errors that abort a whole batch run.
///
/// Individual item failures never show up here; they are recorded in the
/// item's [`BatchResult`](crate::BatchResult).
#[derive(Debug, Error)]
pub enum BatchError {
    /// The options cannot form a single chunk or attempt.
    #[error("Invalid batch configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = BatchError::InvalidConfig("max_concurrent must be at least 1".to_string());
        let display = err.to_string();
        assert!(display.contains("Invalid batch configuration"));
        assert!(display.contains("max_concurrent"));
    }

    #[test]
    fn test_error_debug() {
        let err = BatchError::InvalidConfig("x".to_string());
        assert!(format!("{:?}", err).contains("InvalidConfig"));
    }
}
