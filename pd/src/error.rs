//! Export error types

use thiserror::Error;

/// Errors that can occur while turning a document into bytes
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid {field} color '{value}': expected 6 hex digits")]
    InvalidTheme { field: &'static str, value: String },

    #[error("Failed to package document: {0}")]
    Package(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_theme_message() {
        let err = ExportError::InvalidTheme {
            field: "accent",
            value: "teal".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid accent color 'teal': expected 6 hex digits");
    }

    #[test]
    fn test_io_from() {
        let err: ExportError = std::io::Error::other("disk full").into();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
