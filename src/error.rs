//! Error types for the shell builder.
//!
//! Only conditions that abort a whole build are represented here. Problems
//! with decorative assets or degenerate geometry are reported per page
//! through [`crate::compositor::DecorationReport`] instead.

use std::path::PathBuf;

/// Result type alias for shell builder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a shell build.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source document could not be opened or parsed
    #[error("Error opening input PDF {path}: {reason}")]
    SourceDocument {
        /// Path (or `<memory>`) of the source document
        path: PathBuf,
        /// Reason reported by the document loader
        reason: String,
    },

    /// A source page index outside `0..page_count`
    #[error("Page {index} out of range (document has {count} pages)")]
    PageOutOfRange {
        /// Requested page index
        index: usize,
        /// Number of pages in the source document
        count: usize,
    },

    /// The content of a source page could not be embedded
    #[error("Failed to embed content of page {page}: {reason}")]
    PageImport {
        /// Zero-based source page index
        page: usize,
        /// Reason for the failure
        reason: String,
    },

    /// Serializing the output document failed
    #[error("Error saving shell PDF: {0}")]
    Serialize(String),

    /// Configuration could not be read or parsed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_document_error() {
        let err = Error::SourceDocument {
            path: PathBuf::from("ticket.pdf"),
            reason: "invalid file header".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("ticket.pdf"));
        assert!(msg.contains("invalid file header"));
    }

    #[test]
    fn test_page_out_of_range_error() {
        let err = Error::PageOutOfRange { index: 3, count: 2 };
        let msg = format!("{}", err);
        assert!(msg.contains("Page 3"));
        assert!(msg.contains("2 pages"));
    }

    #[test]
    fn test_serialize_error() {
        let err = Error::Serialize("disk full".to_string());
        assert!(format!("{}", err).contains("disk full"));
    }

    #[test]
    fn test_config_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
