//! Error types for the document backend layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`BackendError`]
//! that wraps backend-specific errors and converts them to [`DocumentError`].

use pdfsplitter_core::DocumentError;
use thiserror::Error;

/// Error type for document backend operations.
///
/// Wraps backend-specific errors and provides conversion to
/// [`DocumentError`] for unified error handling across the library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading or writing document data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is encrypted and cannot be edited.
    #[error("document is encrypted")]
    Encrypted,

    /// A page range outside the document.
    #[error("page range {start}-{end} outside document with {page_count} pages")]
    InvalidPage {
        /// First page (0-based).
        start: usize,
        /// Last page (0-based, inclusive).
        end: usize,
        /// Page count of the document.
        page_count: usize,
    },

    /// Error writing the modified document.
    #[error("write error: {0}")]
    Write(String),

    /// The progress callback asked to stop.
    #[error("operation cancelled")]
    Cancelled,
}

impl From<BackendError> for DocumentError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => DocumentError::Parse(msg),
            BackendError::Io(e) => DocumentError::Io(e.to_string()),
            BackendError::Encrypted => DocumentError::Load("document is encrypted".to_string()),
            BackendError::InvalidPage {
                start,
                end,
                page_count,
            } => DocumentError::InvalidPageRange {
                start,
                end,
                page_count,
            },
            BackendError::Write(msg) => DocumentError::Save(msg),
            BackendError::Cancelled => DocumentError::Cancelled,
        }
    }
}
