//! Error types for pdfsplitter-rs.
//!
//! Provides [`BookmarkError`] for rejected bookmark-tree operations (always
//! recoverable, never leaving the tree half-modified) and [`DocumentError`]
//! for fatal document-level failures such as unreadable files or failed
//! saves.

use thiserror::Error;

use crate::bookmark::NodeId;
use crate::validation::RejectionCode;

/// Broad category of a [`BookmarkError`].
///
/// Both kinds are recoverable: the operation that produced them did not
/// touch the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input data: page out of bounds, empty or duplicate title.
    Validation,
    /// Illegal structural request: moving the root, creating a cycle, etc.
    Operation,
}

/// A rejected bookmark operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookmarkError {
    /// The target page lies outside `1..=total_pages`.
    #[error("page number {page} out of range (1-{total_pages})")]
    PageOutOfRange {
        /// The rejected 1-based page number.
        page: usize,
        /// Page count of the document.
        total_pages: usize,
    },

    /// The title is empty or whitespace only.
    #[error("bookmark title cannot be empty")]
    EmptyTitle,

    /// A sibling under the same parent already carries this title.
    #[error("duplicate bookmark title '{title}' at the same level")]
    DuplicateTitle {
        /// The conflicting title.
        title: String,
    },

    /// A page range whose start lies after its end.
    #[error("invalid page range: {start} > {end}")]
    InvalidRange {
        /// First page of the range.
        start: usize,
        /// Last page of the range (inclusive).
        end: usize,
    },

    #[error("cannot delete root bookmark")]
    CannotDeleteRoot,

    #[error("cannot move root bookmark")]
    CannotMoveRoot,

    /// Renaming or re-paging the synthetic root.
    #[error("cannot edit root bookmark")]
    CannotEditRoot,

    /// The node is detached from the tree (it has no parent).
    #[error("cannot delete bookmark with no parent")]
    OrphanNode,

    #[error("cannot move bookmark to itself")]
    SelfMove,

    #[error("cannot move bookmark to its own descendant")]
    DescendantMove,

    /// The id does not address a live node (never allocated, or deleted).
    #[error("unknown bookmark {0}")]
    UnknownNode(NodeId),

    /// The move validator rejected a drag-and-drop style move.
    #[error("move rejected: {message}")]
    MoveRejected {
        /// Machine-readable reason.
        code: RejectionCode,
        /// Human-readable reason.
        message: String,
    },
}

impl BookmarkError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookmarkError::PageOutOfRange { .. }
            | BookmarkError::EmptyTitle
            | BookmarkError::DuplicateTitle { .. }
            | BookmarkError::InvalidRange { .. } => ErrorKind::Validation,
            BookmarkError::CannotDeleteRoot
            | BookmarkError::CannotMoveRoot
            | BookmarkError::CannotEditRoot
            | BookmarkError::OrphanNode
            | BookmarkError::SelfMove
            | BookmarkError::DescendantMove
            | BookmarkError::UnknownNode(_)
            | BookmarkError::MoveRejected { .. } => ErrorKind::Operation,
        }
    }

    /// Returns `true` for validation errors (bad input data).
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

/// Fatal error types for document-level operations.
///
/// These errors stop the current load, save or split. The bookmark tree
/// held by the caller is never modified when one of them is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The file could not be opened as a PDF (missing, wrong type, corrupt).
    #[error("failed to load PDF: {0}")]
    Load(String),

    /// The outline could not be written back.
    #[error("failed to save bookmarks: {0}")]
    Save(String),

    /// I/O error reading or writing document data.
    #[error("I/O error: {0}")]
    Io(String),

    /// Error parsing PDF structure or syntax.
    #[error("parse error: {0}")]
    Parse(String),

    /// A page range that does not fit the document.
    #[error("invalid page range {start}-{end} for document with {page_count} pages")]
    InvalidPageRange {
        /// First page (0-based).
        start: usize,
        /// Last page (0-based, inclusive).
        end: usize,
        /// Page count of the document.
        page_count: usize,
    },

    /// A requested chapter range was rejected before anything was written.
    #[error("invalid chapter range '{name}': {message}")]
    InvalidChapterRange {
        /// Name of the offending chapter.
        name: String,
        /// Why the range was rejected.
        message: String,
    },

    /// A configured resource limit was exceeded.
    #[error("resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})")]
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_input_bytes").
        limit_name: String,
        /// The configured limit value.
        limit_value: u64,
        /// The actual value that exceeded the limit.
        actual_value: u64,
    },

    /// A long-running operation was cancelled by the caller.
    #[error("operation cancelled")]
    Cancelled,

    /// A bookmark operation failed while processing the document.
    #[error(transparent)]
    Bookmark(#[from] BookmarkError),
}

impl From<std::io::Error> for DocumentError {
    fn from(err: std::io::Error) -> Self {
        DocumentError::Io(err.to_string())
    }
}
