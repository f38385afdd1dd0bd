//! pdfsplitter: Edit PDF bookmarks and split documents into chapter files.
//!
//! This is the public API facade crate for pdfsplitter-rs. It re-exports the
//! bookmark model from pdfsplitter-core and drives a
//! [`DocumentBackend`](pdfsplitter_backend::DocumentBackend) (lopdf by
//! default) for everything that touches a file.
//!
//! # Architecture
//!
//! - **pdfsplitter-core**: Bookmark tree, move validation, chapter detection
//! - **pdfsplitter-backend**: Document backend trait and lopdf implementation
//! - **pdfsplitter** (this crate): [`PdfDocument`] and the [`ChapterSplitter`]
//!
//! # Example
//!
//! ```ignore
//! use pdfsplitter::{ChapterRange, PdfDocument};
//!
//! let doc = PdfDocument::open("book.pdf")?;
//! let chapters = doc.detected_chapter_ranges()?;
//! doc.split_chapters(&chapters, "chapters".as_ref())?;
//! ```

mod document;
#[cfg(test)]
mod mock;
mod options;
mod split;

pub use document::PdfDocument;
pub use options::{OpenOptions, SplitOptions};
pub use split::{
    CancelToken, ChapterRange, ChapterSplitter, RangeError, RangeIssue, RangeValidator,
    SplitProgress, sanitize_file_name,
};

pub use pdfsplitter_backend::{BackendError, DocumentBackend, LopdfBackend};
pub use pdfsplitter_core::{
    BookmarkDetector, BookmarkError, BookmarkLevel, BookmarkManager, BookmarkNode, BookmarkTree,
    ChapterTitlePattern, DetectedOutline, DetectionWarning, DocumentError, DropPosition,
    ErrorKind, MoveValidator, NodeId, OutlineEntry, OutlineRecord, PageRange, PatternMatcher,
    RejectionCode, ValidationResult, to_outline_records,
};

pub use pdfsplitter_backend;
pub use pdfsplitter_core;
