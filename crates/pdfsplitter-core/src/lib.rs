//! pdfsplitter-core: Backend-independent bookmark model and algorithms.
//!
//! This crate provides the bookmark hierarchy ([`BookmarkTree`],
//! [`BookmarkManager`]), drag-and-drop move validation ([`MoveValidator`]),
//! chapter range detection ([`BookmarkDetector`]) and the flat outline
//! formats exchanged with a document backend. It performs no I/O.

pub mod bookmark;
pub mod detection;
pub mod error;
pub mod manager;
pub mod outline;
pub mod tree;
pub mod validation;

pub use bookmark::{BookmarkLevel, BookmarkNode, NodeId};
pub use detection::{
    BookmarkDetector, ChapterTitlePattern, DEFAULT_FALLBACK_LEN, DetectedOutline,
    DetectionWarning, OutlineNode, PageRange, PatternMatcher,
};
pub use error::{BookmarkError, DocumentError, ErrorKind};
pub use manager::BookmarkManager;
pub use outline::{OutlineEntry, OutlineRecord, subtree_records, to_outline_records};
pub use tree::{Ancestors, BookmarkTree, PreOrder};
pub use validation::{DropPosition, MoveValidator, RejectionCode, ValidationResult};
