//! Options for opening documents and splitting them into chapters.

/// Options controlling how a document is opened.
///
/// Provides sensible defaults for all settings. The size limit keeps a
/// stray multi-gigabyte file from being read into memory on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    /// Maximum input file size in bytes (default: 100 MiB, `None` = no limit).
    pub max_input_bytes: Option<u64>,
    /// Reject files whose name does not end in `.pdf`, case-insensitively
    /// (default: true).
    pub require_pdf_extension: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: Some(100 * 1024 * 1024),
            require_pdf_extension: true,
        }
    }
}

/// Options controlling the chapter splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    /// Replace chapter files that already exist in the output directory
    /// (default: false).
    pub overwrite: bool,
    /// Pull range ends that run past the last page back onto it
    /// (default: true).
    ///
    /// Detected chapters without a following sibling end a fixed number of
    /// pages after their start, which may overshoot short documents.
    pub clamp_to_document: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            clamp_to_document: true,
        }
    }
}
