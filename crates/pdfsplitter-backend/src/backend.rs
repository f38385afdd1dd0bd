//! Document backend trait.
//!
//! Defines the [`DocumentBackend`] trait that abstracts the PDF operations the
//! bookmark editor and chapter splitter need: reading and rewriting the
//! outline, counting pages and extracting page ranges into new files.

use std::ops::ControlFlow;
use std::path::Path;

use pdfsplitter_core::{DocumentError, OutlineEntry, OutlineRecord};

/// Trait abstracting the document engine.
///
/// Every operation takes the document path; a backend may re-read the file
/// for each call.
///
/// # Associated Types
///
/// - `Error`: Backend-specific error type, convertible to [`DocumentError`].
///
/// # Usage
///
/// ```ignore
/// let pages = backend.page_count(path)?;
/// let entries = backend.load_outline(path)?;
/// backend.save_outline(path, &to_outline_records(manager.tree()))?;
/// backend.extract_page_range(path, 0, 3, Path::new("chapter1.pdf"))?;
/// ```
pub trait DocumentBackend {
    /// Backend-specific error type, convertible to [`DocumentError`].
    type Error: std::error::Error + Into<DocumentError>;

    /// Return the number of pages in the document.
    fn page_count(&self, path: &Path) -> Result<usize, Self::Error>;

    /// Read the outline as a flat pre-order list (1-based levels and pages).
    ///
    /// A document without an outline yields an empty list.
    fn load_outline(&self, path: &Path) -> Result<Vec<OutlineEntry>, Self::Error>;

    /// Replace the document's outline with `records` and write the document
    /// back to `path`. An empty list removes the outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or written; the file
    /// is left unchanged in that case.
    fn save_outline(&self, path: &Path, records: &[OutlineRecord]) -> Result<(), Self::Error>;

    /// Write pages `start..=end` (0-based) of the document to `output`.
    fn extract_page_range(
        &self,
        path: &Path,
        start: usize,
        end: usize,
        output: &Path,
    ) -> Result<(), Self::Error> {
        self.extract_page_range_with(path, start, end, output, &mut |_, _| {
            ControlFlow::Continue(())
        })
    }

    /// Like [`extract_page_range`](Self::extract_page_range), calling
    /// `on_step(done, total)` after each unit of work. What a step is depends
    /// on the backend; `done` counts up to `total`.
    ///
    /// When the callback returns [`ControlFlow::Break`] the extraction stops
    /// with a cancellation error and `output` is not written.
    fn extract_page_range_with(
        &self,
        path: &Path,
        start: usize,
        end: usize,
        output: &Path,
        on_step: &mut dyn FnMut(usize, usize) -> ControlFlow<()>,
    ) -> Result<(), Self::Error>;
}
