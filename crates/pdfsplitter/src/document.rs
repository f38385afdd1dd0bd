//! Top-level document handle.

use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use pdfsplitter_backend::{DocumentBackend, LopdfBackend};
use pdfsplitter_core::{
    BookmarkDetector, BookmarkManager, DetectedOutline, DocumentError, to_outline_records,
};

use crate::options::OpenOptions;

/// A PDF document opened for bookmark editing and chapter splitting.
///
/// Opening validates the file and reads its page count; every later
/// operation goes back to the file through the backend.
///
/// # Example
///
/// ```ignore
/// use pdfsplitter::PdfDocument;
///
/// let doc = PdfDocument::open("book.pdf")?;
/// let mut bookmarks = doc.load_bookmarks()?;
/// bookmarks.add_bookmark(3, "Preface", None, BookmarkLevel::H1)?;
/// doc.save_bookmarks(&mut bookmarks, None)?;
/// ```
#[derive(Debug)]
pub struct PdfDocument<B: DocumentBackend = LopdfBackend> {
    path: PathBuf,
    page_count: usize,
    backend: B,
}

impl PdfDocument<LopdfBackend> {
    /// Open a PDF file with default [`OpenOptions`] and the lopdf backend.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Load`] if the file is missing, is not a
    /// regular file or lacks a `.pdf` extension,
    /// [`DocumentError::ResourceLimitExceeded`] if it is larger than
    /// `max_input_bytes`, and a parse error if it is not a readable PDF.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        Self::open_with(path, &OpenOptions::default(), LopdfBackend::new())
    }
}

impl<B: DocumentBackend> PdfDocument<B> {
    /// Open a PDF file with explicit options and backend.
    pub fn open_with(
        path: impl AsRef<Path>,
        options: &OpenOptions,
        backend: B,
    ) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        check_file(path, options)?;
        let page_count = backend.page_count(path).map_err(Into::into)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), page_count, "opened document");

        Ok(Self {
            path: path.to_path_buf(),
            page_count,
            backend,
        })
    }

    /// Path the document was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// The backend this document reads through.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read the document outline into a fresh, unmodified [`BookmarkManager`].
    pub fn load_bookmarks(&self) -> Result<BookmarkManager, DocumentError> {
        let entries = self.backend.load_outline(&self.path).map_err(Into::into)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(entries = entries.len(), "loaded outline");

        Ok(BookmarkManager::from_outline(&entries, self.page_count))
    }

    /// Write `manager`'s tree as the document outline.
    ///
    /// With `output` naming a file other than the document's own, the
    /// document is first copied there and the copy is rewritten; the
    /// original stays untouched. An `output` that resolves to the document
    /// itself (another spelling, a symlink) is an in-place save. The manager's modified flag is cleared
    /// only when the write succeeds. Returns the path that was written.
    ///
    /// # Errors
    ///
    /// Every failure is reported as [`DocumentError::Save`]; a partially
    /// written save-as copy is removed.
    pub fn save_bookmarks(
        &self,
        manager: &mut BookmarkManager,
        output: Option<&Path>,
    ) -> Result<PathBuf, DocumentError> {
        let records = to_outline_records(manager.tree());
        let target = match output {
            Some(out) if !same_file(&self.path, out) => {
                fs::copy(&self.path, out).map_err(|e| {
                    DocumentError::Save(format!("cannot copy to {}: {e}", out.display()))
                })?;
                out.to_path_buf()
            }
            _ => self.path.clone(),
        };

        if let Err(err) = self.backend.save_outline(&target, &records) {
            if target != self.path {
                let _ = fs::remove_file(&target);
            }
            return Err(save_error(err.into()));
        }
        manager.clear_modified_flag();

        #[cfg(feature = "tracing")]
        tracing::info!(path = %target.display(), bookmarks = records.len(), "saved outline");

        Ok(target)
    }

    /// Detect chapter ranges with the default chapter-title pattern.
    pub fn detect_chapters(&self) -> Result<DetectedOutline, DocumentError> {
        self.detect_chapters_with(&BookmarkDetector::new())
    }

    /// Detect chapter ranges with a caller-configured detector.
    pub fn detect_chapters_with(
        &self,
        detector: &BookmarkDetector,
    ) -> Result<DetectedOutline, DocumentError> {
        let entries = self.backend.load_outline(&self.path).map_err(Into::into)?;
        let detected = detector.analyze(&entries);

        #[cfg(feature = "tracing")]
        {
            tracing::debug!(chapters = detected.chapter_ranges.len(), "detected chapters");
            for warning in &detected.warnings {
                tracing::warn!(%warning, "chapter detection");
            }
        }

        Ok(detected)
    }

    /// Write pages `start..=end` (0-based) to a new PDF at `output`.
    pub fn extract_pages(&self, start: usize, end: usize, output: &Path) -> Result<(), DocumentError> {
        self.extract_pages_with(start, end, output, &mut |_, _| ControlFlow::Continue(()))
    }

    /// Like [`extract_pages`](Self::extract_pages), reporting `(done, total)`
    /// after each backend step. Returning [`ControlFlow::Break`] cancels the extraction with
    /// [`DocumentError::Cancelled`].
    pub fn extract_pages_with(
        &self,
        start: usize,
        end: usize,
        output: &Path,
        on_step: &mut dyn FnMut(usize, usize) -> ControlFlow<()>,
    ) -> Result<(), DocumentError> {
        if start > end || end >= self.page_count {
            return Err(DocumentError::InvalidPageRange {
                start,
                end,
                page_count: self.page_count,
            });
        }
        self.backend
            .extract_page_range_with(&self.path, start, end, output, on_step)
            .map_err(Into::into)
    }
}

fn check_file(path: &Path, options: &OpenOptions) -> Result<(), DocumentError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            DocumentError::Load(format!("file not found: {}", path.display()))
        }
        _ => DocumentError::from(e),
    })?;
    if !metadata.is_file() {
        return Err(DocumentError::Load(format!("not a file: {}", path.display())));
    }
    if options.require_pdf_extension && !has_pdf_extension(path) {
        return Err(DocumentError::Load(format!("not a PDF file: {}", path.display())));
    }
    if let Some(max_bytes) = options.max_input_bytes {
        if metadata.len() > max_bytes {
            return Err(DocumentError::ResourceLimitExceeded {
                limit_name: "max_input_bytes".to_string(),
                limit_value: max_bytes,
                actual_value: metadata.len(),
            });
        }
    }
    Ok(())
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Whether `a` and `b` name the same file on disk.
fn same_file(a: &Path, b: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if let (Ok(ma), Ok(mb)) = (fs::metadata(a), fs::metadata(b)) {
            return ma.dev() == mb.dev() && ma.ino() == mb.ino();
        }
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn save_error(err: DocumentError) -> DocumentError {
    match err {
        DocumentError::Save(_) => err,
        other => DocumentError::Save(other.to_string()),
    }
}
