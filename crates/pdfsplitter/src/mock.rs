//! In-memory [`DocumentBackend`] used by the unit tests of this crate.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use pdfsplitter_backend::DocumentBackend;
use pdfsplitter_core::{DocumentError, OutlineEntry, OutlineRecord};

/// Documents are keyed by path; the files themselves only need to exist for
/// the open checks.
#[derive(Debug, Default)]
pub(crate) struct MockBackend {
    pub docs: RefCell<HashMap<PathBuf, (usize, Vec<OutlineEntry>)>>,
    pub extracted: RefCell<Vec<(PathBuf, usize, usize)>>,
    pub fail_save: bool,
}

impl MockBackend {
    pub fn with_doc(path: &Path, pages: usize, outline: Vec<OutlineEntry>) -> Self {
        let backend = Self::default();
        backend
            .docs
            .borrow_mut()
            .insert(path.to_path_buf(), (pages, outline));
        backend
    }

    fn doc(&self, path: &Path) -> Result<(usize, Vec<OutlineEntry>), DocumentError> {
        self.docs
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| DocumentError::Parse(format!("no such document: {}", path.display())))
    }
}

impl DocumentBackend for MockBackend {
    type Error = DocumentError;

    fn page_count(&self, path: &Path) -> Result<usize, Self::Error> {
        Ok(self.doc(path)?.0)
    }

    fn load_outline(&self, path: &Path) -> Result<Vec<OutlineEntry>, Self::Error> {
        Ok(self.doc(path)?.1)
    }

    fn save_outline(&self, path: &Path, records: &[OutlineRecord]) -> Result<(), Self::Error> {
        if self.fail_save {
            return Err(DocumentError::Io("disk full".to_string()));
        }
        // Save-as targets are fresh copies on disk; adopt the source's page count.
        let pages = match self.doc(path) {
            Ok((pages, _)) => pages,
            Err(_) => self
                .docs
                .borrow()
                .values()
                .next()
                .map(|(pages, _)| *pages)
                .unwrap_or(0),
        };
        let entries = records.iter().map(OutlineEntry::from).collect();
        self.docs
            .borrow_mut()
            .insert(path.to_path_buf(), (pages, entries));
        Ok(())
    }

    fn extract_page_range_with(
        &self,
        path: &Path,
        start: usize,
        end: usize,
        output: &Path,
        on_step: &mut dyn FnMut(usize, usize) -> ControlFlow<()>,
    ) -> Result<(), Self::Error> {
        let page_count = self.page_count(path)?;
        if start > end || end >= page_count {
            return Err(DocumentError::InvalidPageRange {
                start,
                end,
                page_count,
            });
        }
        // One step per page.
        let total = end - start + 1;
        for done in 1..=total {
            if on_step(done, total).is_break() {
                return Err(DocumentError::Cancelled);
            }
        }
        std::fs::write(output, b"%PDF-1.5 mock")?;
        self.extracted
            .borrow_mut()
            .push((output.to_path_buf(), start, end));
        Ok(())
    }
}

/// Create an (empty) `name` file in `dir` so the open checks pass.
pub(crate) fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.5").unwrap();
    path
}
