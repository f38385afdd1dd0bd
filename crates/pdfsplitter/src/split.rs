//! Chapter ranges, range validation and the chapter splitter.
//!
//! A split first checks every requested [`ChapterRange`] with a
//! [`RangeValidator`] and plans one output file per chapter. Nothing is
//! written unless the whole plan is valid. Extraction then runs chapter by
//! chapter, reporting [`SplitProgress`] and polling a [`CancelToken`]
//! between extraction steps.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pdfsplitter_backend::DocumentBackend;
use pdfsplitter_core::{DocumentError, PageRange};
use thiserror::Error;

use crate::document::PdfDocument;
use crate::options::SplitOptions;

/// A named, inclusive, 0-based page range to write as one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRange {
    /// Chapter name, also used for the output file name.
    pub name: String,
    /// First page (0-based).
    pub start: usize,
    /// Last page (0-based, inclusive).
    pub end: usize,
}

impl ChapterRange {
    pub fn new(name: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Number of pages covered, zero for an inverted range.
    pub fn page_count(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }
}

impl From<&PageRange> for ChapterRange {
    fn from(range: &PageRange) -> Self {
        Self::new(range.title.clone(), range.start, range.end)
    }
}

impl fmt::Display for ChapterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: Pages {}-{}", self.name, self.start + 1, self.end + 1)
    }
}

/// Why a chapter range was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeIssue {
    EmptyName,
    DuplicateName,
    StartGreaterThanEnd,
    PageOutOfBounds,
    RangeOverlap,
}

impl RangeIssue {
    /// Stable upper-case identifier, e.g. `RANGE_OVERLAP`.
    pub fn as_str(self) -> &'static str {
        match self {
            RangeIssue::EmptyName => "EMPTY_NAME",
            RangeIssue::DuplicateName => "DUPLICATE_NAME",
            RangeIssue::StartGreaterThanEnd => "START_GREATER_THAN_END",
            RangeIssue::PageOutOfBounds => "PAGE_OUT_OF_BOUNDS",
            RangeIssue::RangeOverlap => "RANGE_OVERLAP",
        }
    }
}

impl fmt::Display for RangeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected chapter range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RangeError {
    pub issue: RangeIssue,
    /// Name of the rejected chapter.
    pub name: String,
    pub message: String,
}

impl RangeError {
    fn new(issue: RangeIssue, name: &str, message: impl Into<String>) -> Self {
        Self {
            issue,
            name: name.to_string(),
            message: message.into(),
        }
    }
}

impl From<RangeError> for DocumentError {
    fn from(err: RangeError) -> Self {
        DocumentError::InvalidChapterRange {
            name: err.name,
            message: err.message,
        }
    }
}

/// Validates chapter ranges against the page count and the ranges accepted
/// so far.
///
/// The name is checked before the pages. Overlap is inclusive: ranges that
/// share a single page overlap.
#[derive(Debug, Clone)]
pub struct RangeValidator {
    max_pages: usize,
    existing: Vec<ChapterRange>,
}

impl RangeValidator {
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages,
            existing: Vec::new(),
        }
    }

    /// Start from an existing set of ranges.
    pub fn with_existing(max_pages: usize, existing: Vec<ChapterRange>) -> Self {
        Self {
            max_pages,
            existing,
        }
    }

    /// Ranges accepted so far.
    pub fn existing(&self) -> &[ChapterRange] {
        &self.existing
    }

    pub fn validate_name(&self, name: &str) -> Result<(), RangeError> {
        if name.trim().is_empty() {
            return Err(RangeError::new(
                RangeIssue::EmptyName,
                name,
                "Chapter name cannot be empty",
            ));
        }
        if self.existing.iter().any(|r| r.name == name) {
            return Err(RangeError::new(
                RangeIssue::DuplicateName,
                name,
                "A chapter with this name already exists",
            ));
        }
        Ok(())
    }

    pub fn validate_page_range(&self, name: &str, start: usize, end: usize) -> Result<(), RangeError> {
        if start > end {
            return Err(RangeError::new(
                RangeIssue::StartGreaterThanEnd,
                name,
                "Start page must be less than or equal to end page",
            ));
        }
        if end >= self.max_pages {
            return Err(RangeError::new(
                RangeIssue::PageOutOfBounds,
                name,
                format!("Pages must be between 1 and {}", self.max_pages),
            ));
        }
        if let Some(other) = self
            .existing
            .iter()
            .find(|r| start <= r.end && end >= r.start)
        {
            return Err(RangeError::new(
                RangeIssue::RangeOverlap,
                name,
                format!("Range overlaps with existing chapter '{}'", other.name),
            ));
        }
        Ok(())
    }

    /// Check name, then pages.
    pub fn validate(&self, range: &ChapterRange) -> Result<(), RangeError> {
        self.validate_name(&range.name)?;
        self.validate_page_range(&range.name, range.start, range.end)
    }

    /// Validate `range` and, when valid, accept it.
    pub fn push(&mut self, range: ChapterRange) -> Result<(), RangeError> {
        self.validate(&range)?;
        self.existing.push(range);
        Ok(())
    }
}

/// Shared flag for cooperative cancellation of a running split.
///
/// Clones share the flag, so a token handed to another thread (a signal
/// handler, a UI) can stop a split in progress.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Takes effect at the next extraction step.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress of a running split, reported after each backend step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitProgress<'a> {
    /// 0-based index of the chapter being written.
    pub chapter_index: usize,
    pub chapter_count: usize,
    /// Name of the chapter being written.
    pub chapter: &'a str,
    /// Steps of this chapter's extraction finished so far.
    pub steps_done: usize,
    /// Steps in this chapter's extraction.
    pub steps_total: usize,
}

impl SplitProgress<'_> {
    /// Overall completion in percent (0-100).
    pub fn percent(&self) -> usize {
        let chapters = self.chapter_count.max(1);
        let within = self.steps_done * 100 / self.steps_total.max(1);
        (self.chapter_index * 100 + within) / chapters
    }
}

/// Splits a document into one PDF per chapter range.
#[derive(Debug)]
pub struct ChapterSplitter<'a, B: DocumentBackend> {
    doc: &'a PdfDocument<B>,
    options: SplitOptions,
    cancel: CancelToken,
}

impl<'a, B: DocumentBackend> ChapterSplitter<'a, B> {
    pub fn new(doc: &'a PdfDocument<B>) -> Self {
        Self {
            doc,
            options: SplitOptions::default(),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_options(mut self, options: SplitOptions) -> Self {
        self.options = options;
        self
    }

    /// Poll `token` between extraction steps.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// A handle to this splitter's cancellation flag.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Clamp and validate `chapters` and pick an output file for each.
    ///
    /// Fails without touching the filesystem when any range is invalid, two
    /// chapters map to the same file, or (without `overwrite`) a target
    /// file already exists.
    pub fn plan(
        &self,
        chapters: &[ChapterRange],
        output_dir: &Path,
    ) -> Result<Vec<(ChapterRange, PathBuf)>, DocumentError> {
        let page_count = self.doc.page_count();
        let mut validator = RangeValidator::new(page_count);
        let mut files: HashMap<String, String> = HashMap::new();
        let mut plan = Vec::with_capacity(chapters.len());

        for chapter in chapters {
            let mut chapter = chapter.clone();
            if self.options.clamp_to_document && chapter.start < page_count {
                chapter.end = chapter.end.min(page_count - 1);
            }
            validator.push(chapter.clone())?;

            let file_name = format!("{}.pdf", sanitize_file_name(&chapter.name));
            if let Some(other) = files.get(&file_name) {
                return Err(DocumentError::InvalidChapterRange {
                    name: chapter.name.clone(),
                    message: format!("file name '{file_name}' is already used by '{other}'"),
                });
            }
            let path = output_dir.join(&file_name);
            if !self.options.overwrite && path.exists() {
                return Err(DocumentError::Io(format!(
                    "{} already exists",
                    path.display()
                )));
            }
            files.insert(file_name, chapter.name.clone());
            plan.push((chapter, path));
        }
        Ok(plan)
    }

    /// Write every chapter into `output_dir`, creating it when missing.
    ///
    /// Returns the written files in chapter order. On cancellation the
    /// chapters finished so far stay on disk and
    /// [`DocumentError::Cancelled`] is returned.
    pub fn split(
        &self,
        chapters: &[ChapterRange],
        output_dir: &Path,
        on_progress: &mut dyn FnMut(&SplitProgress<'_>),
    ) -> Result<Vec<PathBuf>, DocumentError> {
        let plan = self.plan(chapters, output_dir)?;
        fs::create_dir_all(output_dir)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            chapters = plan.len(),
            output_dir = %output_dir.display(),
            "splitting document"
        );

        let chapter_count = plan.len();
        let mut written = Vec::with_capacity(chapter_count);
        for (chapter_index, (chapter, path)) in plan.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(DocumentError::Cancelled);
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(chapter = %chapter, path = %path.display(), "extracting chapter");

            let mut on_step = |steps_done: usize, steps_total: usize| {
                if self.cancel.is_cancelled() {
                    return ControlFlow::Break(());
                }
                on_progress(&SplitProgress {
                    chapter_index,
                    chapter_count,
                    chapter: &chapter.name,
                    steps_done,
                    steps_total,
                });
                ControlFlow::Continue(())
            };
            self.doc
                .extract_pages_with(chapter.start, chapter.end, path, &mut on_step)?;
            written.push(path.clone());
        }

        #[cfg(feature = "tracing")]
        tracing::info!(files = written.len(), "split finished");

        Ok(written)
    }
}

impl<B: DocumentBackend> PdfDocument<B> {
    /// Split into one file per chapter with default [`SplitOptions`].
    pub fn split_chapters(
        &self,
        chapters: &[ChapterRange],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, DocumentError> {
        ChapterSplitter::new(self).split(chapters, output_dir, &mut |_| {})
    }

    /// Chapter ranges for every detected chapter.
    pub fn detected_chapter_ranges(&self) -> Result<Vec<ChapterRange>, DocumentError> {
        let detected = self.detect_chapters()?;
        Ok(detected
            .chapter_ranges
            .iter()
            .map(ChapterRange::from)
            .collect())
    }
}

/// Turn a chapter name into a portable file stem.
///
/// Path separators, characters reserved on Windows and control characters
/// become `_`; surrounding whitespace and trailing dots are dropped.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = replaced.trim().trim_end_matches('.').trim_end();
    if stem.is_empty() {
        "chapter".to_string()
    } else {
        stem.to_string()
    }
}
