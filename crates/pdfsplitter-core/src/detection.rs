//! Chapter range detection from a document outline.
//!
//! The detector builds a read-only [`OutlineNode`] tree from flat outline
//! entries and scans its top level with a registry of [`PatternMatcher`]s.
//! Each match yields a [`PageRange`] that runs up to the page before the next
//! top-level entry. All pages here are 0-based, ready for page extraction.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::BookmarkError;
use crate::outline::OutlineEntry;

/// Default number of pages after a chapter start when no next chapter
/// bounds it.
pub const DEFAULT_FALLBACK_LEN: usize = 10;

/// Title prefixes and leading tokens that mark a chapter heading:
/// `chapter`/`section`/`part` (any case), an all-digit first token such as
/// `"3 Methods"`, or a single letter with a period such as `"A. Appendix"`.
const CHAPTER_TITLE_PATTERN: &str =
    r"^(?i:chapter|section|part)|^\s*(?:\d+|\p{Alphabetic}\.)(?:\s|$)";

static CHAPTER_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(CHAPTER_TITLE_PATTERN).expect("chapter title pattern is a valid literal")
});

/// An inclusive, 0-based page range derived from the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRange {
    /// First page (0-based).
    pub start: usize,
    /// Last page (0-based, inclusive).
    pub end: usize,
    /// Title of the outline entry the range starts at.
    pub title: String,
    /// 0-based outline level of that entry.
    pub level: usize,
}

impl PageRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(
        start: usize,
        end: usize,
        title: impl Into<String>,
        level: usize,
    ) -> Result<Self, BookmarkError> {
        if start > end {
            return Err(BookmarkError::InvalidRange { start, end });
        }
        Ok(Self {
            start,
            end,
            title: title.into(),
            level,
        })
    }

    /// Number of pages covered.
    pub fn page_count(&self) -> usize {
        self.end - self.start + 1
    }

    /// Returns `true` if `page` (0-based) lies in the range.
    pub fn contains(&self, page: usize) -> bool {
        (self.start..=self.end).contains(&page)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (pages {}-{})", self.title, self.start + 1, self.end + 1)
    }
}

/// A node of the read-only detection tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlineNode {
    pub title: String,
    /// 0-based page index.
    pub page: usize,
    /// 0-based level; `-1` for the synthetic root.
    pub level: i32,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(title: impl Into<String>, page: usize, level: i32) -> Self {
        Self {
            title: title.into(),
            page,
            level,
            children: Vec::new(),
        }
    }

    fn root() -> Self {
        Self::new("Root", 0, -1)
    }

    fn at_path_mut(&mut self, path: &[usize]) -> &mut OutlineNode {
        path.iter()
            .fold(self, |node, &index| &mut node.children[index])
    }
}

/// A rule that recognizes chapter headings and computes their page range.
pub trait PatternMatcher: Send + Sync {
    /// Short identifier used in warnings and logs.
    fn name(&self) -> &str;

    /// Returns `true` if `node` starts a range this pattern handles.
    fn matches(&self, node: &OutlineNode) -> bool;

    /// Compute the range starting at `node`; `next` is the following
    /// top-level node, if any.
    fn extract_range(
        &self,
        node: &OutlineNode,
        next: Option<&OutlineNode>,
    ) -> Result<PageRange, BookmarkError>;
}

/// Matches conventional chapter titles such as `"Chapter 3"`, `"2 Methods"`
/// or `"B. Glossary"`.
#[derive(Debug, Clone)]
pub struct ChapterTitlePattern {
    fallback_len: usize,
}

impl Default for ChapterTitlePattern {
    fn default() -> Self {
        Self::new()
    }
}

impl ChapterTitlePattern {
    pub fn new() -> Self {
        Self {
            fallback_len: DEFAULT_FALLBACK_LEN,
        }
    }

    /// Use `len` pages past the start for a chapter with no successor.
    pub fn with_fallback_len(mut self, len: usize) -> Self {
        self.fallback_len = len;
        self
    }

    /// Returns `true` if `title` reads like a chapter heading.
    pub fn is_chapter_title(title: &str) -> bool {
        CHAPTER_TITLE_RE.is_match(title)
    }
}

impl PatternMatcher for ChapterTitlePattern {
    fn name(&self) -> &str {
        "chapter-title"
    }

    fn matches(&self, node: &OutlineNode) -> bool {
        Self::is_chapter_title(&node.title)
    }

    fn extract_range(
        &self,
        node: &OutlineNode,
        next: Option<&OutlineNode>,
    ) -> Result<PageRange, BookmarkError> {
        let start = node.page;
        let end = match next {
            Some(next) => next
                .page
                .checked_sub(1)
                .ok_or(BookmarkError::InvalidRange { start, end: 0 })?,
            None => start + self.fallback_len,
        };
        PageRange::new(start, end, node.title.clone(), node.level.max(0) as usize)
    }
}

/// A pattern that matched but could not produce a range.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectionWarning {
    /// Name of the pattern that failed.
    pub pattern: String,
    /// Title of the outline entry.
    pub title: String,
    /// 0-based page of the outline entry.
    pub page: usize,
    pub message: String,
}

impl fmt::Display for DetectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: '{}' (page {}): {}",
            self.pattern,
            self.title,
            self.page + 1,
            self.message
        )
    }
}

/// Result of analyzing an outline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectedOutline {
    /// The detection tree.
    pub root: OutlineNode,
    /// Ranges in outline order.
    pub chapter_ranges: Vec<PageRange>,
    /// Non-fatal problems met while scanning.
    pub warnings: Vec<DetectionWarning>,
}

/// Detects chapter ranges with an ordered registry of patterns.
///
/// For each top-level node the first matching pattern wins.
pub struct BookmarkDetector {
    patterns: Vec<Box<dyn PatternMatcher>>,
}

impl Default for BookmarkDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BookmarkDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.patterns.iter().map(|p| p.name()).collect();
        f.debug_struct("BookmarkDetector")
            .field("patterns", &names)
            .finish()
    }
}

impl BookmarkDetector {
    /// A detector with [`ChapterTitlePattern`] registered.
    pub fn new() -> Self {
        Self::with_patterns(vec![Box::new(ChapterTitlePattern::new())])
    }

    /// A detector with the given patterns, tried in order.
    pub fn with_patterns(patterns: Vec<Box<dyn PatternMatcher>>) -> Self {
        Self { patterns }
    }

    /// Register another pattern after the existing ones.
    pub fn add_pattern(&mut self, pattern: Box<dyn PatternMatcher>) {
        self.patterns.push(pattern);
    }

    /// Build the detection tree from outline entries (1-based level and
    /// page). An entry attaches to the nearest preceding entry with a lower
    /// level.
    pub fn build_tree(&self, entries: &[OutlineEntry]) -> OutlineNode {
        let mut root = OutlineNode::root();
        // Child indices from the root to the current open node, with levels.
        let mut path: Vec<usize> = Vec::new();
        let mut levels: Vec<i32> = Vec::new();

        for entry in entries {
            let level = entry.level as i32 - 1;
            while levels.last().is_some_and(|&open| open >= level) {
                levels.pop();
                path.pop();
            }
            let parent = root.at_path_mut(&path);
            parent.children.push(OutlineNode::new(
                entry.title.clone(),
                entry.page.saturating_sub(1),
                level,
            ));
            path.push(parent.children.len() - 1);
            levels.push(level);
        }
        root
    }

    /// Ranges for every top-level node some pattern recognizes.
    pub fn detect_ranges(&self, root: &OutlineNode) -> Vec<PageRange> {
        self.scan(root).0
    }

    /// Build the tree and detect ranges, keeping the warnings.
    pub fn analyze(&self, entries: &[OutlineEntry]) -> DetectedOutline {
        let root = self.build_tree(entries);
        let (chapter_ranges, warnings) = self.scan(&root);
        DetectedOutline {
            root,
            chapter_ranges,
            warnings,
        }
    }

    fn scan(&self, root: &OutlineNode) -> (Vec<PageRange>, Vec<DetectionWarning>) {
        let mut ranges = Vec::new();
        let mut warnings = Vec::new();
        let top = &root.children;

        for (i, node) in top.iter().enumerate() {
            // Later patterns get a chance when an earlier match cannot
            // produce a range; the first failure is reported only if none can.
            let mut first_failure = None;
            let mut found = None;
            for pattern in self.patterns.iter().filter(|p| p.matches(node)) {
                match pattern.extract_range(node, top.get(i + 1)) {
                    Ok(range) => {
                        found = Some(range);
                        break;
                    }
                    Err(err) if first_failure.is_none() => {
                        first_failure = Some((pattern.name().to_string(), err));
                    }
                    Err(_) => {}
                }
            }
            match (found, first_failure) {
                (Some(range), _) => ranges.push(range),
                (None, Some((pattern, err))) => warnings.push(DetectionWarning {
                    pattern,
                    title: node.title.clone(),
                    page: node.page,
                    message: err.to_string(),
                }),
                (None, None) => {}
            }
        }
        (ranges, warnings)
    }
}
