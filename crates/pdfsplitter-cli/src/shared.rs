use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use pdfsplitter::{BookmarkManager, BookmarkTree, NodeId, PdfDocument, SplitProgress};

/// Print `Error: {err}` to stderr and return exit code 1.
pub fn fail(err: impl Display) -> i32 {
    eprintln!("Error: {err}");
    1
}

/// Open a PDF file with user-friendly error messages.
pub fn open_document(file: &Path) -> Result<PdfDocument, i32> {
    PdfDocument::open(file).map_err(fail)
}

/// Open a PDF file and load its bookmark tree.
pub fn load_bookmarks(file: &Path) -> Result<(PdfDocument, BookmarkManager), i32> {
    let doc = open_document(file)?;
    let manager = doc.load_bookmarks().map_err(fail)?;
    Ok((doc, manager))
}

/// Split a bookmark path like "Chapter 1/Section 1.2" into titles.
///
/// `\/` stands for a `/` inside a title and `\\` for a backslash.
pub fn split_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ ('/' | '\\')) => current.push(next),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            '/' => segments.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    segments.push(current);
    segments
        .into_iter()
        .map(|segment| segment.trim().to_string())
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// The path that [`resolve_bookmark`] maps back to `id`.
///
/// Titles are escaped; the second and later of several siblings sharing a
/// title get a `#N` suffix.
pub fn bookmark_path(tree: &BookmarkTree, id: NodeId) -> String {
    let mut chain: Vec<NodeId> = tree.ancestors(id).filter(|&a| a != tree.root()).collect();
    chain.reverse();
    chain.push(id);

    let segments: Vec<String> = chain
        .into_iter()
        .filter_map(|node_id| {
            let title = &tree.get(node_id)?.title;
            let parent = tree.parent(node_id)?;
            let occurrence = tree
                .children(parent)
                .iter()
                .take_while(|&&sibling| sibling != node_id)
                .filter(|&&sibling| tree.get(sibling).is_some_and(|n| &n.title == title))
                .count()
                + 1;
            let escaped = title.replace('\\', "\\\\").replace('/', "\\/");
            Some(if occurrence > 1 {
                format!("{escaped}#{occurrence}")
            } else {
                escaped
            })
        })
        .collect();
    segments.join("/")
}

/// Resolve a bookmark path, failing when nothing matches.
pub fn resolve_bookmark(manager: &BookmarkManager, path: &str) -> Result<NodeId, i32> {
    let segments = split_path(path);
    if segments.is_empty() {
        return Err(fail("empty bookmark path"));
    }
    let tree = manager.tree();
    segments
        .iter()
        .try_fold(tree.root(), |parent, segment| find_child(tree, parent, segment))
        .ok_or_else(|| fail(format!("bookmark not found: {path}")))
}

/// A child titled `segment`, else the Nth child titled `title` for a
/// `title#N` segment.
fn find_child(tree: &BookmarkTree, parent: NodeId, segment: &str) -> Option<NodeId> {
    if let Some(id) = tree.child_by_title(parent, segment) {
        return Some(id);
    }
    let (title, occurrence) = segment.rsplit_once('#')?;
    let occurrence: usize = occurrence.parse().ok().filter(|&n| n >= 1)?;
    tree.children(parent)
        .iter()
        .copied()
        .filter(|&child| tree.get(child).is_some_and(|n| n.title == title))
        .nth(occurrence - 1)
}

/// Write the bookmark tree back (to `output` when given) and report where.
pub fn save_bookmarks(
    doc: &PdfDocument,
    manager: &mut BookmarkManager,
    output: Option<&Path>,
) -> Result<(), i32> {
    let written = doc.save_bookmarks(manager, output).map_err(fail)?;
    println!("Saved bookmarks to {}", written.display());
    Ok(())
}

/// A progress reporter that prints "Splitting NAME (i/n) p%" to stderr,
/// but only when stderr is connected to a TTY (terminal).
pub struct ProgressReporter {
    is_tty: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            is_tty: io::stderr().is_terminal(),
        }
    }

    pub fn report(&self, progress: &SplitProgress<'_>) {
        if self.is_tty {
            eprint!(
                "\rSplitting {} ({}/{}) {:>3}%",
                progress.chapter,
                progress.chapter_index + 1,
                progress.chapter_count,
                progress.percent()
            );
            let _ = io::stderr().flush();
        }
    }

    /// Clear the progress line (if TTY).
    pub fn finish(&self) {
        if self.is_tty {
            eprint!("\r{}\r", " ".repeat(60));
            let _ = io::stderr().flush();
        }
    }
}
