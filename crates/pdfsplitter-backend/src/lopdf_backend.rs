//! lopdf-based document backend.
//!
//! Implements [`DocumentBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate. This is the default backend for pdfsplitter-rs.

use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat, dictionary};
use pdfsplitter_core::{OutlineEntry, OutlineRecord};
use tempfile::NamedTempFile;

use crate::backend::DocumentBackend;
use crate::error::BackendError;

/// Nesting limit when walking `/First` links.
const MAX_OUTLINE_DEPTH: usize = 64;
/// Safety limit on siblings at one outline level.
const MAX_SIBLINGS: usize = 10_000;
/// Limit on reference hops while resolving a destination.
const MAX_DEST_HOPS: usize = 8;
/// Limit on `/Kids` nesting in a name tree.
const MAX_NAME_TREE_DEPTH: usize = 32;
/// Progress steps of one extraction: load, remove pages, serialize.
const EXTRACT_STEPS: usize = 3;

/// Page number (1-based) to page object, as returned by [`Document::get_pages`].
type PageMap = BTreeMap<u32, ObjectId>;

/// The lopdf-based document backend.
///
/// Each call reads the document from disk, so the backend itself holds no
/// state.
///
/// # Example
///
/// ```ignore
/// use pdfsplitter_backend::{DocumentBackend, LopdfBackend};
///
/// let backend = LopdfBackend::new();
/// let count = backend.page_count(Path::new("book.pdf"))?;
/// let outline = backend.load_outline(Path::new("book.pdf"))?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse the document at `path`.
    pub fn load_document(&self, path: &Path) -> Result<Document, BackendError> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    /// Parse PDF bytes. Encrypted documents are rejected.
    pub fn parse(bytes: &[u8]) -> Result<Document, BackendError> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
        if doc.is_encrypted() {
            return Err(BackendError::Encrypted);
        }
        Ok(doc)
    }

    /// Flatten the outline of a parsed document.
    ///
    /// Walks the `/Outlines` tree through `/First` and `/Next` links. Items
    /// whose destination cannot be resolved point at page 1.
    pub fn read_outline(doc: &Document) -> Vec<OutlineEntry> {
        let first = outline_root(doc).and_then(|root| match root.get(b"First") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        });
        let Some(first) = first else {
            return Vec::new();
        };

        let pages = doc.get_pages();
        let mut visited = HashSet::new();
        let mut entries = Vec::new();
        walk_outline(doc, first, 1, &pages, &mut visited, &mut entries);
        entries
    }

    /// Replace the outline of a parsed document with `records`.
    ///
    /// Items get `/Dest [page /Fit]`; a page index past the end points at the
    /// last page. All items are written open. An empty list removes the
    /// outline from the catalog.
    pub fn write_outline(doc: &mut Document, records: &[OutlineRecord]) -> Result<(), BackendError> {
        let catalog_id = catalog_id(doc)?;
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

        if records.is_empty() {
            catalog_mut(doc, catalog_id)?.remove(b"Outlines");
            doc.prune_objects();
            return Ok(());
        }

        let links = OutlineLinks::build(records);
        let root_id = doc.new_object_id();
        let ids: Vec<ObjectId> = records.iter().map(|_| doc.new_object_id()).collect();

        for (i, record) in records.iter().enumerate() {
            let mut item = dictionary! {
                "Title" => encode_text_string(&record.title),
                "Parent" => links.parent[i].map_or(root_id, |p| ids[p]),
            };
            if let Some(prev) = links.prev[i] {
                item.set("Prev", ids[prev]);
            }
            if let Some(next) = links.next[i] {
                item.set("Next", ids[next]);
            }
            if let (Some(&first), Some(&last)) = (links.children[i].first(), links.children[i].last())
            {
                item.set("First", ids[first]);
                item.set("Last", ids[last]);
                item.set("Count", links.descendants[i] as i64);
            }
            if let Some(&page_id) = page_ids.get(record.page_index).or(page_ids.last()) {
                item.set(
                    "Dest",
                    vec![Object::Reference(page_id), Object::Name(b"Fit".to_vec())],
                );
            }
            doc.objects.insert(ids[i], Object::Dictionary(item));
        }

        let mut outlines = dictionary! {
            "Type" => "Outlines",
            "Count" => records.len() as i64,
        };
        if let (Some(&first), Some(&last)) = (links.top.first(), links.top.last()) {
            outlines.set("First", ids[first]);
            outlines.set("Last", ids[last]);
        }
        doc.objects.insert(root_id, Object::Dictionary(outlines));

        let catalog = catalog_mut(doc, catalog_id)?;
        catalog.set("Outlines", root_id);
        catalog.set("PageMode", "UseOutlines");
        // Drop the objects of the previous outline.
        doc.prune_objects();
        Ok(())
    }

    /// Reduce a parsed document to pages `start..=end` (0-based).
    ///
    /// The outline is dropped because its destinations may point at removed
    /// pages.
    pub fn retain_pages(doc: &mut Document, start: usize, end: usize) -> Result<(), BackendError> {
        let pages = doc.get_pages();
        let page_count = pages.len();
        if start > end || end >= page_count {
            return Err(BackendError::InvalidPage {
                start,
                end,
                page_count,
            });
        }

        let keep = (start as u32 + 1)..=(end as u32 + 1);
        let removed: Vec<u32> = pages
            .keys()
            .copied()
            .filter(|number| !keep.contains(number))
            .collect();
        doc.delete_pages(&removed);

        let catalog_id = catalog_id(doc)?;
        catalog_mut(doc, catalog_id)?.remove(b"Outlines");
        doc.prune_objects();
        Ok(())
    }

    /// Serialize `doc` into memory.
    pub fn serialize(doc: &mut Document) -> Result<Vec<u8>, BackendError> {
        let mut buf = Vec::new();
        doc.save_to(&mut buf)
            .map_err(|e| BackendError::Write(format!("failed to serialize PDF: {e}")))?;
        Ok(buf)
    }

    /// Serialize `doc` and write it to `path`.
    pub fn write_document(doc: &mut Document, path: &Path) -> Result<(), BackendError> {
        let bytes = Self::serialize(doc)?;
        write_atomic(path, &bytes)
    }
}

/// Replace `path` with `bytes` through a temporary file in the same
/// directory, so `path` holds either its old or its new content.
///
/// A symlinked `path` is resolved and its target replaced. An existing file
/// keeps its permissions.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
    let write_error = |e: std::io::Error| BackendError::Write(format!("{}: {e}", path.display()));

    let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(bytes).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;
    if let Ok(metadata) = std::fs::metadata(&target) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_error)?;
    }
    tmp.persist(&target).map_err(|e| write_error(e.error))?;
    Ok(())
}

impl DocumentBackend for LopdfBackend {
    type Error = BackendError;

    fn page_count(&self, path: &Path) -> Result<usize, Self::Error> {
        Ok(self.load_document(path)?.get_pages().len())
    }

    fn load_outline(&self, path: &Path) -> Result<Vec<OutlineEntry>, Self::Error> {
        let doc = self.load_document(path)?;
        let entries = Self::read_outline(&doc);
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), entries = entries.len(), "loaded outline");
        Ok(entries)
    }

    fn save_outline(&self, path: &Path, records: &[OutlineRecord]) -> Result<(), Self::Error> {
        let mut doc = self.load_document(path)?;
        Self::write_outline(&mut doc, records)?;
        Self::write_document(&mut doc, path)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), records = records.len(), "saved outline");
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
        let mut doc = self.load_document(path)?;
        let mut step = |done: usize| match on_step(done, EXTRACT_STEPS) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => Err(BackendError::Cancelled),
        };
        step(1)?;
        Self::retain_pages(&mut doc, start, end)?;
        step(2)?;
        let bytes = Self::serialize(&mut doc)?;
        step(3)?;
        write_atomic(output, &bytes)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            source = %path.display(),
            output = %output.display(),
            start,
            end,
            "extracted page range"
        );
        Ok(())
    }
}

/// Sibling and parent links of a flat pre-order outline.
struct OutlineLinks {
    parent: Vec<Option<usize>>,
    prev: Vec<Option<usize>>,
    next: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    /// Total number of descendants of each item.
    descendants: Vec<usize>,
    top: Vec<usize>,
}

impl OutlineLinks {
    fn build(records: &[OutlineRecord]) -> Self {
        let n = records.len();
        let mut parent = Vec::with_capacity(n);
        let mut open: Vec<(usize, usize)> = Vec::new();
        for (i, record) in records.iter().enumerate() {
            while open.last().is_some_and(|&(level, _)| level >= record.level) {
                open.pop();
            }
            parent.push(open.last().map(|&(_, index)| index));
            open.push((record.level, i));
        }

        let mut children = vec![Vec::new(); n];
        let mut top = Vec::new();
        for (i, p) in parent.iter().enumerate() {
            match p {
                Some(p) => children[*p].push(i),
                None => top.push(i),
            }
        }

        let mut prev = vec![None; n];
        let mut next = vec![None; n];
        for list in children.iter().chain(std::iter::once(&top)) {
            for pair in list.windows(2) {
                next[pair[0]] = Some(pair[1]);
                prev[pair[1]] = Some(pair[0]);
            }
        }

        // Children follow their parent in pre-order, so a reverse pass sees
        // every subtree before its root.
        let mut descendants = vec![0; n];
        for i in (0..n).rev() {
            if let Some(p) = parent[i] {
                descendants[p] += descendants[i] + 1;
            }
        }

        Self {
            parent,
            prev,
            next,
            children,
            descendants,
            top,
        }
    }
}

/// Recursively walk outline items starting at `first`, appending entries.
fn walk_outline(
    doc: &Document,
    first: ObjectId,
    level: usize,
    pages: &PageMap,
    visited: &mut HashSet<ObjectId>,
    entries: &mut Vec<OutlineEntry>,
) {
    if level > MAX_OUTLINE_DEPTH {
        return;
    }

    let mut current = Some(first);
    let mut sibling_count = 0;

    while let Some(item_id) = current {
        // Circular reference protection
        if !visited.insert(item_id) || sibling_count >= MAX_SIBLINGS {
            break;
        }
        sibling_count += 1;

        let Some(item) = doc.get_object(item_id).ok().and_then(|o| o.as_dict().ok()) else {
            break;
        };

        let title = text_entry(doc, item, b"Title").unwrap_or_default();
        let page_index = resolve_item_page(doc, item, pages);
        #[cfg(feature = "tracing")]
        if page_index.is_none() {
            tracing::debug!(title = %title, "outline item without resolvable destination");
        }
        entries.push(OutlineEntry::new(
            level,
            title,
            page_index.map_or(1, |index| index + 1),
        ));

        if let Ok(Object::Reference(child)) = item.get(b"First") {
            walk_outline(doc, *child, level + 1, pages, visited, entries);
        }

        current = match item.get(b"Next") {
            Ok(Object::Reference(next)) => Some(*next),
            _ => None,
        };
    }
}

/// Resolve an outline item's target to a 0-based page index.
///
/// Checks `/Dest` first, then a `/A` GoTo action.
fn resolve_item_page(doc: &Document, item: &Dictionary, pages: &PageMap) -> Option<usize> {
    if let Some(page) = item
        .get(b"Dest")
        .ok()
        .and_then(|dest| resolve_dest(doc, dest, pages, 0))
    {
        return Some(page);
    }

    let action = resolve(doc, item.get(b"A").ok()?)?.as_dict().ok()?;
    match action.get(b"S") {
        Ok(Object::Name(kind)) if kind.as_slice() == b"GoTo" => {
            resolve_dest(doc, action.get(b"D").ok()?, pages, 0)
        }
        _ => None,
    }
}

/// Resolve an explicit or named destination to a 0-based page index.
fn resolve_dest(doc: &Document, dest: &Object, pages: &PageMap, hops: usize) -> Option<usize> {
    if hops > MAX_DEST_HOPS {
        return None;
    }
    match resolve(doc, dest)? {
        // [page_ref /Fit ...] or [page_number /Fit ...]
        Object::Array(arr) => match arr.first()? {
            Object::Reference(page_id) => pages
                .iter()
                .find(|&(_, id)| id == page_id)
                .map(|(&number, _)| number as usize - 1),
            Object::Integer(index) => usize::try_from(*index)
                .ok()
                .filter(|&index| index < pages.len()),
            _ => None,
        },
        // Entry of a /Dests dictionary or name tree: << /D [...] >>
        Object::Dictionary(dict) => resolve_dest(doc, dict.get(b"D").ok()?, pages, hops + 1),
        Object::String(bytes, _) => named_dest(doc, &decode_text_string(bytes), pages, hops + 1),
        Object::Name(name) => named_dest(doc, &String::from_utf8_lossy(name), pages, hops + 1),
        _ => None,
    }
}

/// Look up a named destination in `/Names /Dests`, then in the catalog's
/// `/Dests` dictionary.
fn named_dest(doc: &Document, name: &str, pages: &PageMap, hops: usize) -> Option<usize> {
    let catalog = catalog(doc)?;

    let from_tree = catalog
        .get(b"Names")
        .ok()
        .and_then(|names| resolve(doc, names))
        .and_then(|names| names.as_dict().ok())
        .and_then(|names| names.get(b"Dests").ok())
        .and_then(|dests| resolve(doc, dests))
        .and_then(|dests| dests.as_dict().ok())
        .and_then(|tree| lookup_name_tree(doc, tree, name, 0));
    if let Some(page) = from_tree.and_then(|value| resolve_dest(doc, value, pages, hops + 1)) {
        return Some(page);
    }

    let dests = resolve(doc, catalog.get(b"Dests").ok()?)?.as_dict().ok()?;
    resolve_dest(doc, dests.get(name.as_bytes()).ok()?, pages, hops + 1)
}

/// Find the value stored under `name` in a PDF name tree.
fn lookup_name_tree<'a>(
    doc: &'a Document,
    node: &'a Dictionary,
    name: &str,
    depth: usize,
) -> Option<&'a Object> {
    if depth > MAX_NAME_TREE_DEPTH {
        return None;
    }

    // Leaf: [key1 value1 key2 value2 ...]
    if let Some(names) = node
        .get(b"Names")
        .ok()
        .and_then(|names| resolve(doc, names))
        .and_then(|names| names.as_array().ok())
    {
        let found = names.chunks_exact(2).find_map(|pair| match resolve(doc, &pair[0]) {
            Some(Object::String(key, _)) if decode_text_string(key) == name => Some(&pair[1]),
            _ => None,
        });
        if found.is_some() {
            return found;
        }
    }

    let kids = resolve(doc, node.get(b"Kids").ok()?)?.as_array().ok()?;
    kids.iter()
        .filter_map(|kid| resolve(doc, kid).and_then(|kid| kid.as_dict().ok()))
        .find_map(|kid| lookup_name_tree(doc, kid, name, depth + 1))
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn catalog(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Root").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn catalog_id(doc: &Document) -> Result<ObjectId, BackendError> {
    doc.trailer
        .get(b"Root")
        .and_then(|root| root.as_reference())
        .map_err(|e| BackendError::Parse(format!("missing document catalog: {e}")))
}

fn catalog_mut(doc: &mut Document, id: ObjectId) -> Result<&mut Dictionary, BackendError> {
    doc.get_object_mut(id)
        .and_then(|catalog| catalog.as_dict_mut())
        .map_err(|e| BackendError::Parse(format!("invalid document catalog: {e}")))
}

fn outline_root(doc: &Document) -> Option<&Dictionary> {
    resolve(doc, catalog(doc)?.get(b"Outlines").ok()?)?
        .as_dict()
        .ok()
}

/// Read a text entry, handling both string and name objects.
fn text_entry(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    match resolve(doc, dict.get(key).ok()?)? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, else UTF-8, else Latin-1.
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Encode a PDF text string: a literal for ASCII, UTF-16BE with BOM otherwise.
fn encode_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Create a minimal valid PDF document with the given number of pages.
///
/// Each page is US Letter size (612 x 792 points) with no content.
#[cfg(test)]
fn create_test_document(page_count: usize) -> (Document, Vec<ObjectId>) {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let mut page_ids = Vec::new();
    for _ in 0..page_count {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
            "Count" => page_count as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    (doc, page_ids)
}

#[cfg(test)]
fn save_test_document(doc: &mut Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}
