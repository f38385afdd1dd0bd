//! Flat outline representations exchanged with a document backend.
//!
//! A backend reads an outline as a list of [`OutlineEntry`] values (1-based
//! level and page) and writes one from a list of [`OutlineRecord`] values
//! (1-based level, 0-based page index). [`to_outline_records`] flattens a
//! [`BookmarkTree`]; [`BookmarkManager::from_outline`](crate::BookmarkManager::from_outline)
//! goes the other way.

use crate::bookmark::NodeId;
use crate::tree::BookmarkTree;

/// An outline item as read from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlineEntry {
    /// Nesting level (1 = top level).
    pub level: usize,
    /// Display text.
    pub title: String,
    /// 1-based page number.
    pub page: usize,
}

impl OutlineEntry {
    pub fn new(level: usize, title: impl Into<String>, page: usize) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}

/// An outline item ready to be written to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlineRecord {
    /// Nesting level derived from tree position (1 = top level).
    pub level: usize,
    /// Display text.
    pub title: String,
    /// 0-based page index.
    pub page_index: usize,
}

impl From<&OutlineRecord> for OutlineEntry {
    fn from(record: &OutlineRecord) -> Self {
        OutlineEntry {
            level: record.level,
            title: record.title.clone(),
            page: record.page_index + 1,
        }
    }
}

impl From<OutlineRecord> for OutlineEntry {
    fn from(record: OutlineRecord) -> Self {
        OutlineEntry {
            level: record.level,
            title: record.title,
            page: record.page_index + 1,
        }
    }
}

/// Flatten the whole tree in pre-order, skipping the root.
///
/// Levels come from tree position, not from the stored
/// [`BookmarkLevel`](crate::BookmarkLevel): the root's children are level 1
/// and every nesting step adds one. Pages become 0-based.
pub fn to_outline_records(tree: &BookmarkTree) -> Vec<OutlineRecord> {
    tree.iter()
        .filter_map(|(id, depth)| record_for(tree, id, depth))
        .collect()
}

/// Flatten the subtree rooted at `id` (inclusive), with `id` at level 1.
///
/// Unknown ids yield an empty list. Passing the root is the same as
/// [`to_outline_records`].
pub fn subtree_records(tree: &BookmarkTree, id: NodeId) -> Vec<OutlineRecord> {
    if id == tree.root() {
        return to_outline_records(tree);
    }
    let Some(base) = tree.get(id).map(|_| tree.depth(id)) else {
        return Vec::new();
    };
    std::iter::once(id)
        .chain(tree.descendants(id))
        .filter_map(|node| record_for(tree, node, tree.depth(node) + 1 - base))
        .collect()
}

fn record_for(tree: &BookmarkTree, id: NodeId, level: usize) -> Option<OutlineRecord> {
    let node = tree.get(id)?;
    Some(OutlineRecord {
        level,
        title: node.title.clone(),
        page_index: node.page.saturating_sub(1),
    })
}
