//! Bookmark node types.
//!
//! Provides [`BookmarkNode`] for a single entry of the editable bookmark
//! hierarchy, [`BookmarkLevel`] for its nesting level and [`NodeId`] for
//! addressing nodes inside a [`BookmarkTree`](crate::BookmarkTree) arena.

use std::fmt;

/// Stable identifier of a node inside a [`BookmarkTree`](crate::BookmarkTree).
///
/// Ids are arena indices. They are never reused, so an id that outlived its
/// node (after a delete) is reported as unknown instead of silently
/// addressing another bookmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Nesting level of a bookmark.
///
/// `Root` is reserved for the single sentinel root of a tree. Real
/// bookmarks use `H1` to `H4`; the numeric value (see [`value`](Self::value))
/// is what level rules compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BookmarkLevel {
    Root,
    #[default]
    H1,
    H2,
    H3,
    H4,
}

impl BookmarkLevel {
    /// Deepest level a bookmark can be stored at.
    pub const MAX: BookmarkLevel = BookmarkLevel::H4;

    /// Returns the numeric level (`Root` = 0, `H1` = 1, ... `H4` = 4).
    pub fn value(self) -> i32 {
        match self {
            BookmarkLevel::Root => 0,
            BookmarkLevel::H1 => 1,
            BookmarkLevel::H2 => 2,
            BookmarkLevel::H3 => 3,
            BookmarkLevel::H4 => 4,
        }
    }

    /// Converts a numeric level back into a `BookmarkLevel`.
    ///
    /// Returns `None` outside `0..=4`.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(BookmarkLevel::Root),
            1 => Some(BookmarkLevel::H1),
            2 => Some(BookmarkLevel::H2),
            3 => Some(BookmarkLevel::H3),
            4 => Some(BookmarkLevel::H4),
            _ => None,
        }
    }

    /// Level for a bookmark at the given tree depth (root children have
    /// depth 1). Depths past [`MAX`](Self::MAX) are capped; depth 0 maps to
    /// `H1` because only the sentinel may be `Root`.
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 | 1 => BookmarkLevel::H1,
            2 => BookmarkLevel::H2,
            3 => BookmarkLevel::H3,
            _ => BookmarkLevel::H4,
        }
    }
}

impl fmt::Display for BookmarkLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkLevel::Root => write!(f, "root"),
            other => write!(f, "H{}", other.value()),
        }
    }
}

/// A single bookmark in the hierarchy.
///
/// Ownership is strictly tree-shaped: a node belongs to the `children`
/// list of its parent. `parent` is a back-reference used for traversal only.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BookmarkNode {
    /// Display text. Empty only for the root.
    pub title: String,
    /// 1-based target page.
    pub page: usize,
    /// Stored nesting level.
    pub level: BookmarkLevel,
    /// Ordered child ids.
    pub children: Vec<NodeId>,
    /// Owning node, `None` for the root and for detached nodes.
    pub parent: Option<NodeId>,
    /// Local dirty marker. The manager's flag is authoritative.
    pub modified: bool,
}

impl BookmarkNode {
    /// Create a detached node with no children.
    pub fn new(title: impl Into<String>, page: usize, level: BookmarkLevel) -> Self {
        Self {
            title: title.into(),
            page,
            level,
            children: Vec::new(),
            parent: None,
            modified: false,
        }
    }

    /// The sentinel root node: empty title, page 1, level `Root`.
    pub fn root() -> Self {
        Self::new(String::new(), 1, BookmarkLevel::Root)
    }

    /// Returns `true` if this is the sentinel root.
    pub fn is_root(&self) -> bool {
        self.level == BookmarkLevel::Root
    }

    /// Returns `true` if the node has children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
