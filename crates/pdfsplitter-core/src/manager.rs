//! Bookmark hierarchy manager.
//!
//! [`BookmarkManager`] owns a [`BookmarkTree`] together with the page count
//! of the document it belongs to. Every mutation validates its input first
//! and only then touches the tree, so a failed call leaves both the tree and
//! the modified flag as they were.

use crate::bookmark::{BookmarkLevel, BookmarkNode, NodeId};
use crate::error::BookmarkError;
use crate::outline::OutlineEntry;
use crate::tree::BookmarkTree;
use crate::validation::{DropPosition, MoveValidator};

type Result<T> = std::result::Result<T, BookmarkError>;

/// Editable bookmark hierarchy of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkManager {
    tree: BookmarkTree,
    total_pages: usize,
    modified: bool,
}

impl BookmarkManager {
    /// Create an empty manager for a document with `total_pages` pages.
    pub fn new(total_pages: usize) -> Self {
        Self {
            tree: BookmarkTree::new(),
            total_pages,
            modified: false,
        }
    }

    /// Rebuild a hierarchy from outline entries read from a document.
    ///
    /// Loading is lenient: pages are clamped into `1..=total_pages`, level 0
    /// is read as 1, an entry that jumps more than one level deeper attaches
    /// to the deepest open bookmark, and duplicate sibling titles are kept.
    /// Stored levels are derived from depth. The result is not modified.
    pub fn from_outline(entries: &[OutlineEntry], total_pages: usize) -> Self {
        let mut manager = Self::new(total_pages);
        let root = manager.tree.root();
        // open[d] is the most recent node at depth d + 1.
        let mut open: Vec<NodeId> = Vec::new();

        for entry in entries {
            let level = entry.level.max(1);
            open.truncate(level - 1);
            let parent = open.last().copied().unwrap_or(root);
            let depth = open.len() + 1;

            let page = entry.page.clamp(1, total_pages.max(1));
            let node = BookmarkNode::new(
                entry.title.clone(),
                page,
                BookmarkLevel::from_depth(depth),
            );
            let id = manager.tree.alloc(node);
            if manager.tree.attach(parent, None, id).is_ok() {
                open.push(id);
            }
        }
        manager
    }

    /// The underlying tree.
    pub fn tree(&self) -> &BookmarkTree {
        &self.tree
    }

    /// Look up a live bookmark.
    pub fn node(&self, id: NodeId) -> Result<&BookmarkNode> {
        self.tree.node(id)
    }

    /// Page count of the document.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Returns `true` if the hierarchy changed since load or the last save.
    pub fn modified(&self) -> bool {
        self.modified
    }

    /// Reset the modified flag, including the per-node markers.
    pub fn clear_modified_flag(&mut self) {
        self.modified = false;
        for node in self.tree.nodes_mut() {
            node.modified = false;
        }
    }

    /// Top-level bookmarks, in order.
    pub fn get_bookmarks(&self) -> Vec<NodeId> {
        self.tree.children(self.tree.root()).to_vec()
    }

    /// Add a bookmark under `parent` (the root when `None`), appended after
    /// the existing children.
    ///
    /// `BookmarkLevel::Root` is not a valid bookmark level; it is replaced by
    /// the level matching the new node's depth.
    pub fn add_bookmark(
        &mut self,
        page: usize,
        title: &str,
        parent: Option<NodeId>,
        level: BookmarkLevel,
    ) -> Result<NodeId> {
        self.check_page(page)?;
        check_title(title)?;
        let parent = parent.unwrap_or(self.tree.root());
        self.tree.node(parent)?;
        self.check_unique_title(parent, title, None)?;

        let level = match level {
            BookmarkLevel::Root => BookmarkLevel::from_depth(self.tree.depth(parent) + 1),
            other => other,
        };
        let mut node = BookmarkNode::new(title, page, level);
        node.modified = true;
        let id = self.tree.alloc(node);
        self.tree.attach(parent, None, id)?;
        self.modified = true;
        Ok(id)
    }

    /// Remove a bookmark together with its whole subtree.
    pub fn delete_bookmark(&mut self, node: NodeId) -> Result<()> {
        if node == self.tree.root() {
            return Err(BookmarkError::CannotDeleteRoot);
        }
        if self.tree.node(node)?.parent.is_none() {
            return Err(BookmarkError::OrphanNode);
        }
        self.tree.detach(node)?;
        self.tree.free_subtree(node);
        self.modified = true;
        Ok(())
    }

    /// Reparent `node` as the last child of `new_parent` (the root when
    /// `None`). When `new_level` is given it overwrites the node's stored
    /// level; descendants keep theirs.
    pub fn move_bookmark(
        &mut self,
        node: NodeId,
        new_parent: Option<NodeId>,
        new_level: Option<BookmarkLevel>,
    ) -> Result<()> {
        let new_parent = new_parent.unwrap_or(self.tree.root());
        self.check_relocation(node, new_parent)?;
        let title = self.tree.node(node)?.title.clone();
        self.check_unique_title(new_parent, &title, Some(node))?;

        self.tree.detach(node)?;
        self.tree.attach(new_parent, None, node)?;
        let moved = self.tree.node_mut(node)?;
        if let Some(level) = new_level.filter(|l| *l != BookmarkLevel::Root) {
            moved.level = level;
        }
        moved.modified = true;
        self.modified = true;
        Ok(())
    }

    /// Validate and perform a drag-and-drop move.
    ///
    /// `Inside` appends `source` under `target`; `Before`/`After` insert it
    /// next to `target` under `target`'s parent. The moved node's level
    /// becomes the validated new level. Returns the level change.
    pub fn apply_move(
        &mut self,
        source: NodeId,
        target: NodeId,
        position: DropPosition,
    ) -> Result<i32> {
        let level_change = MoveValidator::new()
            .validate_move(&self.tree, source, target, position)
            .into_result()?;

        let (parent, placement) = match position {
            DropPosition::Inside => (target, None),
            DropPosition::Before | DropPosition::After => {
                let parent = self.tree.parent(target).ok_or(BookmarkError::OrphanNode)?;
                (parent, Some(position))
            }
        };
        let title = self.tree.node(source)?.title.clone();
        self.check_unique_title(parent, &title, Some(source))?;
        let new_level = BookmarkLevel::from_value(self.tree.node(source)?.level.value() + level_change)
            .unwrap_or(BookmarkLevel::MAX);

        self.tree.detach(source)?;
        // Index is computed after detaching so removing source cannot shift it.
        let index = match placement {
            None => None,
            Some(position) => {
                let at = self.tree.index_in_parent(target).unwrap_or(0);
                Some(if position == DropPosition::After { at + 1 } else { at })
            }
        };
        self.tree.attach(parent, index, source)?;
        let moved = self.tree.node_mut(source)?;
        moved.level = new_level;
        moved.modified = true;
        self.modified = true;
        Ok(level_change)
    }

    /// Change the title of a bookmark.
    pub fn rename_bookmark(&mut self, node: NodeId, title: &str) -> Result<()> {
        if node == self.tree.root() {
            return Err(BookmarkError::CannotEditRoot);
        }
        check_title(title)?;
        let parent = self.tree.node(node)?.parent;
        if let Some(parent) = parent {
            self.check_unique_title(parent, title, Some(node))?;
        }
        let target = self.tree.node_mut(node)?;
        target.title = title.to_string();
        target.modified = true;
        self.modified = true;
        Ok(())
    }

    /// Point a bookmark at another page.
    pub fn set_bookmark_page(&mut self, node: NodeId, page: usize) -> Result<()> {
        if node == self.tree.root() {
            return Err(BookmarkError::CannotEditRoot);
        }
        self.check_page(page)?;
        let target = self.tree.node_mut(node)?;
        target.page = page;
        target.modified = true;
        self.modified = true;
        Ok(())
    }

    /// Resolve a bookmark by its title path from the top level.
    ///
    /// An empty path resolves to the root.
    pub fn find_by_path(&self, path: &[&str]) -> Option<NodeId> {
        path.iter().try_fold(self.tree.root(), |current, title| {
            self.tree.child_by_title(current, title)
        })
    }

    /// Rewrite every stored level from tree depth (capped at H4).
    ///
    /// Returns how many bookmarks changed. Sets the modified flag only when
    /// something changed.
    pub fn normalize_levels(&mut self) -> usize {
        let updates: Vec<(NodeId, BookmarkLevel)> = self
            .tree
            .iter()
            .map(|(id, depth)| (id, BookmarkLevel::from_depth(depth)))
            .filter(|&(id, level)| self.tree.get(id).is_some_and(|n| n.level != level))
            .collect();
        for &(id, level) in &updates {
            if let Ok(node) = self.tree.node_mut(id) {
                node.level = level;
                node.modified = true;
            }
        }
        if !updates.is_empty() {
            self.modified = true;
        }
        updates.len()
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page < 1 || page > self.total_pages {
            return Err(BookmarkError::PageOutOfRange {
                page,
                total_pages: self.total_pages,
            });
        }
        Ok(())
    }

    fn check_unique_title(&self, parent: NodeId, title: &str, ignore: Option<NodeId>) -> Result<()> {
        let clash = self
            .tree
            .children(parent)
            .iter()
            .filter(|&&c| Some(c) != ignore)
            .any(|&c| self.tree.get(c).is_some_and(|n| n.title == title));
        if clash {
            return Err(BookmarkError::DuplicateTitle {
                title: title.to_string(),
            });
        }
        Ok(())
    }

    fn check_relocation(&self, node: NodeId, new_parent: NodeId) -> Result<()> {
        if node == self.tree.root() {
            return Err(BookmarkError::CannotMoveRoot);
        }
        self.tree.node(node)?;
        self.tree.node(new_parent)?;
        if node == new_parent {
            return Err(BookmarkError::SelfMove);
        }
        if self.tree.is_descendant_of(new_parent, node) {
            return Err(BookmarkError::DescendantMove);
        }
        Ok(())
    }
}

fn check_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(BookmarkError::EmptyTitle);
    }
    Ok(())
}
