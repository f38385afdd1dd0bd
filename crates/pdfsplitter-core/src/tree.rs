//! Arena-backed bookmark tree.
//!
//! [`BookmarkTree`] stores every [`BookmarkNode`] in a flat arena addressed
//! by [`NodeId`]. Parent and child links are ids, so the hierarchy has no
//! owning back-references. The tree always contains exactly one sentinel
//! root node.

use crate::bookmark::{BookmarkNode, NodeId};
use crate::error::BookmarkError;

/// An arena of bookmark nodes rooted at a single sentinel.
///
/// `BookmarkTree` only offers read access publicly; structural changes go
/// through [`BookmarkManager`](crate::BookmarkManager), which validates
/// before mutating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkTree {
    /// Node slots. `None` marks a slot freed by a delete; slots are never reused.
    nodes: Vec<Option<BookmarkNode>>,
    root: NodeId,
}

impl Default for BookmarkTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BookmarkTree {
    /// Create a tree holding only the sentinel root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(BookmarkNode::root())],
            root: NodeId(0),
        }
    }

    /// Id of the sentinel root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a live node.
    pub fn get(&self, id: NodeId) -> Option<&BookmarkNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Look up a live node, failing with [`BookmarkError::UnknownNode`].
    pub fn node(&self, id: NodeId) -> Result<&BookmarkNode, BookmarkError> {
        self.get(id).ok_or(BookmarkError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut BookmarkNode, BookmarkError> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(BookmarkError::UnknownNode(id))
    }

    /// Returns `true` if `id` addresses a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live bookmarks, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count() - 1
    }

    /// Returns `true` if the tree holds no bookmarks besides the root.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ordered children of `id`; empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of `id`, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Iterate over the ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
            remaining: self.nodes.len(),
        }
    }

    /// Returns `true` if `node` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Depth of `id` below the root (root = 0, its children = 1).
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Position of `id` inside its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// All nodes below `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Pre-order walk over every bookmark (root excluded) with its depth.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: self
                .children(self.root)
                .iter()
                .rev()
                .map(|&c| (c, 1))
                .collect(),
        }
    }

    /// Titles from the top level down to `id`.
    pub fn title_path(&self, id: NodeId) -> Vec<&str> {
        let mut path: Vec<&str> = self
            .ancestors(id)
            .filter(|&a| a != self.root)
            .filter_map(|a| self.get(a).map(|n| n.title.as_str()))
            .collect();
        path.reverse();
        if let Some(node) = self.get(id) {
            if id != self.root {
                path.push(node.title.as_str());
            }
        }
        path
    }

    /// Find the child of `parent` with the given title.
    pub fn child_by_title(&self, parent: NodeId, title: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|n| n.title == title))
    }

    // --- Mutation primitives (callers validate first) ---

    /// Store a detached node and return its id.
    pub(crate) fn alloc(&mut self, node: BookmarkNode) -> NodeId {
        self.nodes.push(Some(node));
        NodeId(self.nodes.len() - 1)
    }

    /// Link `child` under `parent` at `index` (append when `None` or past the end).
    pub(crate) fn attach(
        &mut self,
        parent: NodeId,
        index: Option<usize>,
        child: NodeId,
    ) -> Result<(), BookmarkError> {
        self.node(child)?;
        let siblings = &mut self.node_mut(parent)?.children;
        let at = index.unwrap_or(siblings.len()).min(siblings.len());
        siblings.insert(at, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Unlink `id` from its parent, returning the former parent.
    pub(crate) fn detach(&mut self, id: NodeId) -> Result<Option<NodeId>, BookmarkError> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.retain(|&c| c != id);
        }
        self.node_mut(id)?.parent = None;
        Ok(parent)
    }

    /// Free the slots of `id` and all of its descendants. The node must
    /// already be detached.
    pub(crate) fn free_subtree(&mut self, id: NodeId) {
        for node in self.descendants(id) {
            self.nodes[node.0] = None;
        }
        if let Some(slot) = self.nodes.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Mutable access to every live node.
    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut BookmarkNode> {
        self.nodes.iter_mut().flatten()
    }
}

/// Iterator over the ancestors of a node. Created by [`BookmarkTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a BookmarkTree,
    next: Option<NodeId>,
    /// Upper bound on steps; a well-formed tree never reaches it.
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over `(id, depth)` pairs. Created by [`BookmarkTree::iter`].
pub struct PreOrder<'a> {
    tree: &'a BookmarkTree,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        self.stack.extend(
            self.tree
                .children(id)
                .iter()
                .rev()
                .map(|&c| (c, depth + 1)),
        );
        Some((id, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::BookmarkLevel;

    /// root → A(1) → [A1(2) → [A1a(3)], A2(4)], B(5)
    fn sample() -> (BookmarkTree, [NodeId; 5]) {
        let mut tree = BookmarkTree::new();
        let root = tree.root();
        let a = tree.alloc(BookmarkNode::new("A", 1, BookmarkLevel::H1));
        let a1 = tree.alloc(BookmarkNode::new("A1", 2, BookmarkLevel::H2));
        let a1a = tree.alloc(BookmarkNode::new("A1a", 3, BookmarkLevel::H3));
        let a2 = tree.alloc(BookmarkNode::new("A2", 4, BookmarkLevel::H2));
        let b = tree.alloc(BookmarkNode::new("B", 5, BookmarkLevel::H1));
        tree.attach(root, None, a).unwrap();
        tree.attach(a, None, a1).unwrap();
        tree.attach(a1, None, a1a).unwrap();
        tree.attach(a, None, a2).unwrap();
        tree.attach(root, None, b).unwrap();
        (tree, [a, a1, a1a, a2, b])
    }

    #[test]
    fn new_tree_has_only_root() {
        let tree = BookmarkTree::new();
        assert!(tree.is_empty());
        assert!(tree.get(tree.root()).unwrap().is_root());
        assert!(tree.children(tree.root()).is_empty());
    }

    #[test]
    fn len_excludes_root() {
        let (tree, _) = sample();
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn ancestors_nearest_first() {
        let (tree, [a, a1, a1a, _, _]) = sample();
        let ancestors: Vec<NodeId> = tree.ancestors(a1a).collect();
        assert_eq!(ancestors, vec![a1, a, tree.root()]);
    }

    #[test]
    fn descendant_checks_are_strict() {
        let (tree, [a, a1, a1a, _, b]) = sample();
        assert!(tree.is_descendant_of(a1a, a));
        assert!(tree.is_descendant_of(a1, a));
        assert!(!tree.is_descendant_of(a, a));
        assert!(!tree.is_descendant_of(b, a));
    }

    #[test]
    fn depth_counts_from_root() {
        let (tree, [a, a1, a1a, _, _]) = sample();
        assert_eq!(tree.depth(tree.root()), 0);
        assert_eq!(tree.depth(a), 1);
        assert_eq!(tree.depth(a1), 2);
        assert_eq!(tree.depth(a1a), 3);
    }

    #[test]
    fn preorder_walk_with_depths() {
        let (tree, [a, a1, a1a, a2, b]) = sample();
        let walk: Vec<(NodeId, usize)> = tree.iter().collect();
        assert_eq!(walk, vec![(a, 1), (a1, 2), (a1a, 3), (a2, 2), (b, 1)]);
    }

    #[test]
    fn descendants_preorder() {
        let (tree, [a, a1, a1a, a2, _]) = sample();
        assert_eq!(tree.descendants(a), vec![a1, a1a, a2]);
    }

    #[test]
    fn title_path_from_top() {
        let (tree, [_, _, a1a, _, _]) = sample();
        assert_eq!(tree.title_path(a1a), vec!["A", "A1", "A1a"]);
        assert!(tree.title_path(tree.root()).is_empty());
    }

    #[test]
    fn detach_and_attach_at_index() {
        let (mut tree, [a, _, _, a2, b]) = sample();
        let old = tree.detach(b).unwrap();
        assert_eq!(old, Some(tree.root()));
        assert!(tree.parent(b).is_none());
        tree.attach(a, Some(0), b).unwrap();
        assert_eq!(tree.children(a)[0], b);
        assert_eq!(tree.index_in_parent(a2), Some(2));
    }

    #[test]
    fn freed_ids_become_unknown() {
        let (mut tree, [a, a1, a1a, _, _]) = sample();
        tree.detach(a1).unwrap();
        tree.free_subtree(a1);
        assert!(!tree.contains(a1));
        assert!(!tree.contains(a1a));
        assert_eq!(tree.node(a1a), Err(BookmarkError::UnknownNode(a1a)));
        assert_eq!(tree.children(a).len(), 1);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn child_by_title_lookup() {
        let (tree, [a, a1, _, _, _]) = sample();
        assert_eq!(tree.child_by_title(a, "A1"), Some(a1));
        assert_eq!(tree.child_by_title(a, "missing"), None);
    }
}
