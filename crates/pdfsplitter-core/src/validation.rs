//! Drag-and-drop move validation.
//!
//! [`MoveValidator`] decides whether a bookmark can be dropped before,
//! after or inside another one. It follows PDF outline rules:
//!
//! 1. The root never moves and a node never moves into its own subtree.
//! 2. A level may change by at most one step between a parent and its
//!    children and between adjacent siblings.
//! 3. Pages stay in ascending order among siblings of the same level.
//!
//! A rejection is an ordinary [`ValidationResult`] value, not an error.

use std::fmt;

use crate::bookmark::{BookmarkLevel, BookmarkNode, NodeId};
use crate::error::BookmarkError;
use crate::tree::BookmarkTree;

/// Where a dragged bookmark lands relative to the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DropPosition {
    /// Sibling of the target, placed just before it.
    Before,
    /// Sibling of the target, placed just after it.
    After,
    /// Last child of the target.
    Inside,
}

impl fmt::Display for DropPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropPosition::Before => write!(f, "before"),
            DropPosition::After => write!(f, "after"),
            DropPosition::Inside => write!(f, "inside"),
        }
    }
}

/// Machine-readable reason for a rejected move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectionCode {
    /// Source or target is not a live node.
    UnknownNode,
    CannotMoveRoot,
    SelfMove,
    /// Target lies inside the source's subtree.
    DescendantMove,
    /// BEFORE/AFTER relative to the root, or relative to a detached node.
    InvalidTarget,
    /// Source would jump more than one level.
    LevelJump,
    /// A nesting deeper than [`BookmarkLevel::MAX`] would be needed.
    MaxDepth,
    /// An existing child of the target would be more than one level away.
    ChildLevelJump,
    /// The neighbouring sibling would be more than one level away.
    AdjacentLevelJump,
    /// Another bookmark at the same nesting already points at the page.
    DuplicatePage,
    /// Siblings would no longer be in ascending page order.
    PageOrder,
}

impl RejectionCode {
    /// Returns the string tag for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionCode::UnknownNode => "UNKNOWN_NODE",
            RejectionCode::CannotMoveRoot => "CANNOT_MOVE_ROOT",
            RejectionCode::SelfMove => "SELF_MOVE",
            RejectionCode::DescendantMove => "DESCENDANT_MOVE",
            RejectionCode::InvalidTarget => "INVALID_TARGET",
            RejectionCode::LevelJump => "LEVEL_JUMP",
            RejectionCode::MaxDepth => "MAX_DEPTH",
            RejectionCode::ChildLevelJump => "CHILD_LEVEL_JUMP",
            RejectionCode::AdjacentLevelJump => "ADJACENT_LEVEL_JUMP",
            RejectionCode::DuplicatePage => "DUPLICATE_PAGE",
            RejectionCode::PageOrder => "PAGE_ORDER",
        }
    }
}

impl fmt::Display for RejectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating a move.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationResult {
    /// Whether the move may be applied.
    pub valid: bool,
    /// Human-readable explanation.
    pub message: String,
    /// `new_level - source.level` for a valid move; `None` when rejected.
    pub level_change: Option<i32>,
    /// Reason for a rejection; `None` when valid.
    pub code: Option<RejectionCode>,
}

impl ValidationResult {
    /// A successful validation.
    pub fn accept(message: impl Into<String>, level_change: i32) -> Self {
        Self {
            valid: true,
            message: message.into(),
            level_change: Some(level_change),
            code: None,
        }
    }

    /// A rejected validation.
    pub fn reject(code: RejectionCode, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            level_change: None,
            code: Some(code),
        }
    }

    /// Returns `true` if the move may be applied.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Convert into a `Result`, yielding the level change on success and
    /// [`BookmarkError::MoveRejected`] otherwise.
    pub fn into_result(self) -> Result<i32, BookmarkError> {
        match (self.valid, self.code) {
            (true, _) => Ok(self.level_change.unwrap_or(0)),
            (false, code) => Err(BookmarkError::MoveRejected {
                code: code.unwrap_or(RejectionCode::InvalidTarget),
                message: self.message,
            }),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{code}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Short-circuiting check: `Err` carries the rejection.
type Check<T> = Result<T, ValidationResult>;

const LEVEL_STEP_MSG: &str = "Level can only change by 1 between adjacent bookmarks";
const PAGE_ORDER_MSG: &str = "Move would violate page order";

/// Validates bookmark moves for drag-and-drop reordering.
///
/// The validator is stateless; it only reads the tree. Checks run in a
/// fixed order (structure, levels, page order) and stop at the first
/// failure.
///
/// # Example
///
/// ```ignore
/// let result = MoveValidator::new().validate_move(manager.tree(), src, dst, DropPosition::After);
/// if result.valid {
///     manager.apply_move(src, dst, DropPosition::After)?;
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveValidator;

impl MoveValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate moving `source` relative to `target`.
    ///
    /// On success the result carries `level_change = new_level -
    /// source.level`, where the new level is `target.level + 1` for
    /// [`DropPosition::Inside`] and `target.level` otherwise.
    pub fn validate_move(
        &self,
        tree: &BookmarkTree,
        source: NodeId,
        target: NodeId,
        position: DropPosition,
    ) -> ValidationResult {
        match self.run(tree, source, target, position) {
            Ok(level_change) => ValidationResult::accept("Move operation valid", level_change),
            Err(rejection) => rejection,
        }
    }

    /// Check only the page-order rule for a move.
    ///
    /// Pages must stay ascending among siblings of the same level. Equal
    /// pages are allowed at both boundaries.
    pub fn validate_page_order(
        &self,
        tree: &BookmarkTree,
        source: NodeId,
        target: NodeId,
        position: DropPosition,
    ) -> ValidationResult {
        let checked = resolve(tree, source, target)
            .and_then(|(src, tgt)| check_page_order(tree, source, target, src, tgt, position));
        match checked {
            Ok(()) => ValidationResult::accept("Page order valid", 0),
            Err(rejection) => rejection,
        }
    }

    fn run(
        &self,
        tree: &BookmarkTree,
        source: NodeId,
        target: NodeId,
        position: DropPosition,
    ) -> Check<i32> {
        let (src, tgt) = resolve(tree, source, target)?;
        check_structure(tree, source, target, position)?;
        let level_change = check_levels(tree, source, target, src, tgt, position)?;
        check_page_order(tree, source, target, src, tgt, position)?;
        Ok(level_change)
    }
}

fn resolve(
    tree: &BookmarkTree,
    source: NodeId,
    target: NodeId,
) -> Check<(&BookmarkNode, &BookmarkNode)> {
    match (tree.get(source), tree.get(target)) {
        (Some(src), Some(tgt)) => Ok((src, tgt)),
        _ => Err(ValidationResult::reject(
            RejectionCode::UnknownNode,
            "Unknown bookmark",
        )),
    }
}

fn check_structure(
    tree: &BookmarkTree,
    source: NodeId,
    target: NodeId,
    position: DropPosition,
) -> Check<()> {
    if source == tree.root() {
        return Err(ValidationResult::reject(
            RejectionCode::CannotMoveRoot,
            "Cannot move root bookmark",
        ));
    }
    if source == target {
        return Err(ValidationResult::reject(
            RejectionCode::SelfMove,
            "Cannot move bookmark to itself",
        ));
    }
    if tree.is_descendant_of(target, source) {
        return Err(ValidationResult::reject(
            RejectionCode::DescendantMove,
            "Cannot move bookmark to its own descendant",
        ));
    }
    if position != DropPosition::Inside && tree.parent(target).is_none() {
        return Err(ValidationResult::reject(
            RejectionCode::InvalidTarget,
            "Bookmarks can only be placed beside a bookmark that has a parent",
        ));
    }
    Ok(())
}

/// Returns the level change for a move that passes the level rules.
fn check_levels(
    tree: &BookmarkTree,
    source: NodeId,
    target: NodeId,
    src: &BookmarkNode,
    tgt: &BookmarkNode,
    position: DropPosition,
) -> Check<i32> {
    let source_level = src.level.value();

    if position == DropPosition::Inside {
        let new_level = tgt.level.value() + 1;
        if new_level > BookmarkLevel::MAX.value() {
            return Err(ValidationResult::reject(
                RejectionCode::MaxDepth,
                format!("Bookmarks cannot be nested deeper than {}", BookmarkLevel::MAX),
            ));
        }
        if (source_level - new_level).abs() > 1 {
            return Err(ValidationResult::reject(
                RejectionCode::LevelJump,
                LEVEL_STEP_MSG,
            ));
        }
        let child_jump = other_nodes(tree, &tgt.children, source)
            .any(|child| (child.level.value() - new_level).abs() > 1);
        if child_jump {
            return Err(ValidationResult::reject(
                RejectionCode::ChildLevelJump,
                "Level can only change by 1 between parent and children",
            ));
        }
        return Ok(new_level - source_level);
    }

    let new_level = tgt.level.value();
    if (source_level - new_level).abs() > 1 {
        return Err(ValidationResult::reject(
            RejectionCode::LevelJump,
            LEVEL_STEP_MSG,
        ));
    }

    let siblings = sibling_ids(tree, tgt, source);
    if let Some(idx) = position_of(&siblings, target) {
        let neighbour = match position {
            DropPosition::Before if idx > 0 => siblings.get(idx - 1),
            DropPosition::After => siblings.get(idx + 1),
            _ => None,
        };
        let jump = neighbour
            .and_then(|&id| tree.get(id))
            .is_some_and(|n| (n.level.value() - new_level).abs() > 1);
        if jump {
            return Err(ValidationResult::reject(
                RejectionCode::AdjacentLevelJump,
                LEVEL_STEP_MSG,
            ));
        }
    }

    Ok(new_level - source_level)
}

fn check_page_order(
    tree: &BookmarkTree,
    source: NodeId,
    target: NodeId,
    src: &BookmarkNode,
    tgt: &BookmarkNode,
    position: DropPosition,
) -> Check<()> {
    if position == DropPosition::Inside {
        if other_nodes(tree, &tgt.children, source).any(|child| child.page == src.page) {
            return Err(ValidationResult::reject(
                RejectionCode::DuplicatePage,
                "Multiple bookmarks on same page not allowed at same level",
            ));
        }
        return Ok(());
    }

    let siblings = sibling_ids(tree, tgt, source);
    let Some(idx) = position_of(&siblings, target) else {
        return Ok(());
    };
    let same_level = |id: &&NodeId| tree.get(**id).is_some_and(|n| n.level == tgt.level);
    let page_of = |id: &NodeId| tree.get(*id).map(|n| n.page);

    let violates = match position {
        DropPosition::Before => {
            let prev = siblings[..idx].iter().rev().find(same_level).and_then(page_of);
            prev.is_some_and(|p| src.page < p) || src.page > tgt.page
        }
        DropPosition::After => {
            let next = siblings[idx + 1..].iter().find(same_level).and_then(page_of);
            next.is_some_and(|p| src.page > p) || src.page < tgt.page
        }
        DropPosition::Inside => false,
    };

    if violates {
        return Err(ValidationResult::reject(
            RejectionCode::PageOrder,
            PAGE_ORDER_MSG,
        ));
    }
    Ok(())
}

/// Nodes in `ids` other than `exclude`.
fn other_nodes<'a>(
    tree: &'a BookmarkTree,
    ids: &'a [NodeId],
    exclude: NodeId,
) -> impl Iterator<Item = &'a BookmarkNode> {
    ids.iter()
        .filter(move |&&id| id != exclude)
        .filter_map(|&id| tree.get(id))
}

/// Ids of the target's siblings (target included) with the source removed.
fn sibling_ids(tree: &BookmarkTree, tgt: &BookmarkNode, source: NodeId) -> Vec<NodeId> {
    tgt.parent
        .map(|p| {
            tree.children(p)
                .iter()
                .copied()
                .filter(|&id| id != source)
                .collect()
        })
        .unwrap_or_default()
}

fn position_of(siblings: &[NodeId], target: NodeId) -> Option<usize> {
    siblings.iter().position(|&id| id == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::BookmarkLevel::{H1, H2, H3, H4};
    use crate::manager::BookmarkManager;

    fn validator() -> MoveValidator {
        MoveValidator::new()
    }

    // --- Structural rules ---

    #[test]
    fn root_cannot_move() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let root = m.tree().root();
        let r = validator().validate_move(m.tree(), root, ch1, DropPosition::Inside);
        assert!(!r.valid);
        assert_eq!(r.code, Some(RejectionCode::CannotMoveRoot));
        assert_eq!(r.message, "Cannot move root bookmark");
    }

    #[test]
    fn self_move_rejected() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let r = validator().validate_move(m.tree(), ch1, ch1, DropPosition::After);
        assert_eq!(r.code, Some(RejectionCode::SelfMove));
        assert!(r.level_change.is_none());
    }

    #[test]
    fn descendant_move_rejected_for_every_position() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let sec = m.add_bookmark(2, "Section 1.1", Some(ch1), H2).unwrap();
        let sub = m.add_bookmark(3, "Sub 1.1.1", Some(sec), H3).unwrap();
        for position in [DropPosition::Before, DropPosition::After, DropPosition::Inside] {
            for target in [sec, sub] {
                let r = validator().validate_move(m.tree(), ch1, target, position);
                assert_eq!(r.code, Some(RejectionCode::DescendantMove), "{position}");
            }
        }
    }

    #[test]
    fn beside_root_rejected() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let root = m.tree().root();
        let r = validator().validate_move(m.tree(), ch1, root, DropPosition::Before);
        assert_eq!(r.code, Some(RejectionCode::InvalidTarget));
    }

    #[test]
    fn unknown_ids_rejected() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let ch2 = m.add_bookmark(2, "Chapter 2", None, H1).unwrap();
        m.delete_bookmark(ch2).unwrap();
        let r = validator().validate_move(m.tree(), ch1, ch2, DropPosition::After);
        assert_eq!(r.code, Some(RejectionCode::UnknownNode));
    }

    // --- Level rules ---

    #[test]
    fn inside_sibling_gives_level_change_one() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let ch2 = m.add_bookmark(5, "Chapter 2", None, H1).unwrap();
        let r = validator().validate_move(m.tree(), ch2, ch1, DropPosition::Inside);
        assert!(r.valid, "{r}");
        assert_eq!(r.level_change, Some(1));
    }

    #[test]
    fn inside_jump_of_three_levels_rejected() {
        // Root → Chapter(H1) → Section(H2) → Subsection(H3); an H1 node
        // dropped inside the subsection would become H4.
        let mut m = BookmarkManager::new(10);
        let ch = m.add_bookmark(1, "Chapter", None, H1).unwrap();
        let sec = m.add_bookmark(1, "Section", Some(ch), H2).unwrap();
        let sub = m.add_bookmark(2, "Subsection", Some(sec), H3).unwrap();
        let other = m.add_bookmark(4, "Other", None, H1).unwrap();
        let r = validator().validate_move(m.tree(), other, sub, DropPosition::Inside);
        assert!(!r.valid);
        assert_eq!(r.code, Some(RejectionCode::LevelJump));
    }

    #[test]
    fn inside_can_move_deep_node_up() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let sec = m.add_bookmark(2, "Section", Some(ch1), H2).unwrap();
        let sub = m.add_bookmark(3, "Sub", Some(sec), H3).unwrap();
        let ch2 = m.add_bookmark(6, "Chapter 2", None, H1).unwrap();
        let r = validator().validate_move(m.tree(), sub, ch2, DropPosition::Inside);
        assert!(r.valid, "{r}");
        assert_eq!(r.level_change, Some(-1));
    }

    #[test]
    fn inside_h4_target_exceeds_max_depth() {
        let mut m = BookmarkManager::new(10);
        let a = m.add_bookmark(1, "A", None, H1).unwrap();
        let b = m.add_bookmark(1, "B", Some(a), H2).unwrap();
        let c = m.add_bookmark(1, "C", Some(b), H3).unwrap();
        let d = m.add_bookmark(1, "D", Some(c), H4).unwrap();
        let e = m.add_bookmark(2, "E", Some(c), H4).unwrap();
        let r = validator().validate_move(m.tree(), e, d, DropPosition::Inside);
        assert_eq!(r.code, Some(RejectionCode::MaxDepth));
    }

    #[test]
    fn inside_rejects_far_existing_child() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        // Child stored inconsistently at H4 under an H1 parent.
        m.add_bookmark(2, "Odd", Some(ch1), H4).unwrap();
        let ch2 = m.add_bookmark(5, "Chapter 2", None, H1).unwrap();
        let r = validator().validate_move(m.tree(), ch2, ch1, DropPosition::Inside);
        assert_eq!(r.code, Some(RejectionCode::ChildLevelJump));
    }

    #[test]
    fn beside_target_two_levels_away_rejected() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let sec = m.add_bookmark(2, "Section", Some(ch1), H2).unwrap();
        let sub = m.add_bookmark(3, "Sub", Some(sec), H3).unwrap();
        let ch2 = m.add_bookmark(6, "Chapter 2", None, H1).unwrap();
        let r = validator().validate_move(m.tree(), ch2, sub, DropPosition::After);
        assert_eq!(r.code, Some(RejectionCode::LevelJump));
    }

    #[test]
    fn beside_rejects_far_adjacent_sibling() {
        let mut m = BookmarkManager::new(20);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let a = m.add_bookmark(2, "A", Some(ch1), H2).unwrap();
        m.add_bookmark(3, "Deep", Some(ch1), H4).unwrap();
        let b = m.add_bookmark(4, "B", Some(ch1), H2).unwrap();
        let ch2 = m.add_bookmark(10, "Chapter 2", None, H1).unwrap();
        let moved = m.add_bookmark(3, "Moved", Some(ch2), H2).unwrap();
        // Before B: previous sibling is Deep (H4), new level H2.
        let r = validator().validate_move(m.tree(), moved, b, DropPosition::Before);
        assert_eq!(r.code, Some(RejectionCode::AdjacentLevelJump));
        // After A: next sibling is Deep as well.
        let r = validator().validate_move(m.tree(), moved, a, DropPosition::After);
        assert_eq!(r.code, Some(RejectionCode::AdjacentLevelJump));
    }

    #[test]
    fn beside_same_level_has_zero_change() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let ch2 = m.add_bookmark(5, "Chapter 2", None, H1).unwrap();
        let r = validator().validate_move(m.tree(), ch1, ch2, DropPosition::Before);
        assert!(r.valid, "{r}");
        assert_eq!(r.level_change, Some(0));
    }

    // --- Page order ---

    #[test]
    fn before_lower_paged_sibling_violates_order() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let ch2 = m.add_bookmark(5, "Chapter 2", None, H1).unwrap();
        let r = validator().validate_move(m.tree(), ch2, ch1, DropPosition::Before);
        assert!(!r.valid);
        assert_eq!(r.code, Some(RejectionCode::PageOrder));
        assert_eq!(r.message, "Move would violate page order");
    }

    #[test]
    fn after_higher_paged_sibling_violates_order() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let ch2 = m.add_bookmark(5, "Chapter 2", None, H1).unwrap();
        let r = validator().validate_move(m.tree(), ch1, ch2, DropPosition::After);
        assert_eq!(r.code, Some(RejectionCode::PageOrder));
    }

    #[test]
    fn before_checks_previous_same_level_sibling() {
        let mut m = BookmarkManager::new(20);
        m.add_bookmark(2, "A", None, H1).unwrap();
        let b = m.add_bookmark(8, "B", None, H1).unwrap();
        let host = m.add_bookmark(12, "Host", None, H1).unwrap();
        let early = m.add_bookmark(1, "Early", Some(host), H2).unwrap();
        let mid = m.add_bookmark(13, "Mid", Some(host), H2).unwrap();
        // Page 1 lies before A (page 2).
        let r = validator().validate_move(m.tree(), early, b, DropPosition::Before);
        assert_eq!(r.code, Some(RejectionCode::PageOrder));
        // Page 13 lies after B (page 8).
        let r = validator().validate_move(m.tree(), mid, b, DropPosition::Before);
        assert_eq!(r.code, Some(RejectionCode::PageOrder));
    }

    #[test]
    fn equal_pages_accepted_at_boundaries() {
        let mut m = BookmarkManager::new(20);
        let a = m.add_bookmark(3, "A", None, H1).unwrap();
        let b = m.add_bookmark(7, "B", None, H1).unwrap();
        let host = m.add_bookmark(12, "Host", None, H1).unwrap();
        let x = m.add_bookmark(3, "X", Some(host), H2).unwrap();
        let y = m.add_bookmark(7, "Y", Some(host), H2).unwrap();
        assert!(validator().validate_move(m.tree(), x, a, DropPosition::After).valid);
        assert!(validator().validate_move(m.tree(), y, b, DropPosition::Before).valid);
    }

    #[test]
    fn inside_rejects_duplicate_child_page() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        m.add_bookmark(3, "Section", Some(ch1), H2).unwrap();
        let ch2 = m.add_bookmark(5, "Chapter 2", None, H1).unwrap();
        let x = m.add_bookmark(3, "X", Some(ch2), H2).unwrap();
        let r = validator().validate_move(m.tree(), x, ch1, DropPosition::Inside);
        assert_eq!(r.code, Some(RejectionCode::DuplicatePage));
    }

    #[test]
    fn page_order_check_alone() {
        let mut m = BookmarkManager::new(10);
        let ch1 = m.add_bookmark(1, "Chapter 1", None, H1).unwrap();
        let ch2 = m.add_bookmark(5, "Chapter 2", None, H1).unwrap();
        let ok = validator().validate_page_order(m.tree(), ch1, ch2, DropPosition::Before);
        assert!(ok.valid);
        let bad = validator().validate_page_order(m.tree(), ch2, ch1, DropPosition::Before);
        assert_eq!(bad.code, Some(RejectionCode::PageOrder));
    }

    // --- Result conversions ---

    #[test]
    fn into_result_maps_rejection_to_error() {
        let r = ValidationResult::reject(RejectionCode::PageOrder, "Move would violate page order");
        let err = r.into_result().unwrap_err();
        assert!(matches!(
            err,
            BookmarkError::MoveRejected {
                code: RejectionCode::PageOrder,
                ..
            }
        ));
        assert_eq!(ValidationResult::accept("ok", 1).into_result(), Ok(1));
    }

    #[test]
    fn result_display_includes_code() {
        let r = ValidationResult::reject(RejectionCode::SelfMove, "Cannot move bookmark to itself");
        assert_eq!(r.to_string(), "[SELF_MOVE] Cannot move bookmark to itself");
    }
}
