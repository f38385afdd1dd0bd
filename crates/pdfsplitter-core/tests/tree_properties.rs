//! Property-based invariant tests for the bookmark hierarchy.
//!
//! These tests drive a [`BookmarkManager`] with random operation sequences
//! and check invariants that must hold for any input:
//!
//! 1. The tree stays acyclic and parent links agree with child lists.
//! 2. A rejected operation leaves the manager unchanged.
//! 3. Sibling titles stay unique after any sequence of adds.
//! 4. Every valid move changes the level by at most one.
//! 5. Moving a node relative to its own subtree is always rejected.
//! 6. Flattening and reloading reproduces structure and pages.

use std::collections::HashSet;

use pdfsplitter_core::*;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

const TOTAL_PAGES: usize = 20;
const TITLES: [&str; 6] = ["Intro", "Chapter 1", "Chapter 2", "Part A", "1 Methods", "Notes"];

#[derive(Debug, Clone)]
enum Op {
    Add {
        page: usize,
        title: usize,
        parent: usize,
        level: i32,
    },
    Delete(usize),
    Move {
        node: usize,
        parent: usize,
    },
    Drop {
        source: usize,
        target: usize,
        position: DropPosition,
    },
}

fn position_strategy() -> impl Strategy<Value = DropPosition> {
    prop_oneof![
        Just(DropPosition::Before),
        Just(DropPosition::After),
        Just(DropPosition::Inside),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..=TOTAL_PAGES + 1, 0usize..TITLES.len(), any::<usize>(), 1i32..=4)
            .prop_map(|(page, title, parent, level)| Op::Add { page, title, parent, level }),
        1 => any::<usize>().prop_map(Op::Delete),
        2 => (any::<usize>(), any::<usize>()).prop_map(|(node, parent)| Op::Move { node, parent }),
        2 => (any::<usize>(), any::<usize>(), position_strategy())
            .prop_map(|(source, target, position)| Op::Drop { source, target, position }),
    ]
}

/// Live ids with the root first.
fn live_ids(m: &BookmarkManager) -> Vec<NodeId> {
    std::iter::once(m.tree().root())
        .chain(m.tree().iter().map(|(id, _)| id))
        .collect()
}

fn pick(ids: &[NodeId], n: usize) -> NodeId {
    ids[n % ids.len()]
}

fn apply(m: &mut BookmarkManager, op: &Op) -> Result<(), BookmarkError> {
    let ids = live_ids(m);
    match *op {
        Op::Add {
            page,
            title,
            parent,
            level,
        } => {
            let level = BookmarkLevel::from_value(level).unwrap_or_default();
            m.add_bookmark(page, TITLES[title], Some(pick(&ids, parent)), level)
                .map(|_| ())
        }
        Op::Delete(n) => m.delete_bookmark(pick(&ids, n)),
        Op::Move { node, parent } => m.move_bookmark(pick(&ids, node), Some(pick(&ids, parent)), None),
        Op::Drop {
            source,
            target,
            position,
        } => m
            .apply_move(pick(&ids, source), pick(&ids, target), position)
            .map(|_| ()),
    }
}

fn build(ops: &[Op]) -> BookmarkManager {
    let mut m = BookmarkManager::new(TOTAL_PAGES);
    for op in ops {
        let _ = apply(&mut m, op);
    }
    m
}

fn assert_well_formed(m: &BookmarkManager) -> Result<(), TestCaseError> {
    let tree = m.tree();
    let root = tree.root();
    prop_assert!(tree.parent(root).is_none());
    let mut seen = HashSet::new();
    for (id, depth) in tree.iter() {
        prop_assert!(seen.insert(id), "node {} reached twice", id);
        let ancestors: Vec<NodeId> = tree.ancestors(id).collect();
        prop_assert_eq!(ancestors.len(), depth);
        prop_assert_eq!(ancestors.last().copied(), Some(root));
        prop_assert!(!ancestors.contains(&id), "node {} is its own ancestor", id);
        let parent = tree.parent(id).unwrap();
        prop_assert!(tree.children(parent).contains(&id));
    }
    prop_assert_eq!(seen.len(), tree.len());
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Acyclicity and link consistency
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tree_stays_well_formed(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut m = BookmarkManager::new(TOTAL_PAGES);
        for op in &ops {
            let _ = apply(&mut m, op);
            assert_well_formed(&m)?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Rejected operations change nothing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rejection_is_idempotent(
        ops in prop::collection::vec(op_strategy(), 0..30),
        last in op_strategy(),
    ) {
        let mut m = build(&ops);
        let before = m.clone();
        if apply(&mut m, &last).is_err() {
            prop_assert_eq!(&m, &before, "rejected {:?} changed the tree", last);
            prop_assert_eq!(m.modified(), before.modified());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Sibling titles stay unique
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sibling_titles_unique(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let m = build(&ops);
        for id in live_ids(&m) {
            let mut titles = HashSet::new();
            for &child in m.tree().children(id) {
                let title = &m.node(child).unwrap().title;
                prop_assert!(titles.insert(title.clone()), "duplicate sibling title {}", title);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Level delta bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn valid_moves_change_level_by_at_most_one(
        ops in prop::collection::vec(op_strategy(), 0..30),
        source in any::<usize>(),
        target in any::<usize>(),
        position in position_strategy(),
    ) {
        let m = build(&ops);
        let ids = live_ids(&m);
        let (source, target) = (pick(&ids, source), pick(&ids, target));
        let result = MoveValidator::new().validate_move(m.tree(), source, target, position);
        if result.valid {
            let change = result.level_change.unwrap();
            prop_assert!(change.abs() <= 1, "level change {} for {:?}", change, result);
            let same_level = m.node(source).unwrap().level == m.node(target).unwrap().level;
            if same_level {
                let expected = if position == DropPosition::Inside { 1 } else { 0 };
                prop_assert_eq!(change, expected);
            }
        } else {
            prop_assert!(result.level_change.is_none());
            prop_assert!(result.code.is_some());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Moves into the own subtree are rejected
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn moves_into_own_subtree_rejected(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let m = build(&ops);
        let validator = MoveValidator::new();
        for (node, _) in m.tree().iter() {
            for below in m.tree().descendants(node) {
                for position in [DropPosition::Before, DropPosition::After, DropPosition::Inside] {
                    let result = validator.validate_move(m.tree(), node, below, position);
                    prop_assert_eq!(result.code, Some(RejectionCode::DescendantMove));
                }
                let mut copy = m.clone();
                prop_assert_eq!(
                    copy.move_bookmark(node, Some(below), None),
                    Err(BookmarkError::DescendantMove)
                );
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Outline round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn outline_round_trip(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let m = build(&ops);
        let records = to_outline_records(m.tree());
        let entries: Vec<OutlineEntry> = records.iter().map(OutlineEntry::from).collect();
        let reloaded = BookmarkManager::from_outline(&entries, m.total_pages());
        prop_assert_eq!(to_outline_records(reloaded.tree()), records);
        prop_assert!(!reloaded.modified());
    }
}
