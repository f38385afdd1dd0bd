//! `add`, `delete` and `move`: edit the bookmark tree and save it.

use std::path::Path;

use pdfsplitter::{BookmarkLevel, DropPosition, MoveValidator};

use crate::shared::{fail, load_bookmarks, resolve_bookmark, save_bookmarks};

pub fn run_add(
    file: &Path,
    page: usize,
    title: &str,
    parent: Option<&str>,
    level: Option<u8>,
    output: Option<&Path>,
) -> Result<(), i32> {
    let (doc, mut manager) = load_bookmarks(file)?;
    let parent = parent
        .map(|path| resolve_bookmark(&manager, path))
        .transpose()?;
    // Root asks the manager to derive the level from the parent's depth.
    let level = level
        .and_then(|l| BookmarkLevel::from_value(i32::from(l)))
        .unwrap_or(BookmarkLevel::Root);

    manager
        .add_bookmark(page, title, parent, level)
        .map_err(fail)?;
    println!("Added '{title}' at page {page}");

    save_bookmarks(&doc, &mut manager, output)
}

pub fn run_delete(file: &Path, path: &str, output: Option<&Path>) -> Result<(), i32> {
    let (doc, mut manager) = load_bookmarks(file)?;
    let node = resolve_bookmark(&manager, path)?;
    let removed = manager.tree().descendants(node).len() + 1;

    manager.delete_bookmark(node).map_err(fail)?;
    println!("Deleted '{path}' ({removed} bookmark(s))");

    save_bookmarks(&doc, &mut manager, output)
}

pub fn run_move(
    file: &Path,
    source: &str,
    target: &str,
    position: DropPosition,
    output: Option<&Path>,
    dry_run: bool,
) -> Result<(), i32> {
    let (doc, mut manager) = load_bookmarks(file)?;
    let source_id = resolve_bookmark(&manager, source)?;
    let target_id = resolve_bookmark(&manager, target)?;

    if dry_run {
        let result =
            MoveValidator::new().validate_move(manager.tree(), source_id, target_id, position);
        if !result.is_valid() {
            return Err(fail(format!("move rejected: {result}")));
        }
        println!(
            "Move '{source}' {position} '{target}' is valid (level change {:+})",
            result.level_change.unwrap_or(0)
        );
        return Ok(());
    }

    let change = manager
        .apply_move(source_id, target_id, position)
        .map_err(fail)?;
    println!("Moved '{source}' {position} '{target}' (level change {change:+})");

    save_bookmarks(&doc, &mut manager, output)
}
