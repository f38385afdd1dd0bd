use std::path::Path;

use pdfsplitter::BookmarkManager;

use crate::cli::OutputFormat;
use crate::shared::{bookmark_path, fail, load_bookmarks};

pub fn run(file: &Path, format: OutputFormat) -> Result<(), i32> {
    let (_, manager) = load_bookmarks(file)?;

    match format {
        OutputFormat::Text => write_text(&manager),
        OutputFormat::Json => write_json(&manager),
    }
}

fn write_text(manager: &BookmarkManager) -> Result<(), i32> {
    let tree = manager.tree();
    if tree.children(tree.root()).is_empty() {
        println!("No bookmarks found.");
        return Ok(());
    }

    println!("level\tpage\ttitle");

    for (id, depth) in tree.iter() {
        let node = tree.node(id).map_err(fail)?;
        let indent = "  ".repeat(depth - 1);
        println!("{}\t{}\t{}{}", node.level.value(), node.page, indent, node.title);
    }

    Ok(())
}

fn write_json(manager: &BookmarkManager) -> Result<(), i32> {
    let tree = manager.tree();
    let mut json_values = Vec::new();
    for (id, depth) in tree.iter() {
        let node = tree.node(id).map_err(fail)?;
        json_values.push(serde_json::json!({
            "title": node.title,
            "page": node.page,
            "level": node.level.value(),
            "depth": depth,
            "path": bookmark_path(tree, id),
        }));
    }

    let json_str = serde_json::to_string(&json_values).map_err(fail)?;
    println!("{json_str}");

    Ok(())
}
