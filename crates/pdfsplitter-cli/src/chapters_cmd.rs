use std::path::Path;

use pdfsplitter::DetectedOutline;

use crate::cli::OutputFormat;
use crate::shared::{fail, open_document};

pub fn run(file: &Path, format: OutputFormat) -> Result<(), i32> {
    let doc = open_document(file)?;
    let detected = doc.detect_chapters().map_err(fail)?;

    for warning in &detected.warnings {
        eprintln!("Warning: {warning}");
    }

    match format {
        OutputFormat::Text => write_text(&detected, doc.page_count()),
        OutputFormat::Json => write_json(&detected, doc.page_count()),
    }
}

fn write_text(detected: &DetectedOutline, page_count: usize) -> Result<(), i32> {
    if detected.chapter_ranges.is_empty() {
        println!("No chapters detected.");
        return Ok(());
    }

    println!("start\tend\ttitle");

    for range in &detected.chapter_ranges {
        let end = range.end.min(page_count.saturating_sub(1));
        println!("{}\t{}\t{}", range.start + 1, end + 1, range.title);
    }

    Ok(())
}

fn write_json(detected: &DetectedOutline, page_count: usize) -> Result<(), i32> {
    let chapters: Vec<serde_json::Value> = detected
        .chapter_ranges
        .iter()
        .map(|range| {
            serde_json::json!({
                "title": range.title,
                "start_page": range.start + 1,
                "end_page": range.end.min(page_count.saturating_sub(1)) + 1,
                "level": range.level,
            })
        })
        .collect();
    let warnings: Vec<String> = detected.warnings.iter().map(ToString::to_string).collect();

    let json_str = serde_json::to_string(&serde_json::json!({
        "page_count": page_count,
        "chapters": chapters,
        "warnings": warnings,
    }))
    .map_err(fail)?;
    println!("{json_str}");

    Ok(())
}
