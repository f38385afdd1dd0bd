use std::path::Path;

use pdfsplitter::{ChapterSplitter, SplitOptions};

use crate::ranges::parse_chapter_ranges;
use crate::shared::{ProgressReporter, fail, open_document};

pub fn run(
    file: &Path,
    output_dir: &Path,
    ranges: Option<&str>,
    overwrite: bool,
    no_clamp: bool,
) -> Result<(), i32> {
    let doc = open_document(file)?;

    let chapters = match ranges {
        Some(list) => parse_chapter_ranges(list).map_err(fail)?,
        None => doc.detected_chapter_ranges().map_err(fail)?,
    };
    if chapters.is_empty() {
        return Err(fail(
            "no chapters detected in the bookmarks; pass --ranges to split manually",
        ));
    }

    let options = SplitOptions {
        overwrite,
        clamp_to_document: !no_clamp,
    };
    let reporter = ProgressReporter::new();
    let result = ChapterSplitter::new(&doc)
        .with_options(options)
        .split(&chapters, output_dir, &mut |progress| reporter.report(progress));
    reporter.finish();

    let written = result.map_err(fail)?;
    for path in &written {
        println!("{}", path.display());
    }
    println!("Wrote {} chapter file(s) to {}", written.len(), output_dir.display());

    Ok(())
}
