use pdfsplitter::ChapterRange;

/// Parse a chapter list like "Intro:1-3,Body:4-9" into 0-indexed ranges.
///
/// Pages are 1-indexed (user-facing). A single page ("Cover:1") is a
/// one-page range. The name is everything before the last ':', so names may
/// contain colons. Bounds against the document are checked later by the
/// splitter.
pub fn parse_chapter_ranges(input: &str) -> Result<Vec<ChapterRange>, String> {
    let mut ranges = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (name, pages) = part
            .rsplit_once(':')
            .ok_or_else(|| format!("missing ':' in chapter '{part}' (expected NAME:START-END)"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing chapter name in '{part}'"));
        }

        let (start, end) = match pages.split_once('-') {
            Some((start, end)) => (parse_page(start)?, parse_page(end)?),
            None => {
                let page = parse_page(pages)?;
                (page, page)
            }
        };
        if start > end {
            return Err(format!("invalid range {start}-{end} for chapter '{name}'"));
        }

        ranges.push(ChapterRange::new(name, start - 1, end - 1));
    }

    if ranges.is_empty() {
        return Err("no chapter ranges given".to_string());
    }
    Ok(ranges)
}

fn parse_page(text: &str) -> Result<usize, String> {
    let page: usize = text
        .trim()
        .parse()
        .map_err(|_| format!("invalid page number: '{}'", text.trim()))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    Ok(page)
}
