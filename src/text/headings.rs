//! Heading demotion for issues embedded under a volume title.

/// Number of levels every embedded heading is pushed down
pub const HEADING_OFFSET: usize = 2;

/// Demote every Markdown heading in `content` by `offset` levels.
///
/// A heading line is one whose first non-space run is made only of `#`
/// markers. It is re-emitted without indentation as the lengthened marker run,
/// a single space and the trimmed heading text. Every other line is returned
/// unchanged. Applying this twice shifts twice.
pub fn shift_headings(content: &str, offset: usize) -> String {
    content
        .split('\n')
        .map(|line| shift_line(line, offset))
        .collect::<Vec<_>>()
        .join("\n")
}

fn shift_line(line: &str, offset: usize) -> String {
    match line.strip_suffix('\r') {
        Some(body) => format!("{}\r", shift_body(body, offset)),
        None => shift_body(line, offset),
    }
}

fn shift_body(line: &str, offset: usize) -> String {
    let trimmed = line.trim_start();
    let level = trimmed.bytes().take_while(|b| *b == b'#').count();
    if level == 0 {
        return line.to_string();
    }

    let rest = &trimmed[level..];
    // "#hashtag" is text, not a heading
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return line.to_string();
    }

    let markers = "#".repeat(level + offset);
    let text = rest.trim();
    if text.is_empty() {
        markers
    } else {
        format!("{} {}", markers, text)
    }
}
