#[cfg(test)]
mod tests;

use crate::section::Section;

/// Split a Markdown-flavoured document into sections at formatting
/// boundaries.
///
/// Boundary lines are:
/// - heading markers (`#`, `##`, ... followed by whitespace)
/// - lines consisting solely of bold-wrapped text (`**Title**`)
/// - fully upper-case title lines
///
/// Each boundary line opens a new section and becomes its first line; all
/// following text up to the next boundary belongs to that section. Text
/// before the first boundary forms its own leading section when non-blank.
/// Whitespace-only sections are discarded. A document with no boundary
/// lines yields a single section holding the whole trimmed text.
pub fn segment(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if is_boundary_line(line) {
            flush(&mut sections, &mut current);
        } else if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    flush(&mut sections, &mut current);

    sections
}

fn flush(sections: &mut Vec<Section>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sections.push(Section::new(trimmed));
    }
    current.clear();
}

fn is_boundary_line(line: &str) -> bool {
    is_heading(line) || is_bold_title(line) || is_caps_title(line)
}

fn is_heading(line: &str) -> bool {
    let title = line.trim_start_matches('#');
    title.len() < line.len() && title.starts_with(char::is_whitespace)
}

fn is_bold_title(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() > 4 && trimmed.starts_with("**") && trimmed.ends_with("**")
}

fn is_caps_title(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.chars().any(char::is_alphabetic)
        && !trimmed.chars().any(char::is_lowercase)
}

/// Split text into sentence-level fragments.
///
/// Fragments end at newlines and after sentence-terminating punctuation
/// (`.`, `!`, `?`) followed by whitespace, so decimals and tightly-packed
/// abbreviations stay intact. Blank fragments are dropped. Used by the
/// controller when the slide target meets or exceeds the sentence count,
/// where merge/split iteration cannot do better than one sentence per slide.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut chars = text.trim().chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' || c == '\r' {
            push_fragment(&mut fragments, &mut current);
            continue;
        }
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(false, |next| next.is_whitespace()) {
            push_fragment(&mut fragments, &mut current);
        }
    }
    push_fragment(&mut fragments, &mut current);

    fragments
}

fn push_fragment(fragments: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        fragments.push(trimmed.to_string());
    }
    current.clear();
}
