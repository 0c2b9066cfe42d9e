use codesweep_types::{CategoryId, TextChange};

mod collapse_blank_lines;
mod final_newline;
mod tabs_to_spaces;
mod trim_trailing;

/// Category ids of the builtin rules.
///
/// These are the opaque strings the feature registry maps flags onto; a
/// category with no backing rule is a silent no-op at discovery time.
pub mod categories {
    pub const TRIM_TRAILING: &str = "whitespace.trim_trailing";
    pub const COLLAPSE_BLANK_LINES: &str = "whitespace.collapse_blank_lines";
    pub const TABS_TO_SPACES: &str = "indent.tabs_to_spaces";
    pub const FINAL_NEWLINE: &str = "whitespace.final_newline";
}

/// One fix provider: proposes every instance of its category's fix across
/// a whole document.
///
/// Proposed spans are in `text`'s coordinates, ascending, and
/// non-overlapping. A rule that finds nothing returns an empty set.
pub trait Rule: Send + Sync {
    fn category(&self) -> CategoryId;

    fn scan(&self, text: &str) -> Vec<TextChange>;
}

pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(trim_trailing::TrimTrailingRule),
        Box::new(collapse_blank_lines::CollapseBlankLinesRule),
        Box::new(tabs_to_spaces::TabsToSpacesRule),
        Box::new(final_newline::FinalNewlineRule),
    ]
}

/// Iterate `(line_without_newline, start_offset, end_offset_excl_newline)`
/// over `text`. Shared by the line-oriented rules.
pub(crate) fn lines_with_offsets(text: &str) -> impl Iterator<Item = (&str, usize, usize)> {
    let bytes = text.as_bytes();
    let mut pos = 0usize;
    std::iter::from_fn(move || {
        if pos >= bytes.len() {
            return None;
        }
        let start = pos;
        let end = match bytes[pos..].iter().position(|b| *b == b'\n') {
            Some(i) => pos + i,
            None => bytes.len(),
        };
        pos = if end < bytes.len() { end + 1 } else { end };
        Some((&text[start..end], start, end))
    })
}
