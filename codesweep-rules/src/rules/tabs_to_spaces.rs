use crate::rules::{Rule, categories, lines_with_offsets};
use codesweep_types::{CategoryId, TextChange, TextSpan};

const SPACES_PER_TAB: usize = 4;

/// Rewrites tabs in leading indentation to spaces (4 per tab). Tabs after
/// the first non-whitespace character are left alone.
pub struct TabsToSpacesRule;

impl Rule for TabsToSpacesRule {
    fn category(&self) -> CategoryId {
        CategoryId::new(categories::TABS_TO_SPACES)
    }

    fn scan(&self, text: &str) -> Vec<TextChange> {
        let mut changes = Vec::new();
        for (line, start, _end) in lines_with_offsets(text) {
            let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
            let indent = &line[..indent_len];
            if !indent.contains('\t') {
                continue;
            }

            let expanded: String = indent
                .chars()
                .map(|c| {
                    if c == '\t' {
                        " ".repeat(SPACES_PER_TAB)
                    } else {
                        c.to_string()
                    }
                })
                .collect();
            changes.push(TextChange::new(TextSpan::new(start, indent_len), expanded));
        }
        changes
    }
}
