use crate::rules::{Rule, categories, lines_with_offsets};
use codesweep_types::{CategoryId, TextChange, TextSpan};

/// Deletes trailing spaces and tabs from every line.
pub struct TrimTrailingRule;

impl Rule for TrimTrailingRule {
    fn category(&self) -> CategoryId {
        CategoryId::new(categories::TRIM_TRAILING)
    }

    fn scan(&self, text: &str) -> Vec<TextChange> {
        let mut changes = Vec::new();
        for (line, start, end) in lines_with_offsets(text) {
            let trimmed = line.trim_end_matches([' ', '\t']);
            if trimmed.len() < line.len() {
                let from = start + trimmed.len();
                changes.push(TextChange::delete(TextSpan::new(from, end - from)));
            }
        }
        changes
    }
}
