use crate::rules::{Rule, categories};
use codesweep_types::{CategoryId, TextChange};

/// Ensures a non-empty document ends with a newline. Never trims extra
/// trailing blank lines; that is the blank-line category's job.
pub struct FinalNewlineRule;

impl Rule for FinalNewlineRule {
    fn category(&self) -> CategoryId {
        CategoryId::new(categories::FINAL_NEWLINE)
    }

    fn scan(&self, text: &str) -> Vec<TextChange> {
        if text.is_empty() || text.ends_with('\n') {
            return vec![];
        }
        vec![TextChange::insert(text.len(), "\n")]
    }
}
