use crate::rules::{Rule, categories, lines_with_offsets};
use codesweep_types::{CategoryId, TextChange, TextSpan};

/// Collapses every run of two or more blank lines into a single blank
/// line. Blank means empty: a line of spaces or tabs is not blank (the
/// trim-trailing category turns it into one, which is exactly the
/// cross-category ordering the pipeline exercises).
pub struct CollapseBlankLinesRule;

impl Rule for CollapseBlankLinesRule {
    fn category(&self) -> CategoryId {
        CategoryId::new(categories::COLLAPSE_BLANK_LINES)
    }

    fn scan(&self, text: &str) -> Vec<TextChange> {
        let mut changes = Vec::new();
        let mut run_start: Option<usize> = None;
        let mut run_len = 0usize;
        let mut run_end = 0usize;

        for (line, start, end) in lines_with_offsets(text) {
            if line.is_empty() {
                if run_start.is_none() {
                    run_start = Some(start);
                }
                run_len += 1;
                // Include this line's newline when one exists.
                run_end = if end < text.len() { end + 1 } else { end };
            } else {
                flush(&mut changes, &mut run_start, &mut run_len, run_end);
            }
        }
        flush(&mut changes, &mut run_start, &mut run_len, run_end);

        changes
    }
}

fn flush(
    changes: &mut Vec<TextChange>,
    run_start: &mut Option<usize>,
    run_len: &mut usize,
    run_end: usize,
) {
    if let Some(start) = run_start.take()
        && *run_len > 1
    {
        // Keep the first blank line, delete the rest.
        let keep = start + 1;
        changes.push(TextChange::delete(TextSpan::new(keep, run_end - keep)));
    }
    *run_len = 0;
}
