//! Change reconciliation for codesweep.
//!
//! Responsibilities:
//! - Compute the minimal set of [`TextChange`]s that turns one document
//!   text into another (`compute_changes`), discarding any knowledge of
//!   the intermediate stages that produced the final text.
//! - Apply an ordered, non-overlapping change set (`apply_changes`).
//! - Render a unified diff preview (`render_patch`).
//!
//! The diff is line-granular via `diffy`; runs of deleted/inserted lines
//! inside each hunk collapse into a single span/replacement pair, so the
//! change set stays close to what a reviewer would read in the patch.

mod error;

pub use error::{EditError, EditResult};

use codesweep_types::{TextChange, TextSpan};
use diffy::{Line, PatchFormatter};

/// Compute the net textual delta from `original` to `modified`.
///
/// The returned changes are expressed in `original`'s coordinates, sorted
/// by start offset, non-overlapping, and free of no-ops. An identical pair
/// yields an empty set.
pub fn compute_changes(original: &str, modified: &str) -> Vec<TextChange> {
    if original == modified {
        return vec![];
    }
    if original.is_empty() {
        return vec![TextChange::insert(0, modified)];
    }
    if modified.is_empty() {
        return vec![TextChange::delete(TextSpan::new(0, original.len()))];
    }

    let offsets = line_offsets(original);
    let patch = diffy::create_patch(original, modified);

    let mut changes = Vec::new();
    for hunk in patch.hunks() {
        let old_range = hunk.old_range();
        // HunkRange starts are 1-based; a zero-length old side names the
        // line the insertion follows instead.
        let start_idx = if old_range.len() == 0 {
            old_range.start()
        } else {
            old_range.start() - 1
        };
        let mut old_pos = offsets.get(start_idx).copied().unwrap_or(original.len());

        let mut run_start = old_pos;
        let mut deleted = 0usize;
        let mut inserted = String::new();

        for line in hunk.lines() {
            match line {
                Line::Context(text) => {
                    flush_run(&mut changes, run_start, &mut deleted, &mut inserted);
                    old_pos += text.len();
                    run_start = old_pos;
                }
                Line::Delete(text) => {
                    deleted += text.len();
                    old_pos += text.len();
                }
                Line::Insert(text) => {
                    inserted.push_str(text);
                }
            }
        }
        flush_run(&mut changes, run_start, &mut deleted, &mut inserted);
    }

    changes
}

fn flush_run(changes: &mut Vec<TextChange>, start: usize, deleted: &mut usize, inserted: &mut String) {
    if *deleted == 0 && inserted.is_empty() {
        return;
    }
    changes.push(TextChange::new(
        TextSpan::new(start, *deleted),
        std::mem::take(inserted),
    ));
    *deleted = 0;
}

/// Byte offset of each line start. Lines include their terminating
/// newline; a trailing newline does not open a final empty line, matching
/// diffy's line model.
fn line_offsets(text: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    let bytes = text.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'\n' && i + 1 < bytes.len() {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Apply an ordered, non-overlapping change set to `original`.
pub fn apply_changes(original: &str, changes: &[TextChange]) -> EditResult<String> {
    let mut out = String::with_capacity(original.len());
    let mut pos = 0usize;

    for change in changes {
        let span = change.span;
        if span.start < pos {
            return Err(EditError::UnorderedOrOverlapping {
                start: span.start,
                prev_end: pos,
            });
        }
        if span.end() > original.len() {
            return Err(EditError::OutOfBounds {
                span,
                len: original.len(),
            });
        }
        if !original.is_char_boundary(span.start) || !original.is_char_boundary(span.end()) {
            return Err(EditError::NotCharBoundary { span });
        }

        out.push_str(&original[pos..span.start]);
        out.push_str(&change.replacement);
        pos = span.end();
    }

    out.push_str(&original[pos..]);
    Ok(out)
}

/// Render a git-style unified diff for one document.
pub fn render_patch(display_path: &str, original: &str, modified: &str) -> String {
    if original == modified {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", display_path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", display_path));

    let patch = diffy::create_patch(original, modified);
    let formatter = PatchFormatter::new();
    out.push_str(&formatter.fmt_patch(&patch).to_string());
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
