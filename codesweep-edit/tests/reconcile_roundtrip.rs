//! Property tests: applying the computed change set to the original text
//! must reproduce the target text byte for byte, for any pair of texts.

use codesweep_edit::{apply_changes, compute_changes};
use proptest::prelude::*;

/// Line-shaped text: short lines over a small alphabet, with and without
/// a trailing newline, so the diff sees realistic line structure.
fn text_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("[abXY \t]{0,6}", 0..12),
        prop::bool::ANY,
    )
        .prop_map(|(lines, trailing)| {
            let mut text = lines.join("\n");
            if trailing && !text.is_empty() {
                text.push('\n');
            }
            text
        })
}

proptest! {
    #[test]
    fn changes_reproduce_modified_text(
        original in text_strategy(),
        modified in text_strategy(),
    ) {
        let changes = compute_changes(&original, &modified);
        let applied = apply_changes(&original, &changes).expect("apply");
        prop_assert_eq!(applied, modified);
    }

    #[test]
    fn identical_pair_is_empty(text in text_strategy()) {
        prop_assert!(compute_changes(&text, &text).is_empty());
    }

    #[test]
    fn changes_are_ordered_and_disjoint(
        original in text_strategy(),
        modified in text_strategy(),
    ) {
        let changes = compute_changes(&original, &modified);
        let mut prev_end = 0usize;
        for change in &changes {
            prop_assert!(change.span.start >= prev_end);
            prop_assert!(change.span.end() <= original.len());
            prop_assert!(!change.is_noop());
            prev_end = change.span.end();
        }
    }

    #[test]
    fn multibyte_texts_roundtrip(
        original in prop::collection::vec("[aé日\n]{0,4}", 0..8),
        modified in prop::collection::vec("[aé日\n]{0,4}", 0..8),
    ) {
        let original = original.concat();
        let modified = modified.concat();
        let changes = compute_changes(&original, &modified);
        let applied = apply_changes(&original, &changes).expect("apply");
        prop_assert_eq!(applied, modified);
    }
}
