use serde::{Deserialize, Serialize};

/// Byte range inside one snapshot's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub len: usize,
}

impl TextSpan {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// One concrete edit: replace `span` (in the coordinates of the snapshot
/// the change was computed against) with `replacement`.
///
/// Spans within a single change set must be non-overlapping; enforcement
/// happens at application time in `codesweep-edit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChange {
    pub span: TextSpan,
    pub replacement: String,
}

impl TextChange {
    pub fn new(span: TextSpan, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    /// A pure insertion at `at`.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(TextSpan::new(at, 0), text)
    }

    /// A pure deletion of `span`.
    pub fn delete(span: TextSpan) -> Self {
        Self::new(span, String::new())
    }

    /// True when the change would leave the text untouched.
    pub fn is_noop(&self) -> bool {
        self.span.is_empty() && self.replacement.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn span_end_and_empty() {
        let span = TextSpan::new(3, 4);
        assert_eq!(span.end(), 7);
        assert!(!span.is_empty());
        assert!(TextSpan::new(5, 0).is_empty());
    }

    #[test]
    fn constructors() {
        let ins = TextChange::insert(2, "x");
        assert_eq!(ins.span, TextSpan::new(2, 0));
        assert_eq!(ins.replacement, "x");
        assert!(!ins.is_noop());

        let del = TextChange::delete(TextSpan::new(0, 3));
        assert!(del.replacement.is_empty());
        assert!(!del.is_noop());

        assert!(TextChange::new(TextSpan::new(9, 0), "").is_noop());
    }

    #[test]
    fn serde_roundtrip_is_stable() {
        let change = TextChange::new(TextSpan::new(10, 2), "ab");
        let json = serde_json::to_string(&change).expect("serialize");
        assert_eq!(json, r#"{"span":{"start":10,"len":2},"replacement":"ab"}"#);
        let back: TextChange = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, change);
    }
}
