//! Error types for change application.
//!
//! A change set that trips any of these is a bug in its producer, not a
//! recoverable condition: the reconciler only ever emits ordered,
//! non-overlapping, in-bounds spans.

use codesweep_types::TextSpan;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// Changes must be sorted by start offset and must not overlap.
    #[error("change at {start} overlaps or precedes the previous change ending at {prev_end}")]
    UnorderedOrOverlapping { start: usize, prev_end: usize },

    /// A span reaches past the end of the text it is applied to.
    #[error("span {span:?} is out of bounds for text of length {len}")]
    OutOfBounds { span: TextSpan, len: usize },

    /// A span boundary splits a multi-byte character.
    #[error("span {span:?} does not fall on char boundaries")]
    NotCharBoundary { span: TextSpan },
}

pub type EditResult<T> = Result<T, EditError>;
