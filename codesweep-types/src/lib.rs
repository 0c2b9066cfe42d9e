//! Shared DTOs for the codesweep workspace.
//!
//! # Design constraints
//! - `TextSpan`/`TextChange` are serialized to disk and across process
//!   boundaries; be conservative with breaking changes.
//! - `DocumentSnapshot` is runtime state, deliberately not serializable:
//!   a snapshot is only meaningful inside the run that produced it.

pub mod cancel;
pub mod category;
pub mod change;
pub mod document;

pub use cancel::CancelToken;
pub use category::{CategoryId, FixCollection};
pub use change::{TextChange, TextSpan};
pub use document::{DocumentId, DocumentSnapshot, Language};
