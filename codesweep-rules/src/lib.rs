//! Builtin fix providers for codesweep.
//!
//! Each diagnostic category the feature registry can select is backed by
//! one [`Rule`] here. Rules are pure text scanners: they propose
//! full-document change sets and never touch I/O, which keeps them
//! trivially testable and lets the core compose them however the enabled
//! flag set demands.
//!
//! The [`imports`] module carries the builtin per-language import
//! services (currently Rust only) consumed by the import normalizer.

pub mod imports;
pub mod rules;

pub use rules::{Rule, builtin_rules, categories};
