//! Embeddable cleanup orchestration for codesweep.
//!
//! One exposed operation, [`cleanup_document`](pipeline::cleanup_document):
//! normalize imports, apply every enabled fix category sequentially, then
//! reconcile the net delta against the original snapshot and commit it as
//! a single edit.
//!
//! # Port traits
//!
//! Every collaborator is abstracted behind a trait in [`ports`]:
//! - [`ConfigPort`](ports::ConfigPort) — per-language boolean options
//! - [`ImportRemover`](ports::ImportRemover) / [`ImportSorter`](ports::ImportSorter)
//!   — optional per-language import services
//! - [`FixDiscovery`](ports::FixDiscovery) — propose fixes for a category
//! - [`FixAllExecutor`](ports::FixAllExecutor) — compute the snapshot with
//!   every instance of one category's fix applied
//! - [`BackingStore`](ports::BackingStore) — the single mutation sink
//!
//! The [`adapters`] module provides default implementations backed by the
//! builtin rules and the filesystem.

pub mod adapters;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use error::{CleanupError, CleanupResult, checkpoint};
pub use features::{FeatureRegistry, flags, select_categories};
pub use pipeline::{CleanupOutcome, cleanup_document};
pub use ports::CleanupHost;
pub use settings::CleanupSettings;
