//! Port traits abstracting every collaborator away from the pipeline.
//!
//! The pipeline only ever sees these interfaces; the host wires in
//! concrete implementations (or `None` where a language simply has no
//! collaborator, which is a no-op and never a fault).

use crate::error::CleanupResult;
use codesweep_types::{
    CancelToken, CategoryId, DocumentSnapshot, FixCollection, Language, TextChange, TextSpan,
};

/// Read-only boolean options, scoped per language.
pub trait ConfigPort {
    /// `None` when the option is not configured; callers treat that as
    /// disabled.
    fn bool_option(&self, key: &str, language: Language) -> Option<bool>;
}

/// Optional per-language unused-import removal.
pub trait ImportRemover {
    fn remove_unused(
        &self,
        snapshot: &DocumentSnapshot,
        cancel: &CancelToken,
    ) -> CleanupResult<DocumentSnapshot>;
}

/// Optional per-language import sorting.
pub trait ImportSorter {
    fn sort(
        &self,
        snapshot: &DocumentSnapshot,
        cancel: &CancelToken,
    ) -> CleanupResult<DocumentSnapshot>;
}

/// Proposes the full-document fix collection for one category.
pub trait FixDiscovery {
    /// `Ok(None)` means no applicable fixes, or a category no provider
    /// recognises; both are expected no-op outcomes.
    fn find_fixes(
        &self,
        snapshot: &DocumentSnapshot,
        span: TextSpan,
        category: &CategoryId,
        cancel: &CancelToken,
    ) -> CleanupResult<Option<FixCollection>>;
}

/// A "fix everything in this document" request for one category.
#[derive(Debug)]
pub struct FixAllRequest<'a> {
    pub snapshot: &'a DocumentSnapshot,
    pub collection: FixCollection,
}

/// Computes the successor snapshot with every instance of the requested
/// category's fix applied.
pub trait FixAllExecutor {
    fn compute_fix_all(
        &self,
        request: &FixAllRequest<'_>,
        cancel: &CancelToken,
    ) -> CleanupResult<DocumentSnapshot>;
}

/// The single mutation sink. `original` carries both the document
/// identity and the baseline the change set was computed against, so the
/// store can detect concurrent divergence and reject the commit.
pub trait BackingStore {
    fn apply_changes(
        &self,
        original: &DocumentSnapshot,
        changes: &[TextChange],
        cancel: &CancelToken,
    ) -> CleanupResult<()>;
}

/// The full capability set for one cleanup invocation.
///
/// Explicit references rather than a service registry: absent
/// capabilities are visible in the type, and tests can swap any single
/// collaborator.
pub struct CleanupHost<'a> {
    pub config: &'a dyn ConfigPort,
    pub import_remover: Option<&'a dyn ImportRemover>,
    pub import_sorter: Option<&'a dyn ImportSorter>,
    pub fix_discovery: &'a dyn FixDiscovery,
    pub fix_all: &'a dyn FixAllExecutor,
    pub store: &'a dyn BackingStore,
}
