//! The cleanup pipeline.
//!
//! Three stages over immutable snapshots: import normalization, sequential
//! fix-all per enabled category, then reconciliation of the net delta
//! against the original snapshot and a single atomic commit. Each stage
//! observes the cancel token before calling out; cancellation anywhere
//! leaves the backing store untouched.

use crate::error::{CleanupResult, checkpoint};
use crate::features::{FeatureRegistry, flags, select_categories};
use crate::ports::{CleanupHost, FixAllRequest};
use crate::settings::CleanupSettings;
use codesweep_edit::compute_changes;
use codesweep_types::{CancelToken, CategoryId, DocumentSnapshot, TextChange};
use tracing::debug;

/// What one cleanup run produced.
#[derive(Debug)]
pub struct CleanupOutcome {
    /// The snapshot the run started from.
    pub original: DocumentSnapshot,
    /// The snapshot after every enabled transformation.
    pub cleaned: DocumentSnapshot,
    /// Net delta from `original` to `cleaned`, ordered and disjoint.
    pub changes: Vec<TextChange>,
    /// Whether the change set was handed to the backing store. False when
    /// nothing changed or the run was a dry run.
    pub committed: bool,
}

impl CleanupOutcome {
    pub fn is_clean(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Run the full cleanup over `snapshot` and commit the net delta.
///
/// The store sees at most one mutation per call; a run that finds nothing
/// to change never touches it. Errors from any collaborator abort the run
/// before the commit.
pub fn cleanup_document(
    host: &CleanupHost<'_>,
    registry: &FeatureRegistry,
    snapshot: DocumentSnapshot,
    settings: &CleanupSettings,
    cancel: &CancelToken,
) -> CleanupResult<CleanupOutcome> {
    checkpoint(cancel)?;
    debug!(
        document = %snapshot.id(),
        language = %snapshot.language(),
        "cleanup started"
    );

    let original = snapshot;
    let mut current = normalize_imports(host, original.clone(), cancel)?;

    let categories = select_categories(host.config, original.language(), registry);
    debug!(categories = categories.len(), "selected fix categories");
    current = apply_fix_all(host, current, &categories, cancel)?;

    let changes = compute_changes(original.text(), current.text());
    if changes.is_empty() {
        debug!(document = %original.id(), "already clean");
        return Ok(CleanupOutcome {
            original,
            cleaned: current,
            changes,
            committed: false,
        });
    }

    let committed = if settings.dry_run {
        debug!(document = %original.id(), changes = changes.len(), "dry run, skipping commit");
        false
    } else {
        checkpoint(cancel)?;
        host.store.apply_changes(&original, &changes, cancel)?;
        true
    };

    Ok(CleanupOutcome {
        original,
        cleaned: current,
        changes,
        committed,
    })
}

/// Stage one: remove unused imports, then sort what remains.
///
/// Both halves are flag-gated and need a registered collaborator for the
/// document's language; a missing collaborator is a silent no-op.
fn normalize_imports(
    host: &CleanupHost<'_>,
    snapshot: DocumentSnapshot,
    cancel: &CancelToken,
) -> CleanupResult<DocumentSnapshot> {
    let language = snapshot.language();
    let mut current = snapshot;

    if host
        .config
        .bool_option(flags::REMOVE_UNUSED_IMPORTS, language)
        .unwrap_or(false)
        && let Some(remover) = host.import_remover
    {
        checkpoint(cancel)?;
        current = remover.remove_unused(&current, cancel)?;
        debug!(version = current.version(), "removed unused imports");
    }

    if host
        .config
        .bool_option(flags::SORT_IMPORTS, language)
        .unwrap_or(false)
        && let Some(sorter) = host.import_sorter
    {
        checkpoint(cancel)?;
        current = sorter.sort(&current, cancel)?;
        debug!(version = current.version(), "sorted imports");
    }

    Ok(current)
}

/// Stage two: one fix-all pass per category, in order, each against the
/// snapshot the previous pass produced.
fn apply_fix_all(
    host: &CleanupHost<'_>,
    snapshot: DocumentSnapshot,
    categories: &[CategoryId],
    cancel: &CancelToken,
) -> CleanupResult<DocumentSnapshot> {
    let mut current = snapshot;

    for category in categories {
        checkpoint(cancel)?;

        let found =
            host.fix_discovery
                .find_fixes(&current, current.full_span(), category, cancel)?;
        let Some(collection) = found else {
            continue;
        };
        if collection.is_empty() {
            continue;
        }

        debug!(
            category = %category,
            edits = collection.edits.len(),
            "applying fix-all"
        );
        let request = FixAllRequest {
            snapshot: &current,
            collection,
        };
        current = host.fix_all.compute_fix_all(&request, cancel)?;
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        InMemoryBackingStore, InMemoryConfig, RuleFixService, builtin_import_remover,
        builtin_import_sorter,
    };
    use crate::error::CleanupError;
    use crate::ports::{BackingStore, FixDiscovery};
    use codesweep_rules::categories;
    use codesweep_types::{DocumentId, FixCollection, Language, TextSpan};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn rust_snapshot(text: &str) -> DocumentSnapshot {
        DocumentSnapshot::new(DocumentId::new("mem/lib.rs"), Language::Rust, text)
    }

    fn host<'a>(
        config: &'a InMemoryConfig,
        fixes: &'a RuleFixService,
        store: &'a InMemoryBackingStore,
    ) -> CleanupHost<'a> {
        CleanupHost {
            config,
            import_remover: builtin_import_remover(Language::Rust),
            import_sorter: builtin_import_sorter(Language::Rust),
            fix_discovery: fixes,
            fix_all: fixes,
            store,
        }
    }

    fn run(
        host: &CleanupHost<'_>,
        snapshot: DocumentSnapshot,
    ) -> CleanupResult<CleanupOutcome> {
        cleanup_document(
            host,
            &FeatureRegistry::builtin(),
            snapshot,
            &CleanupSettings::default(),
            &CancelToken::new(),
        )
    }

    #[test]
    fn everything_disabled_is_a_no_op() {
        let config = InMemoryConfig::default();
        let fixes = RuleFixService::new();
        let store = InMemoryBackingStore::new();
        let host = host(&config, &fixes, &store);

        let outcome = run(&host, rust_snapshot("a  \nb\t\n\n\n")).expect("cleanup");
        assert!(outcome.is_clean());
        assert!(!outcome.committed);
        assert_eq!(outcome.cleaned.text(), "a  \nb\t\n\n\n");
        assert_eq!(store.commit_count(), 0);
    }

    #[test]
    fn clean_document_never_reaches_the_store() {
        let mut config = InMemoryConfig::default();
        config.set(flags::NORMALIZE_WHITESPACE, true);
        let fixes = RuleFixService::new();
        let store = InMemoryBackingStore::new();
        let host = host(&config, &fixes, &store);

        let outcome = run(&host, rust_snapshot("fn main() {}\n")).expect("cleanup");
        assert!(outcome.is_clean());
        assert!(!outcome.committed);
        assert_eq!(store.commit_count(), 0);
    }

    #[test]
    fn normalizer_is_idempotent() {
        let mut config = InMemoryConfig::default();
        config.set(flags::REMOVE_UNUSED_IMPORTS, true);
        config.set(flags::SORT_IMPORTS, true);
        let fixes = RuleFixService::new();
        let store = InMemoryBackingStore::new();
        let host = host(&config, &fixes, &store);

        let text = "use z::Z;\nuse a::Unused;\nuse b::B;\n\nfn f(_: B, _: Z) {}\n";
        store.insert("mem/lib.rs", text);
        let first = run(&host, rust_snapshot(text)).expect("first pass");
        assert!(first.committed);

        let second = run(&host, first.cleaned.clone()).expect("second pass");
        assert!(second.is_clean());
        assert_eq!(second.cleaned.text(), first.cleaned.text());
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn category_order_is_observable() {
        // Trailing whitespace on an otherwise blank line: trimming first
        // creates a strictly empty line that blank-line collapsing then
        // sees. The reverse order would miss it.
        let mut config = InMemoryConfig::default();
        config.set(flags::TRIM_TRAILING_WHITESPACE, true);
        config.set(flags::COLLAPSE_BLANK_LINES, true);
        let fixes = RuleFixService::new();
        let store = InMemoryBackingStore::new();
        let host = host(&config, &fixes, &store);

        let text = "a\n\n  \nb\n";
        store.insert("mem/lib.rs", text);
        let outcome = run(&host, rust_snapshot(text)).expect("cleanup");
        assert_eq!(outcome.cleaned.text(), "a\n\nb\n");
        assert!(outcome.committed);
    }

    #[test]
    fn duplicate_categories_are_reprocessed_harmlessly() {
        // trim_trailing is selected twice: once by its own flag, once via
        // normalize_whitespace. The second pass finds nothing.
        let mut config = InMemoryConfig::default();
        config.set(flags::TRIM_TRAILING_WHITESPACE, true);
        config.set(flags::NORMALIZE_WHITESPACE, true);
        let fixes = RuleFixService::new();
        let store = InMemoryBackingStore::new();
        let host = host(&config, &fixes, &store);

        let text = "a  \nb\n";
        store.insert("mem/lib.rs", text);
        let outcome = run(&host, rust_snapshot(text)).expect("cleanup");
        assert_eq!(outcome.cleaned.text(), "a\nb\n");
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn pre_cancelled_token_aborts_before_any_work() {
        let mut config = InMemoryConfig::default();
        config.set(flags::NORMALIZE_WHITESPACE, true);
        let fixes = RuleFixService::new();
        let store = InMemoryBackingStore::new();
        store.insert("mem/lib.rs", "a  \n");
        let host = host(&config, &fixes, &store);

        let cancel = CancelToken::new();
        cancel.cancel();
        let err = cleanup_document(
            &host,
            &FeatureRegistry::builtin(),
            rust_snapshot("a  \n"),
            &CleanupSettings::default(),
            &cancel,
        )
        .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(store.commit_count(), 0);
        assert_eq!(
            store.get(&"mem/lib.rs".into()).as_deref(),
            Some("a  \n")
        );
    }

    #[test]
    fn full_run_commits_exactly_once() {
        let mut config = InMemoryConfig::default();
        config.set(flags::REMOVE_UNUSED_IMPORTS, true);
        config.set(flags::SORT_IMPORTS, true);
        config.set(flags::NORMALIZE_WHITESPACE, true);
        let fixes = RuleFixService::new();
        let store = InMemoryBackingStore::new();
        let host = host(&config, &fixes, &store);

        let text = "use z::Z;\nuse a::Unused;\nuse b::B;\n\n\n\nfn f(_: B, _: Z) {}  \n";
        store.insert("mem/lib.rs", text);
        let outcome = run(&host, rust_snapshot(text)).expect("cleanup");

        let cleaned = outcome.cleaned.text();
        assert!(!cleaned.contains("Unused"));
        assert!(cleaned.find("use b::B;").unwrap() < cleaned.find("use z::Z;").unwrap());
        assert!(!cleaned.contains("\n\n\n"));
        assert!(cleaned.ends_with("fn f(_: B, _: Z) {}\n"));

        assert!(outcome.committed);
        assert_eq!(store.commit_count(), 1);
        assert_eq!(
            store.get(&"mem/lib.rs".into()).as_deref(),
            Some(cleaned)
        );
    }

    #[test]
    fn dry_run_computes_changes_but_skips_commit() {
        let mut config = InMemoryConfig::default();
        config.set(flags::NORMALIZE_WHITESPACE, true);
        let fixes = RuleFixService::new();
        let store = InMemoryBackingStore::new();
        store.insert("mem/lib.rs", "a  \n");
        let host = host(&config, &fixes, &store);

        let outcome = cleanup_document(
            &host,
            &FeatureRegistry::builtin(),
            rust_snapshot("a  \n"),
            &CleanupSettings::dry_run(),
            &CancelToken::new(),
        )
        .expect("cleanup");

        assert!(!outcome.changes.is_empty());
        assert!(!outcome.committed);
        assert_eq!(store.commit_count(), 0);
        assert_eq!(store.get(&"mem/lib.rs".into()).as_deref(), Some("a  \n"));
    }

    #[test]
    fn store_conflict_surfaces_unretried() {
        let mut config = InMemoryConfig::default();
        config.set(flags::NORMALIZE_WHITESPACE, true);
        let fixes = RuleFixService::new();
        let store = InMemoryBackingStore::new();
        // The store holds newer content than the snapshot we run with.
        store.insert("mem/lib.rs", "edited elsewhere\n");
        let host = host(&config, &fixes, &store);

        let err = run(&host, rust_snapshot("a  \n")).unwrap_err();
        match err {
            CleanupError::StoreConflict { path, .. } => assert_eq!(path, "mem/lib.rs"),
            other => panic!("expected store conflict, got {other}"),
        }
        assert_eq!(
            store.get(&"mem/lib.rs".into()).as_deref(),
            Some("edited elsewhere\n")
        );
    }

    #[test]
    fn missing_import_collaborator_is_a_silent_no_op() {
        let mut config = InMemoryConfig::default();
        config.set(flags::REMOVE_UNUSED_IMPORTS, true);
        config.set(flags::SORT_IMPORTS, true);
        let fixes = RuleFixService::new();
        let store = InMemoryBackingStore::new();
        let host = CleanupHost {
            config: &config,
            import_remover: builtin_import_remover(Language::Python),
            import_sorter: builtin_import_sorter(Language::Python),
            fix_discovery: &fixes,
            fix_all: &fixes,
            store: &store,
        };

        let snap = DocumentSnapshot::new(
            DocumentId::new("mem/script.py"),
            Language::Python,
            "import os\nimport sys\n",
        );
        let outcome = cleanup_document(
            &host,
            &FeatureRegistry::builtin(),
            snap,
            &CleanupSettings::default(),
            &CancelToken::new(),
        )
        .expect("cleanup");
        assert!(outcome.is_clean());
        assert_eq!(store.commit_count(), 0);
    }

    /// Discovery stub that records the order categories arrive in and
    /// never proposes anything.
    struct RecordingDiscovery {
        seen: Mutex<Vec<String>>,
    }

    impl FixDiscovery for RecordingDiscovery {
        fn find_fixes(
            &self,
            _snapshot: &DocumentSnapshot,
            _span: TextSpan,
            category: &CategoryId,
            _cancel: &CancelToken,
        ) -> CleanupResult<Option<FixCollection>> {
            self.seen
                .lock()
                .expect("lock seen")
                .push(category.as_str().to_string());
            Ok(None)
        }
    }

    #[test]
    fn discovery_sees_registry_order_with_duplicates() {
        let mut config = InMemoryConfig::default();
        config.set(flags::COLLAPSE_BLANK_LINES, true);
        config.set(flags::NORMALIZE_WHITESPACE, true);
        let recorder = RecordingDiscovery {
            seen: Mutex::new(Vec::new()),
        };
        let fixes = RuleFixService::new();
        let store = InMemoryBackingStore::new();
        let host = CleanupHost {
            config: &config,
            import_remover: None,
            import_sorter: None,
            fix_discovery: &recorder,
            fix_all: &fixes,
            store: &store,
        };

        run(&host, rust_snapshot("whatever\n")).expect("cleanup");
        let seen = recorder.seen.lock().expect("lock seen").clone();
        assert_eq!(
            seen,
            vec![
                categories::COLLAPSE_BLANK_LINES.to_string(),
                categories::TRIM_TRAILING.to_string(),
                categories::TABS_TO_SPACES.to_string(),
                categories::COLLAPSE_BLANK_LINES.to_string(),
                categories::FINAL_NEWLINE.to_string(),
            ]
        );
    }

    /// Store stub that always faults, to show errors pass through
    /// untranslated.
    struct FailingStore;

    impl BackingStore for FailingStore {
        fn apply_changes(
            &self,
            _original: &DocumentSnapshot,
            _changes: &[TextChange],
            _cancel: &CancelToken,
        ) -> CleanupResult<()> {
            Err(CleanupError::Other(anyhow::anyhow!("disk on fire")))
        }
    }

    #[test]
    fn store_faults_propagate() {
        let mut config = InMemoryConfig::default();
        config.set(flags::TRIM_TRAILING_WHITESPACE, true);
        let fixes = RuleFixService::new();
        let host = CleanupHost {
            config: &config,
            import_remover: None,
            import_sorter: None,
            fix_discovery: &fixes,
            fix_all: &fixes,
            store: &FailingStore,
        };

        let err = run(&host, rust_snapshot("a  \n")).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("disk on fire"));
    }
}
