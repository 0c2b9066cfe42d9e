//! Default implementations of the port traits.
//!
//! The rule-backed fix service and the builtin import services wire
//! `codesweep-rules` into the pipeline; the filesystem store commits the
//! final change set with a divergence check; the in-memory variants back
//! tests and embedders.

use crate::error::{CleanupError, CleanupResult, checkpoint};
use crate::ports::{
    BackingStore, ConfigPort, FixAllExecutor, FixAllRequest, FixDiscovery, ImportRemover,
    ImportSorter,
};
use anyhow::Context;
use camino::Utf8PathBuf;
use codesweep_rules::imports::{remove_unused_rust_imports, sort_rust_imports};
use codesweep_rules::{Rule, builtin_rules};
use codesweep_types::{
    CancelToken, CategoryId, DocumentSnapshot, FixCollection, Language, TextChange, TextSpan,
};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

// ── fix service ──────────────────────────────────────────────────────────

/// Fix discovery and fix-all execution backed by the builtin rules.
pub struct RuleFixService {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleFixService {
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    fn rule_for(&self, category: &CategoryId) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .map(|r| r.as_ref())
            .find(|r| &r.category() == category)
    }
}

impl Default for RuleFixService {
    fn default() -> Self {
        Self::new()
    }
}

impl FixDiscovery for RuleFixService {
    fn find_fixes(
        &self,
        snapshot: &DocumentSnapshot,
        span: TextSpan,
        category: &CategoryId,
        cancel: &CancelToken,
    ) -> CleanupResult<Option<FixCollection>> {
        checkpoint(cancel)?;

        let Some(rule) = self.rule_for(category) else {
            debug!(category = category.as_str(), "no provider for category");
            return Ok(None);
        };

        // Rules are full-document scanners; the span is the whole text.
        let text = &snapshot.text()[span.start..span.end()];
        let edits = rule.scan(text);
        if edits.is_empty() {
            return Ok(None);
        }
        debug!(
            category = category.as_str(),
            edits = edits.len(),
            "proposed fixes"
        );
        Ok(Some(FixCollection::new(category.clone(), edits)))
    }
}

impl FixAllExecutor for RuleFixService {
    fn compute_fix_all(
        &self,
        request: &FixAllRequest<'_>,
        cancel: &CancelToken,
    ) -> CleanupResult<DocumentSnapshot> {
        checkpoint(cancel)?;

        let next =
            codesweep_edit::apply_changes(request.snapshot.text(), &request.collection.edits)
                .with_context(|| format!("apply fixes for {}", request.collection.category))?;

        Ok(request.snapshot.with_text(next))
    }
}

// ── import services ──────────────────────────────────────────────────────

/// Builtin Rust import removal and sorting.
pub struct RustImportService;

static RUST_IMPORTS: RustImportService = RustImportService;

impl ImportRemover for RustImportService {
    fn remove_unused(
        &self,
        snapshot: &DocumentSnapshot,
        cancel: &CancelToken,
    ) -> CleanupResult<DocumentSnapshot> {
        checkpoint(cancel)?;
        Ok(snapshot.with_text(remove_unused_rust_imports(snapshot.text())))
    }
}

impl ImportSorter for RustImportService {
    fn sort(
        &self,
        snapshot: &DocumentSnapshot,
        cancel: &CancelToken,
    ) -> CleanupResult<DocumentSnapshot> {
        checkpoint(cancel)?;
        Ok(snapshot.with_text(sort_rust_imports(snapshot.text())))
    }
}

/// Builtin import remover for `language`, if one exists.
pub fn builtin_import_remover(language: Language) -> Option<&'static dyn ImportRemover> {
    match language {
        Language::Rust => Some(&RUST_IMPORTS),
        _ => None,
    }
}

/// Builtin import sorter for `language`, if one exists.
pub fn builtin_import_sorter(language: Language) -> Option<&'static dyn ImportSorter> {
    match language {
        Language::Rust => Some(&RUST_IMPORTS),
        _ => None,
    }
}

// ── configuration ────────────────────────────────────────────────────────

/// In-memory option store with per-language overrides falling back to
/// language-independent defaults.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfig {
    defaults: HashMap<String, bool>,
    per_language: HashMap<(Language, String), bool>,
}

impl InMemoryConfig {
    pub fn set(&mut self, key: &str, value: bool) {
        self.defaults.insert(key.to_string(), value);
    }

    pub fn set_for(&mut self, language: Language, key: &str, value: bool) {
        self.per_language
            .insert((language, key.to_string()), value);
    }
}

impl ConfigPort for InMemoryConfig {
    fn bool_option(&self, key: &str, language: Language) -> Option<bool> {
        self.per_language
            .get(&(language, key.to_string()))
            .or_else(|| self.defaults.get(key))
            .copied()
    }
}

// ── backing stores ───────────────────────────────────────────────────────

/// Commits the change set to the file named by the document identity.
///
/// Before writing, the on-disk bytes are hashed against the original
/// snapshot; a mismatch means another actor edited the document since the
/// run started, and the commit is rejected. No retry here.
#[derive(Debug, Clone, Default)]
pub struct FsBackingStore;

impl BackingStore for FsBackingStore {
    fn apply_changes(
        &self,
        original: &DocumentSnapshot,
        changes: &[TextChange],
        cancel: &CancelToken,
    ) -> CleanupResult<()> {
        checkpoint(cancel)?;

        let path = original.id().path();
        let on_disk =
            fs_err::read_to_string(path).with_context(|| format!("read {}", path))?;

        let expected = sha256_hex(original.text().as_bytes());
        let actual = sha256_hex(on_disk.as_bytes());
        if expected != actual {
            return Err(CleanupError::StoreConflict {
                path: path.to_string(),
                message: format!("content hash mismatch: expected {expected}, got {actual}"),
            });
        }

        let updated = codesweep_edit::apply_changes(original.text(), changes)
            .with_context(|| format!("compute updated text for {}", path))?;
        fs_err::write(path, &updated).with_context(|| format!("write {}", path))?;

        info!(path = path.as_str(), changes = changes.len(), "committed cleanup edit");
        Ok(())
    }
}

/// Stores document texts in memory; counts commits so tests can assert
/// the all-or-nothing contract.
#[derive(Debug, Default)]
pub struct InMemoryBackingStore {
    files: Mutex<HashMap<Utf8PathBuf, String>>,
    commits: Mutex<u64>,
}

impl InMemoryBackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<Utf8PathBuf>, text: impl Into<String>) {
        self.files
            .lock()
            .expect("lock files")
            .insert(path.into(), text.into());
    }

    pub fn get(&self, path: &Utf8PathBuf) -> Option<String> {
        self.files.lock().expect("lock files").get(path).cloned()
    }

    pub fn commit_count(&self) -> u64 {
        *self.commits.lock().expect("lock commits")
    }
}

impl BackingStore for InMemoryBackingStore {
    fn apply_changes(
        &self,
        original: &DocumentSnapshot,
        changes: &[TextChange],
        cancel: &CancelToken,
    ) -> CleanupResult<()> {
        checkpoint(cancel)?;

        let mut files = self.files.lock().expect("lock files");
        let path = original.id().path().to_path_buf();
        let stored = files.get(&path).cloned().unwrap_or_default();
        if stored != original.text() {
            return Err(CleanupError::StoreConflict {
                path: path.to_string(),
                message: "stored text diverged from original snapshot".to_string(),
            });
        }

        let updated = codesweep_edit::apply_changes(original.text(), changes)
            .with_context(|| format!("compute updated text for {}", path))?;
        files.insert(path, updated);
        *self.commits.lock().expect("lock commits") += 1;
        Ok(())
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
