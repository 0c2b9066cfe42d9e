//! Feature registry and diagnostic selector.
//!
//! The registry is a read-only ordered mapping from feature flags to the
//! diagnostic categories that implement them. One flag may map to several
//! categories, and the same category may appear under more than one flag;
//! the selector deliberately does not deduplicate (a category selected
//! twice finds nothing to fix the second time).

use crate::ports::ConfigPort;
use codesweep_types::{CategoryId, Language};
use std::sync::OnceLock;

/// Stable feature flag keys.
///
/// `remove_unused_imports` and `sort_imports` live in the same config
/// namespace as the category flags but are consumed by the import
/// normalizer, not the selector, so they carry no registry entry.
pub mod flags {
    pub const REMOVE_UNUSED_IMPORTS: &str = "remove_unused_imports";
    pub const SORT_IMPORTS: &str = "sort_imports";
    pub const TRIM_TRAILING_WHITESPACE: &str = "trim_trailing_whitespace";
    pub const COLLAPSE_BLANK_LINES: &str = "collapse_blank_lines";
    pub const TABS_TO_SPACES: &str = "tabs_to_spaces";
    pub const ENSURE_FINAL_NEWLINE: &str = "ensure_final_newline";
    pub const NORMALIZE_WHITESPACE: &str = "normalize_whitespace";
}

/// Ordered flag → categories mapping.
#[derive(Debug, Clone)]
pub struct FeatureRegistry {
    entries: Vec<(String, Vec<CategoryId>)>,
}

impl FeatureRegistry {
    /// The builtin mapping. An empty category list for a known flag is a
    /// configuration bug, not a runtime fault, so this is infallible.
    pub fn builtin() -> Self {
        use codesweep_rules::categories;

        let entry = |flag: &str, cats: &[&str]| {
            (
                flag.to_string(),
                cats.iter().map(|c| CategoryId::new(*c)).collect(),
            )
        };

        Self {
            entries: vec![
                entry(flags::TRIM_TRAILING_WHITESPACE, &[categories::TRIM_TRAILING]),
                entry(
                    flags::COLLAPSE_BLANK_LINES,
                    &[categories::COLLAPSE_BLANK_LINES],
                ),
                entry(flags::TABS_TO_SPACES, &[categories::TABS_TO_SPACES]),
                entry(flags::ENSURE_FINAL_NEWLINE, &[categories::FINAL_NEWLINE]),
                // One flag, several categories; overlaps with the
                // individual flags above on purpose.
                entry(
                    flags::NORMALIZE_WHITESPACE,
                    &[
                        categories::TRIM_TRAILING,
                        categories::TABS_TO_SPACES,
                        categories::COLLAPSE_BLANK_LINES,
                        categories::FINAL_NEWLINE,
                    ],
                ),
            ],
        }
    }

    /// Process-wide memoized instance. Built at most once even under
    /// concurrent first access; entry points still take the registry as
    /// an explicit parameter, this is a convenience for hosts.
    pub fn global() -> &'static FeatureRegistry {
        static GLOBAL: OnceLock<FeatureRegistry> = OnceLock::new();
        GLOBAL.get_or_init(FeatureRegistry::builtin)
    }

    /// Explicit construction, mostly for tests.
    pub fn new(entries: Vec<(String, Vec<CategoryId>)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[CategoryId])> {
        self.entries
            .iter()
            .map(|(flag, cats)| (flag.as_str(), cats.as_slice()))
    }

    /// All flag keys the registry knows, plus the normalizer flags, in
    /// presentation order.
    pub fn known_flags(&self) -> Vec<&str> {
        let mut out = vec![flags::REMOVE_UNUSED_IMPORTS, flags::SORT_IMPORTS];
        out.extend(self.entries.iter().map(|(flag, _)| flag.as_str()));
        out
    }
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Ordered categories to fix for this configuration and language.
///
/// Registry iteration order is preserved; duplicates are kept; absent
/// options read as disabled.
pub fn select_categories(
    config: &dyn ConfigPort,
    language: Language,
    registry: &FeatureRegistry,
) -> Vec<CategoryId> {
    let mut selected = Vec::new();
    for (flag, categories) in registry.entries() {
        if config.bool_option(flag, language).unwrap_or(false) {
            selected.extend_from_slice(categories);
        }
    }
    selected
}
