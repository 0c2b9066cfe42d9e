use crate::change::TextSpan;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Source language of a document.
///
/// Collaborators (import removal, import sorting) are registered per
/// language; an unregistered language is a silent no-op, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Rust,
    Python,
    Markdown,
    /// Unrecognized extension; whitespace categories still apply.
    Plain,
}

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "rs" => Language::Rust,
            "py" => Language::Python,
            "md" | "markdown" => Language::Markdown,
            _ => Language::Plain,
        }
    }

    pub fn from_path(path: &Utf8Path) -> Self {
        path.extension()
            .map(Self::from_extension)
            .unwrap_or(Language::Plain)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::Markdown => "markdown",
            Language::Plain => "plain",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of a document across snapshots of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub Utf8PathBuf);

impl DocumentId {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Utf8Path {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Immutable, versioned view of a document's text at a point in time.
///
/// Never mutated in place: every transformation produces a new snapshot
/// with the same identity and a bumped version. The text is behind an
/// `Arc` so intermediate snapshots stay cheap to thread through the
/// pipeline.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    id: DocumentId,
    language: Language,
    version: u64,
    text: Arc<str>,
}

impl DocumentSnapshot {
    pub fn new(id: DocumentId, language: Language, text: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            language,
            version: 0,
            text: text.into(),
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Span covering the whole document, in this snapshot's coordinates.
    pub fn full_span(&self) -> TextSpan {
        TextSpan::new(0, self.text.len())
    }

    /// Produce the successor snapshot carrying `text`.
    ///
    /// Identity and language are preserved; the version is bumped even
    /// when the text is unchanged, so callers can use version equality to
    /// detect "no transformation ran" but must compare text to detect
    /// "nothing changed".
    pub fn with_text(&self, text: impl Into<Arc<str>>) -> Self {
        Self {
            id: self.id.clone(),
            language: self.language,
            version: self.version + 1,
            text: text.into(),
        }
    }
}
