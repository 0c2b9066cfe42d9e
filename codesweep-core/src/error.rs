//! Error taxonomy for a cleanup run.
//!
//! Three tiers, mirrored in CLI exit codes:
//! - cancellation (130): cooperative abort, nothing was committed
//! - store conflict (2): the document changed under us; re-run on a fresh
//!   snapshot if desired, this layer never retries
//! - runtime (1): collaborator faults, propagated untranslated

use codesweep_types::CancelToken;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanupError {
    /// The cancel token tripped at a suspension point. No partial commit
    /// occurred; the original document is untouched.
    #[error("cleanup cancelled")]
    Cancelled,

    /// The backing store found the live document diverged from the
    /// original snapshot at commit time.
    #[error("backing store conflict for {path}: {message}")]
    StoreConflict { path: String, message: String },

    /// Any other collaborator fault. This orchestration has no
    /// domain-specific recovery for these; they surface as-is.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CleanupError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CleanupError::Cancelled)
    }

    /// Recommended process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CleanupError::Cancelled => 130,
            CleanupError::StoreConflict { .. } => 2,
            CleanupError::Other(_) => 1,
        }
    }
}

pub type CleanupResult<T> = Result<T, CleanupError>;

/// Observe the cancel token at a suspension point.
pub fn checkpoint(cancel: &CancelToken) -> CleanupResult<()> {
    if cancel.is_cancelled() {
        Err(CleanupError::Cancelled)
    } else {
        Ok(())
    }
}
