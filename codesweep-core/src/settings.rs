//! Clap-free settings for the cleanup pipeline.

/// Behavioural switches for one cleanup invocation.
#[derive(Debug, Clone, Default)]
pub struct CleanupSettings {
    /// Compute the cleaned snapshot and change set but skip the commit.
    pub dry_run: bool,
}

impl CleanupSettings {
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}
