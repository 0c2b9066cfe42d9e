//! Configuration file loading for codesweep.
//!
//! Discovers and loads `codesweep.toml` from the directory containing the
//! target file. Merges config file settings with CLI flag overrides (CLI
//! takes precedence, including over per-language tables).

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use codesweep_core::FeatureRegistry;
use codesweep_core::adapters::InMemoryConfig;
use codesweep_types::Language;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "codesweep.toml";

/// Top-level configuration from codesweep.toml.
///
/// The `[cleanup]` table holds language-independent flag defaults; nested
/// tables named after a language (`[cleanup.rust]`) override them for
/// documents of that language.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodesweepConfig {
    pub cleanup: toml::Table,
}

impl CodesweepConfig {
    /// Flatten the raw tables into an option store.
    ///
    /// Flag keys the registry does not know are kept (future flags read as
    /// noise, not faults); non-boolean flag values and unknown language
    /// table names are rejected.
    pub fn into_options(self) -> anyhow::Result<InMemoryConfig> {
        let mut options = InMemoryConfig::default();

        for (key, value) in &self.cleanup {
            match value {
                toml::Value::Boolean(enabled) => options.set(key, *enabled),
                toml::Value::Table(overrides) => {
                    let Some(language) = language_from_name(key) else {
                        bail!("unknown language table [cleanup.{key}]");
                    };
                    for (flag, value) in overrides {
                        let toml::Value::Boolean(enabled) = value else {
                            bail!("cleanup.{key}.{flag} must be a boolean");
                        };
                        options.set_for(language, flag, *enabled);
                    }
                }
                _ => bail!("cleanup.{key} must be a boolean or a language table"),
            }
        }

        Ok(options)
    }
}

fn language_from_name(name: &str) -> Option<Language> {
    match name {
        "rust" => Some(Language::Rust),
        "python" => Some(Language::Python),
        "markdown" => Some(Language::Markdown),
        "plain" => Some(Language::Plain),
        _ => None,
    }
}

/// Discover the codesweep.toml config file next to the target.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a codesweep.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<CodesweepConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<CodesweepConfig> {
    let config: CodesweepConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `dir`, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<CodesweepConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(CodesweepConfig::default()),
    }
}

/// Builder for merging config file options with CLI flag overrides.
pub struct ConfigMerger {
    options: InMemoryConfig,
}

impl ConfigMerger {
    pub fn new(options: InMemoryConfig) -> Self {
        Self { options }
    }

    /// Apply `--enable`/`--disable` overrides for a run over `language`.
    ///
    /// CLI flags must name a flag the registry knows, and they beat both
    /// the `[cleanup]` defaults and the per-language tables. `--disable`
    /// wins over `--enable` when the same flag appears in both.
    pub fn merge_cli_flags(
        mut self,
        enable: &[String],
        disable: &[String],
        language: Language,
        registry: &FeatureRegistry,
    ) -> anyhow::Result<InMemoryConfig> {
        let known = registry.known_flags();
        for (flags, enabled) in [(enable, true), (disable, false)] {
            for flag in flags {
                if !known.contains(&flag.as_str()) {
                    bail!(
                        "unknown feature flag '{}'; known flags: {}",
                        flag,
                        known.join(", ")
                    );
                }
                self.options.set(flag, enabled);
                self.options.set_for(language, flag, enabled);
            }
        }
        Ok(self.options)
    }
}
