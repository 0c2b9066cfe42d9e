mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use codesweep_core::adapters::{
    FsBackingStore, RuleFixService, builtin_import_remover, builtin_import_sorter,
};
use codesweep_core::{
    CleanupError, CleanupHost, CleanupResult, CleanupSettings, FeatureRegistry, cleanup_document,
    flags,
};
use codesweep_edit::render_patch;
use codesweep_types::{CancelToken, DocumentId, DocumentSnapshot, Language};
use config::ConfigMerger;
use fs_err as fs;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "codesweep",
    version,
    about = "Single-file cleanup: normalize imports, apply enabled fix categories, commit one combined edit."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Clean one source file according to the enabled feature flags.
    Clean(CleanArgs),
    /// List the known feature flags and the fix categories behind them.
    ListFlags(ListFlagsArgs),
}

#[derive(Debug, Parser)]
struct CleanArgs {
    /// File to clean.
    file: Utf8PathBuf,

    /// Config file (default: codesweep.toml next to the file).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Enable a feature flag for this run (repeatable).
    #[arg(long)]
    enable: Vec<String>,

    /// Disable a feature flag for this run (repeatable).
    #[arg(long)]
    disable: Vec<String>,

    /// Override language detection from the file extension.
    #[arg(long, value_enum)]
    language: Option<LanguageArg>,

    /// Compute and print the change set without writing the file.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Emit the change set as JSON instead of a unified diff.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Suppress diff output; exit code alone reports the result.
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[derive(Debug, Parser)]
struct ListFlagsArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LanguageArg {
    Rust,
    Python,
    Markdown,
    Plain,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Rust => Language::Rust,
            LanguageArg::Python => Language::Python,
            LanguageArg::Markdown => Language::Markdown,
            LanguageArg::Plain => Language::Plain,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Clean(args) => cmd_clean(args),
        Command::ListFlags(args) => cmd_list_flags(args).map_err(CleanupError::from),
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn cmd_clean(args: CleanArgs) -> CleanupResult<()> {
    let text = fs::read_to_string(&args.file).with_context(|| format!("read {}", args.file))?;
    let language = args
        .language
        .map(Language::from)
        .unwrap_or_else(|| Language::from_path(&args.file));

    let file_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => {
            let dir = args.file.parent().unwrap_or(Utf8Path::new("."));
            config::load_or_default(dir)?
        }
    };

    let registry = FeatureRegistry::global();
    let options = ConfigMerger::new(file_config.into_options()?).merge_cli_flags(
        &args.enable,
        &args.disable,
        language,
        registry,
    )?;

    let fixes = RuleFixService::new();
    let store = FsBackingStore;
    let host = CleanupHost {
        config: &options,
        import_remover: builtin_import_remover(language),
        import_sorter: builtin_import_sorter(language),
        fix_discovery: &fixes,
        fix_all: &fixes,
        store: &store,
    };

    let snapshot = DocumentSnapshot::new(DocumentId::new(args.file.clone()), language, text);
    let settings = if args.dry_run {
        CleanupSettings::dry_run()
    } else {
        CleanupSettings::default()
    };
    // The CLI runs a single one-shot pass; embedders trip the token.
    let cancel = CancelToken::new();

    let outcome = cleanup_document(&host, registry, snapshot, &settings, &cancel)?;

    if args.json {
        let report = serde_json::json!({
            "file": args.file,
            "language": language.as_str(),
            "committed": outcome.committed,
            "changes": outcome.changes,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize json")?
        );
        return Ok(());
    }

    if outcome.is_clean() {
        if !args.quiet {
            println!("{}: already clean", args.file);
        }
        return Ok(());
    }

    if !args.quiet {
        print!(
            "{}",
            render_patch(args.file.as_str(), outcome.original.text(), outcome.cleaned.text())
        );
    }
    if outcome.committed {
        info!(file = args.file.as_str(), changes = outcome.changes.len(), "cleaned");
    } else {
        info!(file = args.file.as_str(), changes = outcome.changes.len(), "dry run, file not written");
    }
    Ok(())
}

fn cmd_list_flags(args: ListFlagsArgs) -> anyhow::Result<()> {
    let registry = FeatureRegistry::global();

    match args.format {
        OutputFormat::Text => {
            println!("Available feature flags:\n");
            println!("  {:<28} CATEGORIES", "FLAG");
            println!("  {:<28} ----------", "----");
            println!("  {:<28} (import normalizer)", flags::REMOVE_UNUSED_IMPORTS);
            println!("  {:<28} (import normalizer)", flags::SORT_IMPORTS);
            for (flag, categories) in registry.entries() {
                let ids: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
                println!("  {:<28} {}", flag, ids.join(", "));
            }
            println!();
            println!("Enable flags in codesweep.toml or with 'codesweep clean --enable <flag>'.");
        }
        OutputFormat::Json => {
            let mut entries: Vec<serde_json::Value> = vec![
                serde_json::json!({ "flag": flags::REMOVE_UNUSED_IMPORTS, "categories": [] }),
                serde_json::json!({ "flag": flags::SORT_IMPORTS, "categories": [] }),
            ];
            entries.extend(registry.entries().map(|(flag, categories)| {
                serde_json::json!({ "flag": flag, "categories": categories })
            }));
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}
