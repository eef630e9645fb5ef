pub mod check;
pub mod fix;
pub mod init;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use mdxfix_batch::{discover, BatchConfig, BatchReport, BatchRunner, FsStore};
use mdxfix_core::PlaceholderMode;

use crate::config::{load_config, ConfigFile};

/// How the final report is printed.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Log lines only
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

/// Options shared by `fix` and `check`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Files or directories to process (defaults to the configured docs dir)
    pub paths: Vec<PathBuf>,

    /// Also wrap any <token> that is not an HTML element name
    #[arg(long)]
    pub generic_placeholders: bool,

    /// Rewrite files in parallel
    #[arg(long, conflicts_with = "no_parallel")]
    pub parallel: bool,

    /// Rewrite files one at a time, even if the config enables parallel mode
    #[arg(long)]
    pub no_parallel: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Load config, resolve targets and run the batch.
pub(crate) fn run_batch(
    config_path: &Path,
    args: &RunArgs,
    dry_run: bool,
    backup: impl FnOnce(&ConfigFile) -> bool,
) -> Result<BatchReport> {
    let file_config = load_config(config_path)?;
    let targets = resolve_targets(&args.paths, &file_config)?;

    let mut rules = file_config.rules.clone();
    if args.generic_placeholders {
        rules.placeholders = PlaceholderMode::Generic;
    }

    let config = BatchConfig {
        rules,
        dry_run,
        parallel: !args.no_parallel && (args.parallel || file_config.output.parallel),
    };
    let store = FsStore::new(!dry_run && backup(&file_config));

    let report = BatchRunner::new(config, store)?.run(&targets)?;

    if let OutputFormat::Json = args.format {
        let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{}", json);
    }

    Ok(report)
}

/// Expand explicit paths, or fall back to the configured docs directory.
///
/// Directories are searched recursively. Explicit file paths are kept even
/// when they do not exist, so the runner reports them as missing. Each path
/// appears once, even when arguments overlap.
fn resolve_targets(paths: &[PathBuf], config: &ConfigFile) -> Result<Vec<PathBuf>> {
    let extensions = &config.docs.extensions;

    if paths.is_empty() {
        return discover(&config.docs.dir, extensions)
            .context("Run 'mdxfix init' or pass paths explicitly");
    }

    let mut targets = BTreeSet::new();
    for path in paths {
        if path.is_dir() {
            targets.extend(discover(path, extensions)?);
        } else {
            targets.insert(path.clone());
        }
    }

    Ok(targets.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::tempdir;

    #[test]
    fn overlapping_paths_are_resolved_once() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("a.md"), "a").unwrap();
        fs::write(docs.join("b.mdx"), "b").unwrap();

        let targets = resolve_targets(
            &[docs.clone(), docs.join("a.md"), docs.join("a.md")],
            &ConfigFile::default(),
        )
        .unwrap();

        assert_eq!(targets, vec![docs.join("a.md"), docs.join("b.mdx")]);
    }

    #[test]
    fn missing_explicit_file_is_kept() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("gone.md");

        let targets = resolve_targets(&[missing.clone()], &ConfigFile::default()).unwrap();

        assert_eq!(targets, vec![missing]);
    }
}
