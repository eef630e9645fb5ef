//! Batch runner.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use mdxfix_core::{RewriteStats, Rewriter, RuleConfig, RuleError, RuleSet};
use rayon::prelude::*;
use serde::Serialize;

use crate::store::DocumentStore;

/// Configuration for a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Rules applied to every document
    pub rules: RuleConfig,

    /// Report what would change without writing anything
    pub dry_run: bool,

    /// Rewrite documents on the rayon thread pool
    pub parallel: bool,
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    Unchanged,
    /// Rewritten, or would be in a dry run
    Changed,
    /// The path does not exist
    Missing,
    /// The file exists but could not be read as text
    Unreadable { reason: String },
}

impl FileOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Missing | Self::Unreadable { .. })
    }
}

/// Result for a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
    pub stats: RewriteStats,
}

impl FileReport {
    fn skipped(path: &Path, outcome: FileOutcome) -> Self {
        Self {
            path: path.to_path_buf(),
            outcome,
            stats: RewriteStats::default(),
        }
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Number of paths given to the run
    pub scanned: usize,

    /// Number of files rewritten (or needing a rewrite in a dry run)
    pub changed: usize,

    /// Number of missing or unreadable files
    pub skipped: usize,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Totals across all files
    pub stats: RewriteStats,

    /// Per-file results, in input order
    pub files: Vec<FileReport>,

    /// Total run time in milliseconds
    pub duration_ms: u64,
}

impl BatchReport {
    /// Paths of the files that changed.
    pub fn changed_paths(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|f| f.outcome == FileOutcome::Changed)
            .map(|f| f.path.as_path())
    }

    fn push(&mut self, file: FileReport) {
        self.scanned += 1;
        match file.outcome {
            FileOutcome::Changed => self.changed += 1,
            ref outcome if outcome.is_skipped() => self.skipped += 1,
            _ => {}
        }
        self.stats += file.stats;
        self.files.push(file);
    }
}

/// Errors that stop a batch run.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Docs directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Failed to build rules: {0}")]
    Rules(#[from] RuleError),

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Rewrites a list of documents through a store.
pub struct BatchRunner<S> {
    config: BatchConfig,
    rewriter: Rewriter,
    store: S,
}

impl<S: DocumentStore> BatchRunner<S> {
    /// Create a runner, building the configured rule set.
    pub fn new(config: BatchConfig, store: S) -> Result<Self, BatchError> {
        let rules = RuleSet::from_config(&config.rules)?;

        tracing::debug!(
            "Active rules: {}",
            rules
                .rules()
                .iter()
                .map(|r| r.kind().name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            config,
            rewriter: Rewriter::new(rules),
            store,
        })
    }

    /// Rewrite every path, writing back only files whose text changed.
    ///
    /// Missing and unreadable files are logged and skipped. A failed write
    /// stops the run.
    pub fn run(&self, paths: &[PathBuf]) -> Result<BatchReport, BatchError> {
        let start = Instant::now();
        tracing::debug!(
            "Processing {} files{}",
            paths.len(),
            if self.config.parallel { " in parallel" } else { "" }
        );

        let files = if self.config.parallel {
            paths
                .par_iter()
                .map(|path| self.process(path))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            paths
                .iter()
                .map(|path| self.process(path))
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut report = BatchReport {
            dry_run: self.config.dry_run,
            ..BatchReport::default()
        };
        for file in files {
            report.push(file);
        }
        report.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Done. Files {}: {}/{}",
            if self.config.dry_run {
                "needing changes"
            } else {
                "updated"
            },
            report.changed,
            report.scanned
        );

        Ok(report)
    }

    /// Rewrite a single file.
    fn process(&self, path: &Path) -> Result<FileReport, BatchError> {
        let source = match self.store.read(path) {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("File not found: {}", path.display());
                return Ok(FileReport::skipped(path, FileOutcome::Missing));
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                return Ok(FileReport::skipped(
                    path,
                    FileOutcome::Unreadable {
                        reason: e.to_string(),
                    },
                ));
            }
        };

        let rewrite = self.rewriter.rewrite(&source);

        if let Some(line) = rewrite.stats.unclosed_fence {
            tracing::warn!(
                "{}: code fence opened at line {} is never closed; rest of file left as is",
                path.display(),
                line
            );
        }

        if !rewrite.is_changed(&source) {
            tracing::debug!("No changes needed in {}", path.display());
            return Ok(FileReport {
                path: path.to_path_buf(),
                outcome: FileOutcome::Unchanged,
                stats: rewrite.stats,
            });
        }

        if self.config.dry_run {
            tracing::info!("Would update: {}", path.display());
        } else {
            self.store
                .write(path, &rewrite.text)
                .map_err(|source| BatchError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            tracing::info!("Updated: {}", path.display());
        }

        Ok(FileReport {
            path: path.to_path_buf(),
            outcome: FileOutcome::Changed,
            stats: rewrite.stats,
        })
    }
}
