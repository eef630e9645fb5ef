//! Batch rewriting of documentation trees.
//!
//! Discovers Markdown and MDX files, runs each through the rewriter, and
//! writes back only the files that changed.

pub mod discover;
pub mod runner;
pub mod store;

pub use discover::{discover, DEFAULT_EXTENSIONS};
pub use runner::{BatchConfig, BatchError, BatchReport, BatchRunner, FileOutcome, FileReport};
pub use store::{backup_path, DocumentStore, FsStore};
