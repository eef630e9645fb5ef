//! Document discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::runner::BatchError;

/// Extensions picked up when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Find all documents under `root` with one of the given extensions.
///
/// Extensions are compared case-insensitively and without the leading dot.
/// The result is sorted so runs are reproducible.
pub fn discover<S: AsRef<str>>(root: &Path, extensions: &[S]) -> Result<Vec<PathBuf>, BatchError> {
    if !root.exists() {
        return Err(BatchError::RootNotFound(root.to_path_buf()));
    }

    let mut paths = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).into_iter().filter_map(|e| match e {
        Ok(entry) => Some(entry),
        Err(err) => {
            tracing::warn!("Skipping unreadable entry: {}", err);
            None
        }
    }) {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        if extensions
            .iter()
            .any(|wanted| wanted.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
        {
            paths.push(path.to_path_buf());
        }
    }

    paths.sort();
    tracing::debug!("Discovered {} documents in {}", paths.len(), root.display());

    Ok(paths)
}
