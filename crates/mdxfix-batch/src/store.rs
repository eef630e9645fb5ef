//! Reading and writing documents.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where documents are read from and written back to.
pub trait DocumentStore: Send + Sync {
    /// Read a document as UTF-8 text.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// Replace a document's contents.
    fn write(&self, path: &Path, text: &str) -> io::Result<()>;
}

/// Filesystem store that rewrites files in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore {
    backup: bool,
}

impl FsStore {
    /// Create a store. With `backup` on, the first write to a file copies its
    /// current contents to a `.bak` sibling.
    pub fn new(backup: bool) -> Self {
        Self { backup }
    }
}

impl DocumentStore for FsStore {
    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, text: &str) -> io::Result<()> {
        if self.backup {
            let bak = backup_path(path);
            if !bak.exists() {
                fs::copy(path, &bak)?;
                tracing::debug!("Backed up {} to {}", path.display(), bak.display());
            }
        }

        fs::write(path, text)
    }
}

/// Backup location for a document: the full file name plus `.bak`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}
