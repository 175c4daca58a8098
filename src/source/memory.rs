//! In-memory source, for previews and tests.

use super::FileSource;
use crate::error::{Result, RewriteError};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// Files held in memory, keyed by path.
///
/// Writes to paths marked with [`fail_writes_to`](MemorySource::fail_writes_to)
/// return a permission error instead of storing the content.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, String>,
    read_only: BTreeSet<PathBuf>,
    writes: usize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    pub fn file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Makes writes to `path` fail.
    pub fn fail_writes_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.read_only.insert(path.into());
        self
    }

    /// Returns the current content of a file.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    /// Returns how many writes succeeded.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl FileSource for MemorySource {
    fn discover(&self) -> Result<Vec<PathBuf>> {
        Ok(self.files.keys().cloned().collect())
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| RewriteError::Read {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            })
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        if self.read_only.contains(path) {
            return Err(RewriteError::Write {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.files.insert(path.to_path_buf(), content.to_string());
        self.writes += 1;
        Ok(())
    }
}
