//! File system backed source.

use super::{FileMatcher, FileSource};
use crate::error::{Result, RewriteError};
use std::fs;
use std::path::{Path, PathBuf};

/// Files under a root directory selected by a [`FileMatcher`].
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    matcher: FileMatcher,
}

impl FsSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, matcher: FileMatcher) -> Self {
        Self {
            root: root.into(),
            matcher,
        }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileSource for FsSource {
    fn discover(&self) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(&self.root).map_err(|e| RewriteError::Enumeration {
            path: self.root.clone(),
            message: e.to_string(),
        })?;
        if !metadata.is_dir() {
            return Err(RewriteError::Enumeration {
                path: self.root.clone(),
                message: "not a directory".to_string(),
            });
        }
        self.matcher.collect(&self.root)
    }

    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| RewriteError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).map_err(|source| RewriteError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
