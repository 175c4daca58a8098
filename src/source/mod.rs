//! Where text units come from and where rewritten content goes.

mod fs;
mod matcher;
mod memory;

pub use fs::FsSource;
pub use matcher::{FileMatcher, Walk};
pub use memory::MemorySource;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// A finite, restartable collection of files that can be read and written.
///
/// Each call to [`discover`](FileSource::discover) enumerates the files anew.
pub trait FileSource {
    /// Lists the files to process, in a stable order.
    fn discover(&self) -> Result<Vec<PathBuf>>;

    /// Reads a file's full content.
    fn read(&self, path: &Path) -> Result<String>;

    /// Replaces a file's content.
    fn write(&mut self, path: &Path, content: &str) -> Result<()>;
}
