//! File selection by extension, glob and content.

use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Outcome of one walk.
#[derive(Debug, Default)]
pub struct Walk {
    /// Matching files in path order.
    pub files: Vec<PathBuf>,
    /// Entries the walker could not read; each was logged once.
    pub skipped: Vec<PathBuf>,
}

/// Predicates for selecting the files a migration touches.
///
/// Globs are matched against paths relative to the walk root. An exclude
/// glob that matches a directory's contents prunes the whole directory.
#[derive(Debug, Default, Clone)]
pub struct FileMatcher {
    extensions: Vec<String>,
    include_globs: Vec<String>,
    exclude_globs: Vec<String>,
    content_patterns: Vec<String>,
    max_size: Option<u64>,
}

impl FileMatcher {
    /// Creates a matcher that accepts every file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one more extension, given without the dot.
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extensions.push(ext.into());
        self
    }

    pub fn extensions(mut self, exts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extensions.extend(exts.into_iter().map(Into::into));
        self
    }

    /// Only files matching at least one include glob are kept.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_globs.push(pattern.into());
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_globs.push(pattern.into());
        self
    }

    /// Only files whose text matches one of these regexes are kept.
    pub fn contains_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.content_patterns.push(pattern.into());
        self
    }

    /// Skips files larger than the given size in bytes.
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    /// Walks `root` and returns the matching files in path order.
    pub fn collect(&self, root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.walk(root)?.files)
    }

    /// Walks `root`, keeping track of entries that could not be read.
    ///
    /// Invalid globs or regexes fail here, before any file is visited.
    pub fn walk(&self, root: &Path) -> Result<Walk> {
        let compiled = Compiled {
            matcher: self,
            include: glob_set(&self.include_globs)?,
            exclude: glob_set(&self.exclude_globs)?,
            content: self
                .content_patterns
                .iter()
                .map(|p| Ok(Regex::new(p)?))
                .collect::<Result<Vec<_>>>()?,
        };

        let mut walk = Walk::default();
        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !compiled.prunes(root, entry));

        for entry in entries {
            match entry {
                Ok(entry) if entry.file_type().is_file() && compiled.accepts(root, &entry) => {
                    walk.files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    warn!(path = %path.display(), "skipping unreadable entry: {e}");
                    walk.skipped.push(path);
                }
            }
        }
        Ok(walk)
    }
}

struct Compiled<'a> {
    matcher: &'a FileMatcher,
    include: GlobSet,
    exclude: GlobSet,
    content: Vec<Regex>,
}

impl Compiled<'_> {
    fn relative<'p>(root: &Path, entry: &'p DirEntry) -> &'p Path {
        entry.path().strip_prefix(root).unwrap_or(entry.path())
    }

    // A directory is pruned when a file directly inside it would be excluded.
    fn prunes(&self, root: &Path, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .exclude
                .is_match(Self::relative(root, entry).join("_"))
    }

    fn accepts(&self, root: &Path, entry: &DirEntry) -> bool {
        let path = entry.path();
        let rel = Self::relative(root, entry);

        if !self.matcher.extensions.is_empty() {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !self
                .matcher
                .extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext))
            {
                return false;
            }
        }

        if !self.include.is_empty() && !self.include.is_match(rel) {
            return false;
        }
        if self.exclude.is_match(rel) {
            return false;
        }

        if let Some(max) = self.matcher.max_size
            && entry.metadata().map(|m| m.len() > max).unwrap_or(false)
        {
            return false;
        }

        // Reads the file, so it goes last.
        self.content.is_empty()
            || fs::read_to_string(path)
                .map(|text| self.content.iter().any(|re| re.is_match(&text)))
                .unwrap_or(false)
    }
}

fn glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// A small Maven-style tree with a build output directory.
    fn sirix_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let files: [(&str, &str); 5] = [
            (
                "src/main/java/io/sirix/page/PageKind.java",
                "package io.sirix.page;\nimport net.openhft.chronicle.bytes.Bytes;\nenum PageKind {}\n",
            ),
            (
                "src/main/java/io/sirix/page/NamePage.java",
                "package io.sirix.page;\nclass NamePage {}\n",
            ),
            (
                "src/test/java/io/sirix/page/PageTest.java",
                "package io.sirix.page;\nclass PageTest {}\n",
            ),
            ("build/generated/Stub.java", "class Stub {}\n"),
            ("README.md", "# Sirix\n"),
        ];
        for (rel, text) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, text).unwrap();
        }
        dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_extension_filter_in_path_order() {
        let dir = sirix_tree();
        let files = FileMatcher::new().extension("java").collect(dir.path()).unwrap();

        assert_eq!(
            names(&files),
            ["Stub.java", "NamePage.java", "PageKind.java", "PageTest.java"]
        );
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_excluded_directories_are_pruned() {
        let dir = sirix_tree();
        let files = FileMatcher::new()
            .extension("java")
            .exclude("build/**")
            .exclude("**/test/**")
            .collect(dir.path())
            .unwrap();

        assert_eq!(names(&files), ["NamePage.java", "PageKind.java"]);
    }

    #[test]
    fn test_exclude_single_file() {
        let dir = sirix_tree();
        let files = FileMatcher::new()
            .extension("java")
            .exclude("**/NamePage.java")
            .collect(dir.path())
            .unwrap();

        assert!(!names(&files).contains(&"NamePage.java".to_string()));
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_include_restricts_to_glob() {
        let dir = sirix_tree();
        let files = FileMatcher::new().include("src/test/**").collect(dir.path()).unwrap();
        assert_eq!(names(&files), ["PageTest.java"]);
    }

    #[test]
    fn test_content_pattern_selects_chronicle_users() {
        let dir = sirix_tree();
        let files = FileMatcher::new()
            .extension("java")
            .contains_pattern(r"net\.openhft\.chronicle")
            .collect(dir.path())
            .unwrap();
        assert_eq!(names(&files), ["PageKind.java"]);
    }

    #[test]
    fn test_size_limit() {
        let dir = sirix_tree();
        assert!(FileMatcher::new().max_size(5).collect(dir.path()).unwrap().is_empty());
        assert_eq!(FileMatcher::new().max_size(8).collect(dir.path()).unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_reported_and_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = sirix_tree();
        let locked = dir.path().join("src/locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("Hidden.java"), "class Hidden {}\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let privileged = fs::read_dir(&locked).is_ok();
        let walk = FileMatcher::new().extension("java").walk(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let walk = walk.unwrap();

        assert!(names(&walk.files).contains(&"PageKind.java".to_string()));
        if privileged {
            assert!(walk.skipped.is_empty());
        } else {
            assert_eq!(walk.skipped, vec![locked]);
            assert!(!names(&walk.files).contains(&"Hidden.java".to_string()));
        }
    }

    #[test]
    fn test_bad_glob_fails_before_walking() {
        let dir = TempDir::new().unwrap();
        assert!(FileMatcher::new().exclude("[").collect(dir.path()).is_err());
        assert!(FileMatcher::new().contains_pattern("(").collect(dir.path()).is_err());
    }
}
