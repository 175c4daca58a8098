//! Batch runner: discover files, rewrite them, write back, count.

use crate::diff::{DiffSummary, colorized_diff, unified_diff};
use crate::error::Result;
use crate::migration::Migration;
use crate::pipeline::RulePipeline;
use crate::source::{FileMatcher, FileSource, FsSource};
use crate::unit::TextUnit;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A pending change, kept only in dry-run mode.
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: PathBuf,
    pub original: String,
    pub transformed: String,
}

impl FileChange {
    /// Returns true if the content was modified.
    pub fn is_modified(&self) -> bool {
        self.original != self.transformed
    }
}

/// Severity of a per-file diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A rule was skipped; the file may still have been rewritten.
    Warning,
    /// The file was skipped.
    Error,
}

/// A single-line problem report for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}: {}", self.path.display(), label, self.message)
    }
}

/// Aggregate counts for one batch.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_changed: usize,
    /// Rule applications that changed content.
    pub rewrites: usize,
    pub files_failed: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// Pending changes (dry run only).
    pub changes: Vec<FileChange>,
    /// Paths counted in `files_changed`.
    pub changed_paths: BTreeSet<PathBuf>,
}

impl RunSummary {
    /// Combines the summary of another batch into this one.
    ///
    /// A file changed by both batches counts once in `files_changed`.
    pub fn merge(&mut self, other: RunSummary) {
        let repeated = other.changed_paths.intersection(&self.changed_paths).count();
        self.files_scanned += other.files_scanned;
        self.files_changed += other.files_changed.saturating_sub(repeated);
        self.changed_paths.extend(other.changed_paths);
        self.rewrites += other.rewrites;
        self.files_failed += other.files_failed;
        self.diagnostics.extend(other.diagnostics);
        self.changes.extend(other.changes);
    }

    /// Line counts of the pending changes.
    pub fn diff_summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for change in &self.changes {
            summary.merge(&DiffSummary::from_diff(&change.original, &change.transformed));
        }
        summary
    }

    /// Unified diff of all pending changes.
    pub fn diff(&self) -> String {
        self.changes
            .iter()
            .filter(|c| c.is_modified())
            .map(|c| unified_diff(&c.original, &c.transformed, &c.path))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Colorized diff of all pending changes.
    pub fn colorized_diff(&self) -> String {
        self.changes
            .iter()
            .filter(|c| c.is_modified())
            .map(|c| colorized_diff(&c.original, &c.transformed, &c.path))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fixed {} imports in {} files",
            self.rewrites, self.files_changed
        )?;
        if self.files_failed > 0 {
            write!(f, " ({} failed)", self.files_failed)?;
        }
        Ok(())
    }
}

/// Drives one migration over every file under a root directory.
pub struct BatchRunner {
    root: PathBuf,
    matcher: FileMatcher,
    pipeline: RulePipeline,
    dry_run: bool,
}

impl BatchRunner {
    /// Creates a runner rooted at the given directory.
    pub fn in_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            matcher: FileMatcher::new(),
            pipeline: RulePipeline::new(),
            dry_run: false,
        }
    }

    /// Creates a runner for a migration, using its file filter and rules.
    pub fn for_migration(root: impl Into<PathBuf>, migration: &dyn Migration) -> Result<Self> {
        Ok(Self::in_root(root)
            .matching(|_| migration.matcher())
            .pipeline(migration.pipeline()?))
    }

    /// Sets the file filter.
    pub fn matching<F>(mut self, f: F) -> Self
    where
        F: FnOnce(FileMatcher) -> FileMatcher,
    {
        self.matcher = f(FileMatcher::new());
        self
    }

    /// Sets the rules to apply.
    pub fn pipeline(mut self, pipeline: RulePipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Enables dry-run mode: nothing is written, changes are kept for preview.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Returns the root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs the batch over the file system.
    pub fn run(&self) -> Result<RunSummary> {
        let mut source = FsSource::new(&self.root, self.matcher.clone());
        self.run_with(&mut source)
    }

    /// Runs the batch over an arbitrary source.
    ///
    /// Only a failure to enumerate files is returned as an error; per-file
    /// failures are recorded in the summary and the batch moves on.
    pub fn run_with(&self, source: &mut dyn FileSource) -> Result<RunSummary> {
        let paths = source.discover()?;
        let mut summary = RunSummary::default();

        for path in paths {
            summary.files_scanned += 1;
            if let Err(e) = self.process(source, &path, &mut summary) {
                if !e.is_recoverable() {
                    return Err(e);
                }
                warn!(path = %path.display(), "{e}");
                summary.files_failed += 1;
                summary.diagnostics.push(Diagnostic {
                    path,
                    severity: Severity::Error,
                    message: e.to_string(),
                });
            }
        }

        info!(
            scanned = summary.files_scanned,
            changed = summary.files_changed,
            failed = summary.files_failed,
            "{summary}"
        );
        Ok(summary)
    }

    fn process(
        &self,
        source: &mut dyn FileSource,
        path: &Path,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let original = source.read(path)?;
        let mut unit = TextUnit::new(path, original.as_str());
        let result = self.pipeline.run(&mut unit);

        summary
            .diagnostics
            .extend(result.warnings.iter().map(|message| Diagnostic {
                path: path.to_path_buf(),
                severity: Severity::Warning,
                message: message.clone(),
            }));

        if !result.changed || result.final_content == original {
            return Ok(());
        }

        if self.dry_run {
            summary.changes.push(FileChange {
                path: path.to_path_buf(),
                original,
                transformed: result.final_content,
            });
        } else {
            source.write(path, &result.final_content)?;
        }

        info!(path = %path.display(), rules = result.applied.len(), "Fixed {}", path.display());
        summary.files_changed += 1;
        summary.changed_paths.insert(path.to_path_buf());
        summary.rewrites += result.applied.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Java;
    use crate::resolver::ImportSpec;
    use crate::rule::{EnsureImport, TextRule};
    use crate::source::MemorySource;
    use std::sync::Arc;

    fn runner() -> BatchRunner {
        BatchRunner::in_root("/virtual").pipeline(
            RulePipeline::new()
                .rule(TextRule::rename_type("Bytes<ByteBuffer>", "BytesOut<?>").unwrap())
                .rule(
                    EnsureImport::new(
                        Arc::new(Java),
                        ImportSpec::new("BytesOut", "import io.local.BytesOut;", "BytesOut"),
                    )
                    .unwrap(),
                ),
        )
    }

    const DIRTY: &str = "package a;\nclass A { Bytes<ByteBuffer> b; }\n";
    const CLEAN: &str = "package a;\nimport io.local.BytesOut;\nclass A { BytesOut<?> b; }\n";

    #[test]
    fn test_partial_failure_isolation() {
        let mut source = MemorySource::new()
            .file("1.java", DIRTY)
            .file("2.java", DIRTY)
            .file("3.java", DIRTY)
            .fail_writes_to("2.java");

        let summary = runner().run_with(&mut source).unwrap();

        assert_eq!(summary.files_scanned, 3);
        assert_eq!(summary.files_changed, 2);
        assert_eq!(summary.files_failed, 1);
        assert_eq!(summary.rewrites, 4);
        assert_eq!(source.get("1.java"), Some(CLEAN));
        assert_eq!(source.get("2.java"), Some(DIRTY));
        assert_eq!(source.get("3.java"), Some(CLEAN));
        assert_eq!(summary.diagnostics.len(), 1);
        assert_eq!(summary.diagnostics[0].severity, Severity::Error);
        assert!(summary.diagnostics[0].to_string().starts_with("2.java: error: "));
    }

    #[test]
    fn test_clean_files_are_not_written() {
        let mut source = MemorySource::new().file("A.java", CLEAN).file("B.java", DIRTY);

        let summary = runner().run_with(&mut source).unwrap();

        assert_eq!(summary.files_changed, 1);
        assert_eq!(source.writes(), 1);

        let again = runner().run_with(&mut source).unwrap();
        assert_eq!(again.files_changed, 0);
        assert_eq!(again.rewrites, 0);
        assert_eq!(source.writes(), 1);
    }

    #[test]
    fn test_dry_run_keeps_changes_without_writing() {
        let mut source = MemorySource::new().file("A.java", DIRTY);

        let summary = runner().dry_run().run_with(&mut source).unwrap();

        assert_eq!(source.writes(), 0);
        assert_eq!(source.get("A.java"), Some(DIRTY));
        assert_eq!(summary.changes.len(), 1);
        assert_eq!(summary.changes[0].transformed, CLEAN);
        assert!(summary.diff().contains("+import io.local.BytesOut;"));
        assert_eq!(summary.diff_summary().files_changed, 1);
    }

    #[test]
    fn test_missing_anchor_is_a_warning() {
        let mut source = MemorySource::new().file("A.java", "class A { Bytes<ByteBuffer> b; }\n");

        let summary = runner().run_with(&mut source).unwrap();

        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.files_failed, 0);
        assert_eq!(summary.diagnostics.len(), 1);
        assert_eq!(summary.diagnostics[0].severity, Severity::Warning);
        assert_eq!(source.get("A.java"), Some("class A { BytesOut<?> b; }\n"));
    }

    #[test]
    fn test_summary_line() {
        let summary = RunSummary {
            files_scanned: 10,
            files_changed: 3,
            rewrites: 7,
            ..Default::default()
        };
        assert_eq!(summary.to_string(), "Fixed 7 imports in 3 files");
    }

    #[test]
    fn test_merge_counts_each_changed_file_once() {
        let mut source = MemorySource::new().file("A.java", DIRTY).file("B.java", CLEAN);
        let mut total = runner().run_with(&mut source).unwrap();

        source = source.file("A.java", "package a;\nclass A { LegacyHandle h; }\n");
        let second = BatchRunner::in_root("/virtual")
            .pipeline(RulePipeline::new().rule(TextRule::rename_type("LegacyHandle", "Handle").unwrap()))
            .run_with(&mut source)
            .unwrap();
        assert_eq!(second.files_changed, 1);

        total.merge(second);
        assert_eq!(total.files_scanned, 4);
        assert_eq!(total.files_changed, 1);
        assert_eq!(total.rewrites, 3);
        assert_eq!(total.to_string(), "Fixed 3 imports in 1 files");
    }

    #[test]
    fn test_merge() {
        let mut total = RunSummary {
            files_scanned: 2,
            files_changed: 1,
            rewrites: 1,
            ..Default::default()
        };
        total.merge(RunSummary {
            files_scanned: 3,
            files_changed: 2,
            rewrites: 4,
            files_failed: 1,
            ..Default::default()
        });
        assert_eq!(total.files_scanned, 5);
        assert_eq!(total.rewrites, 5);
        assert_eq!(total.to_string(), "Fixed 5 imports in 3 files (1 failed)");
    }
}
