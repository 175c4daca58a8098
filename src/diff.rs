//! Diff rendering for dry runs.

use similar::{ChangeTag, TextDiff};
use std::fmt::{self, Write};
use std::path::Path;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Renders a plain unified diff with three lines of context.
pub fn unified_diff(original: &str, modified: &str, path: &Path) -> String {
    render(original, modified, path, false)
}

/// Same as [`unified_diff`], with ANSI colors for a terminal.
pub fn colorized_diff(original: &str, modified: &str, path: &Path) -> String {
    render(original, modified, path, true)
}

fn render(original: &str, modified: &str, path: &Path, color: bool) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();
    let (header, reset) = if color { (CYAN, RESET) } else { ("", "") };

    // Writing into a String cannot fail.
    let _ = writeln!(output, "{header}--- a/{}{reset}", path.display());
    let _ = writeln!(output, "{header}+++ b/{}{reset}", path.display());

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, paint) = match change.tag() {
                    ChangeTag::Delete => ("-", RED),
                    ChangeTag::Insert => ("+", GREEN),
                    ChangeTag::Equal => (" ", ""),
                };
                if color && !paint.is_empty() {
                    let _ = write!(output, "{paint}{sign}{}{RESET}", change.value());
                } else {
                    let _ = write!(output, "{sign}{}", change.value());
                }
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}

/// Added and removed line counts over one or more files.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiffSummary {
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffSummary {
    /// Counts the lines one file gains and loses.
    pub fn from_diff(original: &str, modified: &str) -> Self {
        let diff = TextDiff::from_lines(original, modified);
        let count = |tag: ChangeTag| diff.iter_all_changes().filter(|c| c.tag() == tag).count();
        let insertions = count(ChangeTag::Insert);
        let deletions = count(ChangeTag::Delete);

        Self {
            files_changed: usize::from(insertions + deletions > 0),
            insertions,
            deletions,
        }
    }

    pub fn merge(&mut self, other: &DiffSummary) {
        self.files_changed += other.files_changed;
        self.insertions += other.insertions;
        self.deletions += other.deletions;
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        write!(
            f,
            "{} file{} changed, {} insertion{}(+), {} deletion{}(-)",
            self.files_changed,
            plural(self.files_changed),
            self.insertions,
            plural(self.insertions),
            self.deletions,
            plural(self.deletions),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEFORE: &str = "package a;\nimport net.example.bytes.Bytes;\nclass A {}\n";
    const AFTER: &str = "package a;\nimport io.local.BytesOut;\nclass A {}\n";

    #[test]
    fn test_unified_diff() {
        let diff = unified_diff(BEFORE, AFTER, Path::new("A.java"));
        assert!(diff.starts_with("--- a/A.java\n+++ b/A.java\n"));
        assert!(diff.contains("-import net.example.bytes.Bytes;\n"));
        assert!(diff.contains("+import io.local.BytesOut;\n"));
        assert!(diff.contains(" package a;\n"));
    }

    #[test]
    fn test_colorized_diff_paints_changes() {
        let diff = colorized_diff(BEFORE, AFTER, Path::new("A.java"));
        assert!(diff.contains(&format!("{RED}-import net.example.bytes.Bytes;\n{RESET}")));
        assert!(diff.contains(&format!("{GREEN}+import io.local.BytesOut;\n{RESET}")));
    }

    #[test]
    fn test_identical_content_has_no_hunks() {
        let diff = unified_diff(BEFORE, BEFORE, Path::new("A.java"));
        assert_eq!(diff, "--- a/A.java\n+++ b/A.java\n");
    }

    #[test]
    fn test_summary() {
        let mut summary = DiffSummary::from_diff(BEFORE, AFTER);
        assert_eq!(summary.insertions, 1);
        assert_eq!(summary.deletions, 1);
        summary.merge(&DiffSummary::from_diff(BEFORE, BEFORE));
        assert_eq!(summary.files_changed, 1);
        assert_eq!(
            summary.to_string(),
            "1 file changed, 1 insertion(+), 1 deletion(-)"
        );
    }
}
