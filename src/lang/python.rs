//! Python language support.

use super::Language;
use regex::Regex;
use std::sync::LazyLock;

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(import\s+[\w.]+|from\s+[\w.]+\s+import\s+)").expect("invalid regex")
});

/// Python programming language.
pub struct Python;

impl Language for Python {
    fn name(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &[&'static str] {
        &["py", "pyi"]
    }

    // Only top-level imports; indented ones live inside functions.
    fn is_import_line(&self, line: &str) -> bool {
        IMPORT.is_match(line)
    }

    fn is_declaration_line(&self, _line: &str) -> bool {
        false
    }
}
