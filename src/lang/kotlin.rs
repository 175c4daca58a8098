//! Kotlin language support.

use super::Language;
use regex::Regex;
use std::sync::LazyLock;

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*import\s+[\w.`]+(\.\*|\s+as\s+\w+)?\s*;?\s*$").expect("invalid regex")
});

static PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*package\s+[\w.`]+\s*;?\s*$").expect("invalid regex"));

/// Kotlin programming language.
pub struct Kotlin;

impl Language for Kotlin {
    fn name(&self) -> &'static str {
        "kotlin"
    }

    fn extensions(&self) -> &[&'static str] {
        &["kt", "kts"]
    }

    fn is_import_line(&self, line: &str) -> bool {
        IMPORT.is_match(line)
    }

    fn is_declaration_line(&self, line: &str) -> bool {
        PACKAGE.is_match(line)
    }
}
