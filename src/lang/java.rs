//! Java language support.

use super::Language;
use regex::Regex;
use std::sync::LazyLock;

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*import\s+(static\s+)?[\w.]+(\.\*)?\s*;").expect("invalid regex")
});

static PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*package\s+[\w.]+\s*;").expect("invalid regex"));

/// Java programming language.
pub struct Java;

impl Language for Java {
    fn name(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &[&'static str] {
        &["java"]
    }

    fn is_import_line(&self, line: &str) -> bool {
        IMPORT.is_match(line)
    }

    fn is_declaration_line(&self, line: &str) -> bool {
        PACKAGE.is_match(line)
    }
}
