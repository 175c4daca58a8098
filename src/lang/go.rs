//! Go language support.

use super::{Language, LineKind};
use regex::Regex;
use std::sync::LazyLock;

static IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*import\s+(\w+\s+|\.\s+)?""#).expect("invalid regex"));

static BLOCK_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*import\s*\(\s*$").expect("invalid regex"));

static PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*package\s+\w+").expect("invalid regex"));

/// Go programming language.
pub struct Go;

impl Language for Go {
    fn name(&self) -> &'static str {
        "go"
    }

    fn extensions(&self) -> &[&'static str] {
        &["go"]
    }

    fn is_import_line(&self, line: &str) -> bool {
        IMPORT.is_match(line) || BLOCK_OPEN.is_match(line)
    }

    fn is_declaration_line(&self, line: &str) -> bool {
        PACKAGE.is_match(line)
    }

    // Every line of an `import ( ... )` block counts as an import, closing
    // paren included, so new imports land after the block.
    fn classify(&self, lines: &[String]) -> Vec<LineKind> {
        let mut in_block = false;
        lines
            .iter()
            .map(|line| {
                if in_block {
                    if line.trim() == ")" {
                        in_block = false;
                    }
                    LineKind::Import
                } else if BLOCK_OPEN.is_match(line) {
                    in_block = true;
                    LineKind::Import
                } else if IMPORT.is_match(line) {
                    LineKind::Import
                } else if PACKAGE.is_match(line) {
                    LineKind::Declaration
                } else {
                    LineKind::Other
                }
            })
            .collect()
    }
}
