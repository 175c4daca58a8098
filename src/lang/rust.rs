//! Rust language support.

use super::Language;
use regex::Regex;
use std::sync::LazyLock;

static USE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(pub(\([\w:]+\))?\s+)?use\s+[\w:{}*, ]+;").expect("invalid regex")
});

/// Rust programming language. Files have no package line, so imports can only
/// be anchored on existing `use` items.
pub struct Rust;

impl Language for Rust {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn extensions(&self) -> &[&'static str] {
        &["rs"]
    }

    fn is_import_line(&self, line: &str) -> bool {
        USE.is_match(line)
    }

    fn is_declaration_line(&self, _line: &str) -> bool {
        false
    }
}
