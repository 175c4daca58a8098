//! C# language support.

use super::Language;
use regex::Regex;
use std::sync::LazyLock;

static USING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(global\s+)?using\s+(static\s+)?(\w+\s*=\s*)?[\w.<>]+\s*;")
        .expect("invalid regex")
});

static NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*namespace\s+[\w.]+").expect("invalid regex"));

/// C# programming language.
pub struct CSharp;

impl Language for CSharp {
    fn name(&self) -> &'static str {
        "csharp"
    }

    fn extensions(&self) -> &[&'static str] {
        &["cs"]
    }

    fn is_import_line(&self, line: &str) -> bool {
        USING.is_match(line)
    }

    fn is_declaration_line(&self, line: &str) -> bool {
        NAMESPACE.is_match(line)
    }
}
