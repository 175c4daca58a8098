//! TypeScript/JavaScript language support.

use super::Language;
use regex::Regex;
use std::sync::LazyLock;

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*import\s+(.+\s+from\s+)?['"][^'"]+['"]\s*;?"#).expect("invalid regex")
});

/// TypeScript and JavaScript. Modules have no declaration line.
pub struct TypeScript;

impl Language for TypeScript {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &[&'static str] {
        &["ts", "tsx", "js", "jsx", "mjs"]
    }

    fn is_import_line(&self, line: &str) -> bool {
        IMPORT.is_match(line)
    }

    fn is_declaration_line(&self, _line: &str) -> bool {
        false
    }
}
