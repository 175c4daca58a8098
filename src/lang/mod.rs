//! Per-language recognition of import and package declaration lines.
//!
//! Recognition is line based and deliberately shallow: a handful of anchored
//! regexes per language, no parsing.

mod csharp;
mod go;
mod java;
mod kotlin;
mod python;
mod rust;
mod typescript;

pub use csharp::CSharp;
pub use go::Go;
pub use java::Java;
pub use kotlin::Kotlin;
pub use python::Python;
pub use rust::Rust;
pub use typescript::TypeScript;

use std::path::Path;
use std::sync::Arc;

/// How a single source line is classified for import management.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// An import declaration (or a line inside an import block).
    Import,
    /// A package/module/namespace declaration.
    Declaration,
    Other,
}

/// A source language whose imports can be managed.
pub trait Language: Send + Sync {
    /// Returns the name of the language.
    fn name(&self) -> &'static str;

    /// Returns the file extensions associated with this language.
    fn extensions(&self) -> &[&'static str];

    /// Returns true if the line is an import declaration.
    fn is_import_line(&self, line: &str) -> bool;

    /// Returns true if the line is a package/module declaration.
    fn is_declaration_line(&self, line: &str) -> bool;

    /// Classifies every line of a file.
    ///
    /// Languages with multi-line import blocks override this to carry state
    /// across lines.
    fn classify(&self, lines: &[String]) -> Vec<LineKind> {
        lines
            .iter()
            .map(|line| {
                if self.is_import_line(line) {
                    LineKind::Import
                } else if self.is_declaration_line(line) {
                    LineKind::Declaration
                } else {
                    LineKind::Other
                }
            })
            .collect()
    }

    /// Checks if this language handles the given file extension.
    fn matches_extension(&self, ext: &str) -> bool {
        self.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Registry of supported languages.
#[derive(Default, Clone)]
pub struct LanguageRegistry {
    languages: Vec<Arc<dyn Language>>,
}

impl LanguageRegistry {
    /// Creates a new registry with all built-in languages.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register(Arc::new(Java));
        registry.register(Arc::new(Kotlin));
        registry.register(Arc::new(Go));
        registry.register(Arc::new(CSharp));
        registry.register(Arc::new(TypeScript));
        registry.register(Arc::new(Python));
        registry.register(Arc::new(Rust));
        registry
    }

    /// Registers a new language.
    pub fn register(&mut self, lang: Arc<dyn Language>) {
        self.languages.push(lang);
    }

    /// Finds a language by file extension.
    pub fn by_extension(&self, ext: &str) -> Option<Arc<dyn Language>> {
        self.languages
            .iter()
            .find(|l| l.matches_extension(ext))
            .cloned()
    }

    /// Finds a language by name.
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn Language>> {
        self.languages
            .iter()
            .find(|l| l.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Detects the language for a given file path.
    pub fn detect(&self, path: &Path) -> Option<Arc<dyn Language>> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.by_extension(ext))
    }

    /// Returns all registered languages.
    pub fn all(&self) -> &[Arc<dyn Language>] {
        &self.languages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        crate::unit::split_lines(text)
    }

    #[test]
    fn test_registry_detects_by_extension() {
        let registry = LanguageRegistry::new();
        assert_eq!(registry.detect(Path::new("src/A.java")).unwrap().name(), "java");
        assert_eq!(registry.detect(Path::new("main.GO")).unwrap().name(), "go");
        assert!(registry.detect(Path::new("README.md")).is_none());
    }

    #[test]
    fn test_registry_by_name() {
        let registry = LanguageRegistry::new();
        assert!(registry.by_name("Kotlin").is_some());
        assert!(registry.by_name("cobol").is_none());
    }

    #[test]
    fn test_java_classification() {
        let kinds = Java.classify(&lines(
            "package io.sirix.page;\n\nimport java.util.List;\nimport static org.junit.Assert.*;\n// import fake.Thing;\nclass A {}\n",
        ));
        assert_eq!(
            kinds,
            vec![
                LineKind::Declaration,
                LineKind::Other,
                LineKind::Import,
                LineKind::Import,
                LineKind::Other,
                LineKind::Other,
            ]
        );
    }

    #[test]
    fn test_go_import_block() {
        let kinds = Go.classify(&lines(
            "package main\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n\nfunc main() {}\n",
        ));
        assert_eq!(kinds[0], LineKind::Declaration);
        assert!(kinds[2..6].iter().all(|k| *k == LineKind::Import));
        assert_eq!(kinds[7], LineKind::Other);
    }

    #[test]
    fn test_go_does_not_treat_call_parens_as_block_end() {
        let kinds = Go.classify(&lines("package main\n\nfunc main() {\n\tf(\n\t)\n}\n"));
        assert!(kinds.iter().all(|k| *k != LineKind::Import));
    }

    #[test]
    fn test_csharp_using_is_not_using_statement() {
        assert!(CSharp.is_import_line("using System.Text;\n"));
        assert!(CSharp.is_import_line("using static System.Math;\n"));
        assert!(!CSharp.is_import_line("        using (var s = Open()) {\n"));
        assert!(CSharp.is_declaration_line("namespace Acme.Io;\n"));
    }

    #[test]
    fn test_python_only_top_level_imports() {
        assert!(Python.is_import_line("from os import path\n"));
        assert!(Python.is_import_line("import sys\n"));
        assert!(!Python.is_import_line("    import sys\n"));
    }

    #[test]
    fn test_rust_use_lines() {
        assert!(Rust.is_import_line("use std::fs;\n"));
        assert!(Rust.is_import_line("pub(crate) use crate::error::{Result, RewriteError};\n"));
        assert!(!Rust.is_import_line("let user = 1;\n"));
    }

    #[test]
    fn test_typescript_and_kotlin() {
        assert!(TypeScript.is_import_line("import { Observable } from 'rxjs';\n"));
        assert!(TypeScript.is_import_line("import 'zone.js';\n"));
        assert!(!TypeScript.is_import_line("const x = import('lazy');\n"));
        assert!(Kotlin.is_import_line("import io.sirix.node.BytesOut\n"));
        assert!(Kotlin.is_declaration_line("package io.sirix\n"));
    }
}
