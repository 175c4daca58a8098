//! Import rules backed by the [`ImportResolver`].

use super::PatternRule;
use crate::error::Result;
use crate::lang::Language;
use crate::resolver::{ImportResolver, ImportSpec, Resolution};
use std::sync::Arc;

/// Inserts an import when its symbol is used and the import is missing.
///
/// Fails with `NoInsertionPoint` when the file has neither an import nor a
/// package line to anchor on.
pub struct EnsureImport {
    resolver: ImportResolver,
}

impl EnsureImport {
    pub fn new(language: Arc<dyn Language>, spec: ImportSpec) -> Result<Self> {
        Ok(Self {
            resolver: ImportResolver::new(language, spec)?,
        })
    }
}

impl PatternRule for EnsureImport {
    fn matches(&self, content: &str) -> bool {
        self.resolver.needs_import(content)
    }

    fn apply(&self, content: &str) -> Result<String> {
        match self.resolver.resolve(content)? {
            Resolution::Inserted { content, .. } => Ok(content),
            Resolution::Unused | Resolution::Present => Ok(content.to_string()),
        }
    }

    fn describe(&self) -> String {
        format!("Ensure '{}'", self.resolver.spec().import_statement.trim())
    }
}

/// Deletes an import line once nothing outside import lines uses its symbol.
pub struct RemoveUnusedImport {
    resolver: ImportResolver,
}

impl RemoveUnusedImport {
    pub fn new(
        language: Arc<dyn Language>,
        import_statement: impl Into<String>,
        usage_marker: impl Into<String>,
    ) -> Result<Self> {
        let usage_marker = usage_marker.into();
        let spec = ImportSpec::new(usage_marker.clone(), import_statement, usage_marker);
        Ok(Self {
            resolver: ImportResolver::new(language, spec)?,
        })
    }
}

impl PatternRule for RemoveUnusedImport {
    fn matches(&self, content: &str) -> bool {
        self.resolver.is_present(content) && !self.resolver.is_used(content)
    }

    fn apply(&self, content: &str) -> Result<String> {
        Ok(self
            .resolver
            .remove_if_unused(content)
            .unwrap_or_else(|| content.to_string()))
    }

    fn describe(&self) -> String {
        format!(
            "Remove unused '{}'",
            self.resolver.spec().import_statement.trim()
        )
    }
}
