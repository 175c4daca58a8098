//! Import management: is an import needed, is it already there, and where
//! does it go.

use crate::error::{Result, RewriteError};
use crate::lang::{Language, LineKind};
use crate::rule::token_pattern;
use crate::unit::{dominant_line_ending, line_ending, split_lines};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An import that must be present whenever its symbol is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    /// Name of the imported symbol, for reporting.
    pub symbol_name: String,
    /// Literal import line, e.g. `import io.local.BytesOut;`.
    pub import_statement: String,
    /// Token whose presence outside import lines signals a use.
    pub usage_marker: String,
}

impl ImportSpec {
    /// Creates an import spec.
    pub fn new(
        symbol_name: impl Into<String>,
        import_statement: impl Into<String>,
        usage_marker: impl Into<String>,
    ) -> Self {
        Self {
            symbol_name: symbol_name.into(),
            import_statement: import_statement.into(),
            usage_marker: usage_marker.into(),
        }
    }
}

/// Outcome of resolving one import against one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The symbol is not used; nothing to do.
    Unused,
    /// The import line already exists.
    Present,
    /// The import was inserted at the given (0-based) line index.
    Inserted { line: usize, content: String },
}

/// Decides whether an import is required and where it belongs.
pub struct ImportResolver {
    language: Arc<dyn Language>,
    spec: ImportSpec,
    marker: Regex,
}

impl ImportResolver {
    /// Creates a resolver for one import in one language.
    pub fn new(language: Arc<dyn Language>, spec: ImportSpec) -> Result<Self> {
        if spec.import_statement.trim().is_empty() || spec.usage_marker.is_empty() {
            return Err(RewriteError::InvalidConfig(format!(
                "import for '{}' needs a statement and a usage marker",
                spec.symbol_name
            )));
        }
        let marker = Regex::new(&token_pattern(&spec.usage_marker))?;
        Ok(Self {
            language,
            spec,
            marker,
        })
    }

    /// Returns the import spec.
    pub fn spec(&self) -> &ImportSpec {
        &self.spec
    }

    /// Returns true if the usage marker appears on any non-import line.
    pub fn is_used(&self, content: &str) -> bool {
        let lines = split_lines(content);
        let kinds = self.language.classify(&lines);
        lines
            .iter()
            .zip(kinds)
            .any(|(line, kind)| kind != LineKind::Import && self.marker.is_match(line))
    }

    /// Returns true if the import line already exists.
    pub fn is_present(&self, content: &str) -> bool {
        let statement = self.spec.import_statement.trim();
        content.lines().any(|line| line.trim() == statement)
    }

    /// Returns true if resolving would insert the import.
    pub fn needs_import(&self, content: &str) -> bool {
        !self.is_present(content) && self.is_used(content)
    }

    /// Returns the index of the line after which a new import goes: the last
    /// import line, else the first package declaration.
    pub fn anchor_line(&self, lines: &[String]) -> Option<usize> {
        let kinds = self.language.classify(lines);
        kinds
            .iter()
            .rposition(|k| *k == LineKind::Import)
            .or_else(|| kinds.iter().position(|k| *k == LineKind::Declaration))
    }

    /// Inserts the import if the symbol is used and the import is missing.
    pub fn resolve(&self, content: &str) -> Result<Resolution> {
        if !self.is_used(content) {
            return Ok(Resolution::Unused);
        }
        if self.is_present(content) {
            return Ok(Resolution::Present);
        }

        let mut lines = split_lines(content);
        let anchor = self
            .anchor_line(&lines)
            .ok_or_else(|| RewriteError::NoInsertionPoint {
                import: self.spec.import_statement.trim().to_string(),
            })?;

        let statement = self.spec.import_statement.trim();
        let new_line = match line_ending(&lines[anchor]) {
            Some(ending) => format!("{statement}{ending}"),
            None => {
                lines[anchor].push_str(dominant_line_ending(content));
                statement.to_string()
            }
        };
        lines.insert(anchor + 1, new_line);

        Ok(Resolution::Inserted {
            line: anchor + 1,
            content: lines.concat(),
        })
    }

    /// Deletes the import line when the usage marker no longer appears
    /// outside import lines. Returns `None` when nothing was removed.
    pub fn remove_if_unused(&self, content: &str) -> Option<String> {
        if !self.is_present(content) || self.is_used(content) {
            return None;
        }
        let statement = self.spec.import_statement.trim();
        let kept: Vec<String> = split_lines(content)
            .into_iter()
            .filter(|line| line.trim() != statement)
            .collect();
        Some(kept.concat())
    }
}
