//! Ordered application of pattern rules to one text unit.

use crate::error::{Result, RewriteError};
use crate::lang::{Language, LineKind};
use crate::rule::PatternRule;
use crate::unit::{TextUnit, split_lines};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of running a pipeline over one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub changed: bool,
    pub final_content: String,
    /// Descriptions of the rules that changed the content, in order.
    pub applied: Vec<String>,
    /// Rules that matched but could not be applied.
    pub warnings: Vec<String>,
}

/// An ordered list of rules applied in a fixed sequence.
///
/// Each rule's `matches` sees the content as rewritten by the rules before
/// it, so ordering is part of a migration's definition.
///
/// With a language set, a rule whose output would hold the same import line
/// twice (where the input did not) is refused and reported as a warning.
#[derive(Default)]
pub struct RulePipeline {
    rules: Vec<Box<dyn PatternRule>>,
    language: Option<Arc<dyn Language>>,
}

impl RulePipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Guards import lines of the given language against duplication.
    pub fn with_language(mut self, language: Arc<dyn Language>) -> Self {
        self.language = Some(language);
        self
    }

    /// Appends a rule.
    pub fn rule<R: PatternRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Appends an already boxed rule.
    pub fn push(&mut self, rule: Box<dyn PatternRule>) {
        self.rules.push(rule);
    }

    /// Runs every rule against the unit, mutating it in place.
    ///
    /// A rule that fails (e.g. no place to insert an import) is reported as a
    /// warning and skipped; the remaining rules still run.
    pub fn run(&self, unit: &mut TextUnit) -> RewriteResult {
        let original = unit.content().to_string();
        let mut applied = Vec::new();
        let mut warnings = Vec::new();

        for rule in &self.rules {
            if !rule.matches(unit.content()) {
                continue;
            }
            let outcome = rule
                .apply(unit.content())
                .and_then(|next| self.check_imports(unit.content(), next));
            match outcome {
                Ok(next) if next != unit.content() => {
                    debug!(path = %unit.path().display(), rule = %rule.describe(), "rule applied");
                    applied.push(rule.describe());
                    unit.set_content(next);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %unit.path().display(), rule = %rule.describe(), "{e}");
                    warnings.push(format!("{}: {}", rule.describe(), e));
                }
            }
        }

        RewriteResult {
            changed: unit.content() != original,
            final_content: unit.content().to_string(),
            applied,
            warnings,
        }
    }

    fn check_imports(&self, before: &str, after: String) -> Result<String> {
        let Some(language) = &self.language else {
            return Ok(after);
        };
        let existing = duplicated_imports(language.as_ref(), before);
        match duplicated_imports(language.as_ref(), &after)
            .into_iter()
            .find(|line| !existing.contains(line))
        {
            Some(import) => Err(RewriteError::DuplicateImport { import }),
            None => Ok(after),
        }
    }

    /// Runs the pipeline over a string.
    pub fn rewrite(&self, path: &Path, content: &str) -> RewriteResult {
        let mut unit = TextUnit::new(path, content);
        self.run(&mut unit)
    }

    /// Returns descriptions of all rules.
    pub fn describe(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.describe()).collect()
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn duplicated_imports(language: &dyn Language, content: &str) -> BTreeSet<String> {
    let lines = split_lines(content);
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (line, kind) in lines.iter().zip(language.classify(&lines)) {
        if kind == LineKind::Import {
            *counts.entry(line.trim()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(line, _)| line.to_string())
        .collect()
}
