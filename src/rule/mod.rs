//! Pattern rules: stateless detect-and-rewrite units.
//!
//! A rule is two pure functions over file content. `matches` decides whether
//! the rule has anything to do, `apply` produces the rewritten content. Every
//! rule is idempotent, so running a pipeline over already migrated files is a
//! no-op.

pub mod import;
pub mod text;

pub use import::{EnsureImport, RemoveUnusedImport};
pub use text::TextRule;

use crate::error::Result;

/// A single detect-and-transform unit.
pub trait PatternRule: Send + Sync {
    /// Returns true if the rule would change the content.
    ///
    /// Never fails: content the rule does not recognize is simply not a match.
    fn matches(&self, content: &str) -> bool;

    /// Rewrites the content. `apply(apply(x)) == apply(x)` must hold.
    fn apply(&self, content: &str) -> Result<String>;

    /// Returns a description of the rule.
    fn describe(&self) -> String;
}

/// Builds a regex matching `literal` as a whole token.
///
/// Word boundaries are only added on the sides where the literal starts or
/// ends with a word character, so `Bytes<ByteBuffer>` still matches before a
/// space and `Bytes` does not match inside `BytesOut`.
pub fn token_pattern(literal: &str) -> String {
    let mut pattern = regex::escape(literal);
    if literal.chars().next().is_some_and(is_word_char) {
        pattern.insert_str(0, r"\b");
    }
    if literal.chars().last().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
