//! Text rules: literal and regex rewrites of types, signatures and calls.

use super::{PatternRule, token_pattern};
use crate::error::{Result, RewriteError};
use regex::{Captures, NoExpand, Regex};
use std::sync::LazyLock;

/// A typed parameter (`final Bytes<ByteBuffer> sink`) rather than a call
/// argument. Used to keep argument wrapping away from declarations.
static PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(final\s+)?[\w.$]+(<[^()]*>)?(\[\])*\s+\w+$").expect("invalid regex")
});

/// Text-based rewrite rule.
pub struct TextRule {
    kind: TextRuleKind,
}

enum TextRuleKind {
    ReplaceLiteral {
        needle: String,
        replacement: String,
    },
    ReplacePattern {
        pattern: Regex,
        replacement: String,
    },
    RenameType {
        from: String,
        token: Regex,
        to: String,
    },
    RewriteSignature {
        method: String,
        call: Regex,
        from: String,
        token: Regex,
        to: String,
    },
    WrapArgument {
        method: String,
        call: Regex,
        adapter: String,
    },
}

impl TextRule {
    /// Replaces every occurrence of a literal string.
    ///
    /// Rejected when the replacement contains the needle, or when the needle
    /// could re-form across the edge of an inserted replacement.
    pub fn replace_literal(needle: &str, replacement: &str) -> Result<Self> {
        if needle.is_empty() {
            return Err(RewriteError::InvalidConfig(
                "replace_literal needs a non-empty needle".to_string(),
            ));
        }
        if replacement.contains(needle) {
            return Err(RewriteError::InvalidConfig(format!(
                "replacement '{replacement}' contains '{needle}' and is not idempotent"
            )));
        }
        if reforms_across(needle, replacement) {
            return Err(RewriteError::InvalidConfig(format!(
                "'{needle}' can re-form around replacement '{replacement}'"
            )));
        }
        Ok(Self {
            kind: TextRuleKind::ReplaceLiteral {
                needle: needle.to_string(),
                replacement: replacement.to_string(),
            },
        })
    }

    /// Replaces every match of a regex. `$1`-style group references expand.
    ///
    /// A replacement without group references that the pattern itself
    /// matches is rejected.
    pub fn replace_pattern(pattern: &str, replacement: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        if !replacement.contains('$') && regex.is_match(replacement) {
            return Err(RewriteError::InvalidConfig(format!(
                "pattern '{pattern}' matches its own replacement '{replacement}'"
            )));
        }
        Ok(Self::replace_regex(regex, replacement))
    }

    /// Creates a replacement rule from a pre-compiled regex.
    pub fn replace_regex(pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            kind: TextRuleKind::ReplacePattern {
                pattern,
                replacement: replacement.into(),
            },
        }
    }

    /// Renames a type token (`Bytes<ByteBuffer>`, `net.example.Bytes`)
    /// wherever it appears as a whole token.
    pub fn rename_type(from: &str, to: &str) -> Result<Self> {
        let token = non_recursive_token(from, to)?;
        Ok(Self {
            kind: TextRuleKind::RenameType {
                from: from.to_string(),
                token,
                to: to.to_string(),
            },
        })
    }

    /// Rewrites a parameter type inside the argument list of `method(...)`.
    ///
    /// Only argument lists without nested parentheses are considered, which
    /// is the shape of a declaration. Every occurrence of `from` inside a
    /// matched list is rewritten; nothing outside the token changes.
    pub fn rewrite_signature(method: &str, from: &str, to: &str) -> Result<Self> {
        let call = Regex::new(&format!(r"{}\s*\(([^()]*)\)", token_pattern(method)))?;
        let token = non_recursive_token(from, to)?;
        Ok(Self {
            kind: TextRuleKind::RewriteSignature {
                method: method.to_string(),
                call,
                from: from.to_string(),
                token,
                to: to.to_string(),
            },
        })
    }

    /// Wraps the single argument of `method(arg)` as `method(adapter(arg))`.
    ///
    /// Arguments may contain one level of nested parentheses. Calls with more
    /// than one argument, typed parameters and already wrapped arguments are
    /// left alone.
    pub fn wrap_argument(method: &str, adapter: &str) -> Result<Self> {
        if adapter.trim().is_empty() {
            return Err(RewriteError::InvalidConfig(format!(
                "wrap_argument for '{method}' needs an adapter"
            )));
        }
        let call = Regex::new(&format!(
            r"{}\s*\(((?:[^()]|\([^()]*\))*)\)",
            token_pattern(method)
        ))?;
        Ok(Self {
            kind: TextRuleKind::WrapArgument {
                method: method.to_string(),
                call,
                adapter: adapter.trim().to_string(),
            },
        })
    }
}

/// True when the needle can straddle an inserted replacement: a proper
/// suffix of the needle starts the replacement, a proper prefix ends it, or
/// the needle wraps the whole replacement.
fn reforms_across(needle: &str, replacement: &str) -> bool {
    if replacement.is_empty() {
        return false;
    }
    if needle.len() > replacement.len() && needle.contains(replacement) {
        return true;
    }
    needle.char_indices().skip(1).any(|(i, _)| {
        replacement.starts_with(&needle[i..]) || replacement.ends_with(&needle[..i])
    })
}

/// Fails when a second pass would change the output again.
fn ensure_settled(rule: &TextRule, once: String, twice: &str) -> Result<String> {
    if once == twice {
        Ok(once)
    } else {
        Err(RewriteError::InvalidConfig(format!(
            "{} is not idempotent on this input",
            rule.describe()
        )))
    }
}

fn non_recursive_token(from: &str, to: &str) -> Result<Regex> {
    if from.is_empty() {
        return Err(RewriteError::InvalidConfig(
            "type token must not be empty".to_string(),
        ));
    }
    let token = Regex::new(&token_pattern(from))?;
    if token.is_match(to) {
        return Err(RewriteError::InvalidConfig(format!(
            "'{to}' still contains the token '{from}' and is not idempotent"
        )));
    }
    Ok(token)
}

/// Splits a whole call match into the text before the argument list.
fn call_head<'a>(caps: &'a Captures<'_>) -> &'a str {
    let whole = caps.get(0).map_or("", |m| m.as_str());
    let args_len = caps.get(1).map_or(0, |m| m.len());
    &whole[..whole.len() - args_len - 1]
}

fn wrap_single_argument(args: &str, adapter: &str) -> Option<String> {
    let trimmed = args.trim();
    if trimmed.is_empty()
        || trimmed.starts_with(&format!("{adapter}("))
        || has_top_level_comma(trimmed)
        || PARAMETER.is_match(trimmed)
    {
        return None;
    }
    let lead = args.len() - args.trim_start().len();
    let tail = args.trim_end().len();
    Some(format!(
        "{}{adapter}({trimmed}){}",
        &args[..lead],
        &args[tail..]
    ))
}

fn has_top_level_comma(args: &str) -> bool {
    let mut depth = 0usize;
    for c in args.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

impl PatternRule for TextRule {
    fn matches(&self, content: &str) -> bool {
        match &self.kind {
            TextRuleKind::ReplaceLiteral { needle, .. } => content.contains(needle.as_str()),
            TextRuleKind::ReplacePattern { pattern, .. } => pattern.is_match(content),
            TextRuleKind::RenameType { token, .. } => token.is_match(content),
            TextRuleKind::RewriteSignature { call, token, .. } => call
                .captures_iter(content)
                .any(|caps| token.is_match(&caps[1])),
            TextRuleKind::WrapArgument { call, adapter, .. } => call
                .captures_iter(content)
                .any(|caps| wrap_single_argument(&caps[1], adapter).is_some()),
        }
    }

    fn apply(&self, content: &str) -> Result<String> {
        match &self.kind {
            TextRuleKind::ReplaceLiteral {
                needle,
                replacement,
            } => {
                let once = content.replace(needle.as_str(), replacement);
                let twice = once.replace(needle.as_str(), replacement);
                ensure_settled(self, once, &twice)
            }
            TextRuleKind::ReplacePattern {
                pattern,
                replacement,
            } => {
                let once = pattern
                    .replace_all(content, replacement.as_str())
                    .into_owned();
                let twice = pattern.replace_all(&once, replacement.as_str());
                ensure_settled(self, once.clone(), &twice)
            }
            TextRuleKind::RenameType { token, to, .. } => {
                Ok(token.replace_all(content, NoExpand(to)).into_owned())
            }
            TextRuleKind::RewriteSignature {
                call, token, to, ..
            } => Ok(call
                .replace_all(content, |caps: &Captures<'_>| {
                    let args = token.replace_all(&caps[1], NoExpand(to));
                    format!("{}{})", call_head(caps), args)
                })
                .into_owned()),
            TextRuleKind::WrapArgument { call, adapter, .. } => Ok(call
                .replace_all(content, |caps: &Captures<'_>| {
                    match wrap_single_argument(&caps[1], adapter) {
                        Some(wrapped) => format!("{}{})", call_head(caps), wrapped),
                        None => caps[0].to_string(),
                    }
                })
                .into_owned()),
        }
    }

    fn describe(&self) -> String {
        match &self.kind {
            TextRuleKind::ReplaceLiteral {
                needle,
                replacement,
            } => format!("Replace literal '{}' with '{}'", needle, replacement),
            TextRuleKind::ReplacePattern {
                pattern,
                replacement,
            } => format!(
                "Replace pattern '{}' with '{}'",
                pattern.as_str(),
                replacement
            ),
            TextRuleKind::RenameType { from, to, .. } => {
                format!("Rename type '{}' to '{}'", from, to)
            }
            TextRuleKind::RewriteSignature {
                method, from, to, ..
            } => format!("Rewrite '{}' in {}(...) to '{}'", from, method, to),
            TextRuleKind::WrapArgument {
                method, adapter, ..
            } => format!("Wrap argument of {}(...) with {}(...)", method, adapter),
        }
    }
}
