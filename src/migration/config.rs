//! Serializable migration definitions.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use super::Migration;
use crate::error::{Result, RewriteError};
use crate::lang::{Language, LanguageRegistry};
use crate::pipeline::RulePipeline;
use crate::resolver::ImportSpec;
use crate::rule::{EnsureImport, PatternRule, RemoveUnusedImport, TextRule};
use crate::source::FileMatcher;

/// A serializable specification for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleSpec {
    /// Replace a literal string with another.
    ReplaceLiteral { from: String, to: String },

    /// Replace using a regex pattern.
    ReplacePattern { pattern: String, replacement: String },

    /// Rename a whole type token.
    RenameType { from: String, to: String },

    /// Rewrite a parameter type inside `method(...)`.
    RewriteSignature {
        method: String,
        from: String,
        to: String,
    },

    /// Wrap the single argument of `method(...)` with `adapter(...)`.
    WrapArgument { method: String, adapter: String },

    /// Insert an import when `marker` (default: `symbol`) is used.
    EnsureImport {
        symbol: String,
        statement: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        marker: Option<String>,
    },

    /// Delete an import once `marker` is no longer used.
    RemoveUnusedImport { statement: String, marker: String },
}

impl RuleSpec {
    /// Builds the rule for files of the given language.
    pub fn to_rule(&self, language: &Arc<dyn Language>) -> Result<Box<dyn PatternRule>> {
        Ok(match self {
            RuleSpec::ReplaceLiteral { from, to } => Box::new(TextRule::replace_literal(from, to)?),
            RuleSpec::ReplacePattern {
                pattern,
                replacement,
            } => Box::new(TextRule::replace_pattern(pattern, replacement)?),
            RuleSpec::RenameType { from, to } => Box::new(TextRule::rename_type(from, to)?),
            RuleSpec::RewriteSignature { method, from, to } => {
                Box::new(TextRule::rewrite_signature(method, from, to)?)
            }
            RuleSpec::WrapArgument { method, adapter } => {
                Box::new(TextRule::wrap_argument(method, adapter)?)
            }
            RuleSpec::EnsureImport {
                symbol,
                statement,
                marker,
            } => {
                let marker = marker.clone().unwrap_or_else(|| symbol.clone());
                Box::new(EnsureImport::new(
                    Arc::clone(language),
                    ImportSpec::new(symbol.clone(), statement.clone(), marker),
                )?)
            }
            RuleSpec::RemoveUnusedImport { statement, marker } => Box::new(
                RemoveUnusedImport::new(Arc::clone(language), statement.clone(), marker.clone())?,
            ),
        })
    }
}

fn default_language() -> String {
    "java".to_string()
}

fn default_excludes() -> Vec<String> {
    vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/build/**".to_string(),
    ]
}

/// A serializable migration.
///
/// # Example YAML
///
/// ```yaml
/// name: bytes-out
/// description: Move serializers to the in-house BytesOut
/// language: java
/// rules:
///   - type: rewrite_signature
///     method: compute
///     from: Bytes<ByteBuffer>
///     to: BytesOut<?>
///   - type: ensure_import
///     symbol: BytesOut
///     statement: import io.local.BytesOut;
///   - type: remove_unused_import
///     statement: import net.example.bytes.Bytes;
///     marker: Bytes
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Unique name for this migration.
    pub name: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Language whose import syntax the import rules use.
    #[serde(default = "default_language")]
    pub language: String,

    /// File extensions to target; empty means the language's own.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Glob patterns to exclude, relative to the root.
    #[serde(default = "default_excludes")]
    pub exclude_patterns: Vec<String>,

    /// The rules to apply, in order.
    pub rules: Vec<RuleSpec>,
}

impl MigrationConfig {
    /// Create a new, empty Java migration.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            language: default_language(),
            extensions: Vec::new(),
            exclude_patterns: default_excludes(),
            rules: Vec::new(),
        }
    }

    /// Append a rule.
    pub fn add_rule(&mut self, rule: RuleSpec) {
        self.rules.push(rule);
    }

    /// Set the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set target extensions.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Set exclude patterns.
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            RewriteError::InvalidConfig(format!("Failed to parse YAML config: {}", e))
        })
    }

    /// Load config from a YAML file.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_yaml_str(&read_config(path.as_ref())?)
    }

    /// Load config from a JSON file.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        serde_json::from_str(&read_config(path.as_ref())?).map_err(|e| {
            RewriteError::InvalidConfig(format!("Failed to parse JSON config: {}", e))
        })
    }

    /// Load config from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(path),
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            _ => Err(RewriteError::InvalidConfig(format!(
                "{}: expected a .yaml, .yml or .json file",
                path.display()
            ))),
        }
    }

    /// Save config to a YAML file.
    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Save config to a JSON file.
    pub fn to_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Validate and convert to a [`Migration`].
    pub fn to_migration(&self) -> Result<ConfigBasedMigration> {
        ConfigBasedMigration::new(self.clone())
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| RewriteError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// A [`Migration`] defined by a config file.
#[derive(Clone)]
pub struct ConfigBasedMigration {
    config: MigrationConfig,
    language: Arc<dyn Language>,
}

impl ConfigBasedMigration {
    /// Create from a config, checking the language and every rule.
    pub fn new(config: MigrationConfig) -> Result<Self> {
        if config.name.trim().is_empty() {
            return Err(RewriteError::InvalidConfig(
                "migration needs a name".to_string(),
            ));
        }
        if config.rules.is_empty() {
            return Err(RewriteError::InvalidConfig(format!(
                "migration '{}' has no rules",
                config.name
            )));
        }
        let language = LanguageRegistry::new()
            .by_name(&config.language)
            .ok_or_else(|| RewriteError::UnsupportedLanguage(config.language.clone()))?;

        let migration = Self { config, language };
        migration.pipeline()?;
        Ok(migration)
    }

    /// Load from a YAML or JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(MigrationConfig::from_path(path)?)
    }

    /// Get the underlying config.
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }
}

impl Migration for ConfigBasedMigration {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn description(&self) -> &str {
        &self.config.description
    }

    fn matcher(&self) -> FileMatcher {
        let matcher = if self.config.extensions.is_empty() {
            FileMatcher::new().extensions(self.language.extensions().iter().copied())
        } else {
            FileMatcher::new().extensions(self.config.extensions.iter().cloned())
        };
        self.config
            .exclude_patterns
            .iter()
            .fold(matcher, |m, pattern| m.exclude(pattern.as_str()))
    }

    fn pipeline(&self) -> Result<RulePipeline> {
        let mut pipeline = RulePipeline::new().with_language(Arc::clone(&self.language));
        for spec in &self.config.rules {
            pipeline.push(spec.to_rule(&self.language)?);
        }
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const YAML: &str = r#"
name: bytes-out
description: Move serializers to BytesOut
rules:
  - type: rewrite_signature
    method: compute
    from: Bytes<ByteBuffer>
    to: BytesOut<?>
  - type: ensure_import
    symbol: BytesOut
    statement: import io.local.BytesOut;
  - type: remove_unused_import
    statement: import net.example.bytes.Bytes;
    marker: Bytes
"#;

    fn yaml_pipeline() -> RulePipeline {
        MigrationConfig::from_yaml_str(YAML)
            .unwrap()
            .to_migration()
            .unwrap()
            .pipeline()
            .unwrap()
    }

    #[test]
    fn test_yaml_format() {
        let config = MigrationConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.name, "bytes-out");
        assert_eq!(config.language, "java");
        assert_eq!(config.rules.len(), 3);
        assert_eq!(
            config.rules[1],
            RuleSpec::EnsureImport {
                symbol: "BytesOut".to_string(),
                statement: "import io.local.BytesOut;".to_string(),
                marker: None,
            }
        );
        assert!(config.exclude_patterns.contains(&"**/.git/**".to_string()));
    }

    #[test]
    fn test_config_based_migration() {
        let migration = MigrationConfig::from_yaml_str(YAML)
            .unwrap()
            .to_migration()
            .unwrap();

        assert_eq!(migration.name(), "bytes-out");
        assert_eq!(migration.pipeline().unwrap().len(), 3);

        let result = migration.pipeline().unwrap().rewrite(
            Path::new("A.java"),
            "package a;\nimport net.example.bytes.Bytes;\nclass A { void compute(Bytes<ByteBuffer> buf) {} }\n",
        );
        assert_eq!(
            result.final_content,
            "package a;\nimport io.local.BytesOut;\nclass A { void compute(BytesOut<?> buf) {} }\n"
        );
    }

    #[test]
    fn test_target_import_already_present() {
        let source = "package a;\nimport io.local.BytesOut;\nimport net.example.bytes.Bytes;\nclass A { void compute(Bytes<ByteBuffer> buf) {} BytesOut<?> o; }\n";
        let result = yaml_pipeline().rewrite(Path::new("A.java"), source);

        assert_eq!(
            result.final_content,
            "package a;\nimport io.local.BytesOut;\nclass A { void compute(BytesOut<?> buf) {} BytesOut<?> o; }\n"
        );
        assert_eq!(result.final_content.matches("import io.local.BytesOut;").count(), 1);
    }

    #[test]
    fn test_old_import_kept_while_still_used() {
        let source = "package a;\nimport net.example.bytes.Bytes;\nclass A { void compute(Bytes<ByteBuffer> buf) {} Object o = Bytes.allocate(); }\n";
        let result = yaml_pipeline().rewrite(Path::new("A.java"), source);

        assert!(result.final_content.contains("import net.example.bytes.Bytes;\n"));
        assert!(result.final_content.contains("import io.local.BytesOut;\n"));
        assert!(result.final_content.contains("compute(BytesOut<?> buf)"));
    }

    #[test]
    fn test_loaded_rules_are_idempotent() {
        let pipeline = yaml_pipeline();
        let inputs = [
            "package a;\nimport net.example.bytes.Bytes;\nclass A { void compute(Bytes<ByteBuffer> buf) {} }\n",
            "package a;\nimport io.local.BytesOut;\nimport net.example.bytes.Bytes;\nclass A { void compute(Bytes<ByteBuffer> buf) {} }\n",
            "package a;\nimport net.example.bytes.Bytes;\nclass A { void compute(Bytes<ByteBuffer> buf) { Bytes.allocate(); } }\n",
            "package a;\nclass A { void compute(BytesOut<?> buf) {} }\n",
            "class A { void compute(Bytes<ByteBuffer> buf) {} }\n",
        ];
        for input in inputs {
            let once = pipeline.rewrite(Path::new("A.java"), input).final_content;
            let twice = pipeline.rewrite(Path::new("A.java"), &once);
            assert!(!twice.changed, "second pass changed:\n{once}");
            assert_eq!(twice.final_content, once);
        }
    }

    #[test]
    fn test_literal_swap_never_duplicates_imports() {
        let mut config = MigrationConfig::new("swap", "Literal import swap");
        config.add_rule(RuleSpec::ReplaceLiteral {
            from: "import net.example.bytes.Bytes;".to_string(),
            to: "import io.local.BytesOut;".to_string(),
        });
        let pipeline = config.to_migration().unwrap().pipeline().unwrap();

        let source = "package a;\nimport io.local.BytesOut;\nimport net.example.bytes.Bytes;\nclass A {}\n";
        let result = pipeline.rewrite(Path::new("A.java"), source);
        assert_eq!(result.final_content, source);
        assert_eq!(result.warnings.len(), 1);

        let fresh = "package a;\nimport net.example.bytes.Bytes;\nclass A {}\n";
        assert_eq!(
            pipeline.rewrite(Path::new("A.java"), fresh).final_content,
            "package a;\nimport io.local.BytesOut;\nclass A {}\n"
        );
    }

    #[test]
    fn test_unknown_rule_type_is_rejected() {
        let yaml = "name: x\nrules:\n  - type: teleport\n    from: a\n";
        let err = MigrationConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, RewriteError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_rule_fails_validation() {
        let mut config = MigrationConfig::new("broken", "Broken pattern");
        config.add_rule(RuleSpec::ReplacePattern {
            pattern: "(".to_string(),
            replacement: "x".to_string(),
        });
        assert!(matches!(config.to_migration(), Err(RewriteError::Regex(_))));
    }

    #[test]
    fn test_unsupported_language() {
        let mut config = MigrationConfig::new("cobol", "").with_language("cobol");
        config.add_rule(RuleSpec::RenameType {
            from: "A".to_string(),
            to: "B".to_string(),
        });
        assert!(matches!(
            config.to_migration(),
            Err(RewriteError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_empty_rules_rejected() {
        let config = MigrationConfig::new("empty", "");
        assert!(matches!(
            config.to_migration(),
            Err(RewriteError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_json_and_yaml_files() {
        let dir = TempDir::new().unwrap();
        let mut config = MigrationConfig::new("kt", "Kotlin rename")
            .with_language("kotlin")
            .with_extensions(vec!["kt".to_string()]);
        config.add_rule(RuleSpec::RemoveUnusedImport {
            statement: "import net.example.bytes.Bytes".to_string(),
            marker: "Bytes".to_string(),
        });

        let json = dir.path().join("m.json");
        let yaml = dir.path().join("m.yml");
        config.to_json(&json).unwrap();
        config.to_yaml(&yaml).unwrap();

        assert_eq!(MigrationConfig::from_path(&json).unwrap(), config);
        assert_eq!(MigrationConfig::from_path(&yaml).unwrap(), config);
        assert!(MigrationConfig::from_path(dir.path().join("m.toml")).is_err());
    }

    #[test]
    fn test_matcher_uses_language_extensions() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("A.java"), "class A {}").unwrap();
        std::fs::write(dir.path().join("B.kt"), "class B").unwrap();

        let migration = MigrationConfig::from_yaml_str(YAML)
            .unwrap()
            .to_migration()
            .unwrap();
        let files = migration.matcher().collect(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("A.java")]);
    }
}
