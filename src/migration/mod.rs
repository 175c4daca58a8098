//! Migrations: named, ordered rule lists plus the files they target.
//!
//! A migration is data. Adding one means listing its rules, either in code
//! (see [`ChronicleBytesMigration`]) or in a YAML/JSON file loaded through
//! [`MigrationConfig`].

mod builtin;
mod config;

pub use builtin::{ChronicleBytesMigration, builtin_migrations, chronicle_bytes_migration};
pub use config::{ConfigBasedMigration, MigrationConfig, RuleSpec};

use crate::error::Result;
use crate::pipeline::RulePipeline;
use crate::source::FileMatcher;

/// A reusable migration.
///
/// # Example
///
/// ```rust
/// use rewrite_dsl::error::Result;
/// use rewrite_dsl::migration::Migration;
/// use rewrite_dsl::pipeline::RulePipeline;
/// use rewrite_dsl::rule::TextRule;
/// use rewrite_dsl::source::FileMatcher;
///
/// struct RenameHandle;
///
/// impl Migration for RenameHandle {
///     fn name(&self) -> &str {
///         "rename-handle"
///     }
///
///     fn description(&self) -> &str {
///         "Rename LegacyHandle to Handle"
///     }
///
///     fn matcher(&self) -> FileMatcher {
///         FileMatcher::new().extension("java")
///     }
///
///     fn pipeline(&self) -> Result<RulePipeline> {
///         Ok(RulePipeline::new().rule(TextRule::rename_type("LegacyHandle", "Handle")?))
///     }
/// }
/// ```
pub trait Migration: Send + Sync {
    /// Unique name for this migration.
    fn name(&self) -> &str;

    /// Human-readable description of what this migration does.
    fn description(&self) -> &str;

    /// The files this migration applies to.
    fn matcher(&self) -> FileMatcher;

    /// The rules to apply, in order.
    fn pipeline(&self) -> Result<RulePipeline>;
}
