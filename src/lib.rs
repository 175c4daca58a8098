//! # Rewrite DSL
//!
//! A rule-driven batch source rewriter for mechanical API migrations.
//!
//! This crate provides:
//! - Pattern rules that rename types, rewrite method signatures and wrap call
//!   arguments, matching narrow text shapes instead of parsing
//! - Import management: insert an import where its symbol is used, never
//!   twice, and drop imports that became unused
//! - An ordered rule pipeline whose every rule is idempotent, so reruns are
//!   no-ops
//! - A batch runner that only writes files whose content changed and keeps
//!   going when a single file fails
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rewrite_dsl::prelude::*;
//! use std::sync::Arc;
//!
//! let summary = BatchRunner::in_root("./sirix")
//!     .matching(|f| f.extension("java").exclude("**/build/**"))
//!     .pipeline(
//!         RulePipeline::new()
//!             .rule(TextRule::rewrite_signature("compute", "Bytes<ByteBuffer>", "BytesOut<?>")?)
//!             .rule(EnsureImport::new(
//!                 Arc::new(Java),
//!                 ImportSpec::new("BytesOut", "import io.local.BytesOut;", "BytesOut"),
//!             )?),
//!     )
//!     .run()?;
//!
//! println!("{summary}");
//! # Ok::<(), rewrite_dsl::error::RewriteError>(())
//! ```
//!
//! ## Migrations as data
//!
//! ```rust,no_run
//! use rewrite_dsl::prelude::*;
//!
//! let migration = ConfigBasedMigration::from_path("migrations/bytes-out.yaml")?;
//! let summary = BatchRunner::for_migration(".", &migration)?.dry_run().run()?;
//! println!("{}", summary.diff());
//! # Ok::<(), rewrite_dsl::error::RewriteError>(())
//! ```
//!
//! ## Limitations
//!
//! Argument-list matchers look for `method(` followed by a parenthesis-free
//! list (one nesting level for argument wrapping). Calls with deeper nesting,
//! or string literals containing parentheses, are not matched.

pub mod diff;
pub mod error;
pub mod lang;
pub mod migration;
pub mod pipeline;
pub mod resolver;
pub mod rule;
pub mod runner;
pub mod source;
pub mod unit;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::diff::DiffSummary;
    pub use crate::error::{Result, RewriteError};
    pub use crate::lang::{
        CSharp, Go, Java, Kotlin, Language, LanguageRegistry, LineKind, Python, Rust, TypeScript,
    };
    pub use crate::migration::{
        ChronicleBytesMigration, ConfigBasedMigration, Migration, MigrationConfig, RuleSpec,
        builtin_migrations, chronicle_bytes_migration,
    };
    pub use crate::pipeline::{RewriteResult, RulePipeline};
    pub use crate::resolver::{ImportResolver, ImportSpec, Resolution};
    pub use crate::rule::{EnsureImport, PatternRule, RemoveUnusedImport, TextRule};
    pub use crate::runner::{BatchRunner, Diagnostic, FileChange, RunSummary, Severity};
    pub use crate::source::{FileMatcher, FileSource, FsSource, MemorySource};
    pub use crate::unit::TextUnit;
}

pub use prelude::*;

/// Initialize tracing for the rewrite tool.
///
/// Honors `RUST_LOG`; defaults to `info` for this crate so every changed file
/// gets its one-line notice.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rewrite_dsl=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
