//! CLI for the rewrite engine.

use anyhow::{Context, Result};
use clap::Parser;
use rewrite_dsl::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rewrite")]
#[command(author, version, about = "Batch source rewriter for API migrations", long_about = None)]
struct Cli {
    /// Root directory to rewrite
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Migration file (YAML or JSON); repeatable. Built-ins run when omitted
    #[arg(short, long = "config")]
    config: Vec<PathBuf>,

    /// Preview changes without writing
    #[arg(long)]
    dry_run: bool,

    /// Show built-in migrations
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    rewrite_dsl::init_tracing();

    if cli.list {
        return cmd_list();
    }

    let migrations = load_migrations(&cli.config)?;
    cmd_run(&cli.root, &migrations, cli.dry_run)
}

fn load_migrations(paths: &[PathBuf]) -> Result<Vec<Box<dyn Migration>>> {
    if paths.is_empty() {
        return Ok(builtin_migrations());
    }
    paths
        .iter()
        .map(|path| {
            let migration = ConfigBasedMigration::from_path(path)
                .with_context(|| format!("Failed to load migration {}", path.display()))?;
            Ok(Box::new(migration) as Box<dyn Migration>)
        })
        .collect()
}

fn cmd_run(root: &Path, migrations: &[Box<dyn Migration>], dry_run: bool) -> Result<()> {
    let mut total = RunSummary::default();

    for migration in migrations {
        let mut runner = BatchRunner::for_migration(root, migration.as_ref())
            .with_context(|| format!("Invalid migration '{}'", migration.name()))?;
        if dry_run {
            runner = runner.dry_run();
        }
        let summary = runner
            .run()
            .with_context(|| format!("Migration '{}' failed", migration.name()))?;
        total.merge(summary);
    }

    if dry_run {
        println!("{}", total.colorized_diff());
        println!("\n{}", total.diff_summary());
    }
    println!("{total}");

    Ok(())
}

fn cmd_list() -> Result<()> {
    println!("Built-in migrations:");
    for migration in builtin_migrations() {
        println!("  {} - {}", migration.name(), migration.description());
        for rule in migration.pipeline()?.describe() {
            println!("      {rule}");
        }
    }
    Ok(())
}
