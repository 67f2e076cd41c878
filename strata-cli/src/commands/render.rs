//! `strata render` — render application directories and write changed files.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use strata_sync::{DirectoryReport, WriteResult};

use super::GeneratorArgs;

/// Arguments for `strata render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub generator: GeneratorArgs,

    /// Show what would be written without actually writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Keep processing remaining directories after a failure.
    #[arg(long)]
    pub keep_going: bool,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let generator = self.generator.generator(self.dry_run)?;
        let mut failed = 0usize;

        for dir in self.generator.app_dirs()? {
            let result = generator
                .process_directory(&dir)
                .with_context(|| format!("failed to process directory {}", dir.display()));
            match result {
                Ok(report) => print_report(&report, self.dry_run),
                Err(err) if self.keep_going => {
                    failed += 1;
                    tracing::error!("{err:#}");
                    println!("{} '{}'", "✗".red().bold(), dir.display());
                }
                Err(err) => return Err(err),
            }
        }

        if failed > 0 {
            bail!("{failed} director{} failed", if failed == 1 { "y" } else { "ies" });
        }
        Ok(())
    }
}

fn print_report(report: &DirectoryReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let app = &report.app_name;

    if report.writes.is_empty() {
        println!("{prefix}✓ '{app}' — nothing to do");
        return;
    }

    let verb = if dry_run { "would write" } else { "written" };
    println!(
        "{prefix}✓ '{app}' rendered ({} {verb}, {} unchanged)",
        report.changed_count(),
        report.unchanged_count()
    );

    for r in &report.writes {
        match r {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
        }
    }
}
