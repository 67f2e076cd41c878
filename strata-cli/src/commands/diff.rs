//! `strata diff` — show unified diffs for what render would write.

use anyhow::{Context, Result};
use clap::Args;

use strata_sync::diff_directory;

use super::GeneratorArgs;

/// Arguments for `strata diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub generator: GeneratorArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let generator = self.generator.generator(true)?;

        for dir in self.generator.app_dirs()? {
            let result = diff_directory(&generator, &dir)
                .with_context(|| format!("diff failed for {}", dir.display()))?;

            if result.diffs.is_empty() {
                println!("No differences for '{}'.", result.app_name);
                continue;
            }

            for diff in result.diffs {
                print!("{}", diff.unified_diff);
                if !diff.unified_diff.ends_with('\n') {
                    println!();
                }
            }
        }

        Ok(())
    }
}
