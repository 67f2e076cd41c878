//! Subcommands and the generator flags they share.

pub mod diff;
pub mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use strata_core::GeneratorSettings;
use strata_sync::Generator;

/// Input, output and overlay locations shared by `render` and `diff`.
#[derive(Args, Debug)]
pub struct GeneratorArgs {
    /// Application directory (or, with --recurse, a directory of them).
    pub input: PathBuf,

    /// Root of the rendered output tree.
    pub output: PathBuf,

    /// Directory containing environment overlays.
    #[arg(long, default_value = "./envs")]
    pub envs: PathBuf,

    /// Directory containing cluster overlays.
    #[arg(long, default_value = "./clusters")]
    pub clusters: PathBuf,

    /// Directory containing helper template files (*.tpl).
    #[arg(long, default_value = "./helpers")]
    pub helpers: PathBuf,

    /// Treat the input as a directory of application directories.
    #[arg(short, long)]
    pub recurse: bool,
}

impl GeneratorArgs {
    /// Build a generator with helpers loaded.
    pub fn generator(&self, dry_run: bool) -> Result<Generator> {
        let settings = GeneratorSettings::new(&self.envs, &self.clusters, &self.output);
        let mut generator = Generator::new(settings)
            .context("failed to create generator")?
            .with_dry_run(dry_run);

        let pattern = self.helpers.join("*.tpl");
        let pattern = pattern.to_string_lossy();
        let loaded = generator
            .add_helpers(&pattern)
            .context("failed to read helpers")?;
        tracing::debug!("loaded {loaded} helper(s) from {pattern}");
        Ok(generator)
    }

    /// The application directories to process, in order.
    pub fn app_dirs(&self) -> Result<Vec<PathBuf>> {
        if !self.recurse {
            return Ok(vec![self.input.clone()]);
        }
        child_dirs(&self.input)
    }
}

fn child_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err = || format!("failed to read directory {}", dir.display());
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(read_err)? {
        let entry = entry.with_context(read_err)?;
        if entry.file_type().with_context(read_err)?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
