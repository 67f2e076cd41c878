//! Strata — per-cluster manifest generator.
//!
//! # Usage
//!
//! ```text
//! strata render <IN> <OUT> [--envs DIR] [--clusters DIR] [--helpers DIR] [-r] [--dry-run] [--keep-going]
//! strata diff <IN> <OUT> [--envs DIR] [--clusters DIR] [--helpers DIR] [-r]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, render::RenderArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "strata",
    version,
    about = "Render per-cluster manifests from layered config overlays",
    long_about = None,
)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render application directories and write changed manifests.
    Render(RenderArgs),

    /// Show unified diff of what render would write.
    Diff(DiffArgs),
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Render(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}
