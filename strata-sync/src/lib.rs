//! # strata-sync
//!
//! Change-gated atomic writer and directory orchestration.
//!
//! Build a [`Generator`] from [`strata_core::GeneratorSettings`], load helper
//! templates, then call [`Generator::process_directory`] for each application
//! directory.

pub mod diff;
pub mod digest;
pub mod error;
pub mod generator;
pub mod writer;

pub use diff::{diff_directory, DiffDirectoryResult, FileDiff};
pub use error::SyncError;
pub use generator::{scan_directory, DirectoryReport, DirectoryScan, Generator};
pub use writer::{write_file, WriteResult};
