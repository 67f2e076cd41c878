//! Dry-run unified diff support for `strata diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::{error::io_err, generator::Generator, writer::should_write, SyncError};

/// A single rendered file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Destination path under the output root.
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Diff result for one application directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffDirectoryResult {
    pub app_name: String,
    pub diffs: Vec<FileDiff>,
}

/// Render what `process_directory` would generate for `dir` and diff it
/// against the output tree.
///
/// Only outputs that would actually be written are reported, so key order or
/// formatting differences alone produce no diff. No files are written.
pub fn diff_directory(generator: &Generator, dir: &Path) -> Result<DiffDirectoryResult, SyncError> {
    let out_dir = &generator.settings().out_dir;
    let mut diffs = Vec::new();

    let app_name = generator.render_directory(dir, |file| {
        let path = out_dir.join(&file.path);
        if !should_write(&path, file.content.as_bytes()) {
            return Ok(());
        }

        let existing = read_existing_or_empty(&path)?;
        let old_header = format!("a/{}", file.path.display());
        let new_header = format!("b/{}", file.path.display());
        let unified = TextDiff::from_lines(&existing, &file.content)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            path,
            unified_diff: unified,
        });
        Ok(())
    })?;

    Ok(DiffDirectoryResult { app_name, diffs })
}

fn read_existing_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}
