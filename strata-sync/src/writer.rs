//! Change-gated atomic writer.
//!
//! ## `write_file` protocol
//!
//! 1. Render content (already done by caller).
//! 2. Read the existing file; if absent or unreadable, it must be written.
//! 3. Compare structural digests of existing and new content → skip if equal.
//! 4. Create the destination directory tree.
//! 5. Write to a temp file in the destination directory.
//! 6. Rename the temp file over the destination (atomic on POSIX).
//!
//! The temp file is deleted whenever step 6 is not reached.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::digest::same_structure;
use crate::error::{write_err, SyncError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped — existing content is structurally identical.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    /// True when the file on disk was replaced.
    pub fn written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }

    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// write_file
// ---------------------------------------------------------------------------

/// Whether `content` must be written to `path`.
///
/// Never fails: any problem reading or decoding the existing file means the
/// file is rewritten.
pub fn should_write(path: &Path, content: &[u8]) -> bool {
    match std::fs::read(path) {
        Ok(existing) => !same_structure(&existing, content),
        Err(_) => true,
    }
}

/// Write `content` to `path` unless the file already holds the same structure.
pub fn write_file(path: &Path, content: &str, dry_run: bool) -> Result<WriteResult, SyncError> {
    if !should_write(path, content.as_bytes()) {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    replace_atomically(path, |file| file.write_all(content.as_bytes()))?;

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

fn replace_atomically<F>(path: &Path, populate: F) -> Result<(), SyncError>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| write_err(dir, e))?;

    // Dropping `tmp` on any early return deletes the temp file.
    let mut tmp = tempfile::Builder::new()
        .prefix(".tmp.")
        .tempfile_in(dir)
        .map_err(|e| write_err(dir, e))?;
    populate(tmp.as_file_mut()).map_err(|e| write_err(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| write_err(tmp.path(), e))?;

    tmp.persist(path).map_err(|e| write_err(path, e.error))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
