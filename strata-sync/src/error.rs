//! Error types for strata-sync.

use std::path::PathBuf;

use thiserror::Error;

use strata_core::ConfigError;
use strata_renderer::RenderError;

/// All errors that can arise from generating a directory.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An application config could not be loaded, or settings are invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Overlay resolution failed for an application config.
    #[error("failed to resolve config '{config}'")]
    Resolve {
        config: String,
        #[source]
        source: ConfigError,
    },

    /// Helper loading failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Rendering one (config, cluster, template) combination failed.
    #[error("failed to render {template} for config '{config}' on cluster '{cluster}'")]
    Template {
        config: String,
        cluster: String,
        template: PathBuf,
        #[source]
        source: RenderError,
    },

    /// Two application configs in one directory share a name.
    #[error("a config named '{name}' already exists (duplicate in {path})")]
    DuplicateName { name: String, path: PathBuf },

    /// Creating directories, the temp file, or renaming it into place failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error while scanning, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`SyncError::Write`].
pub(crate) fn write_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Write {
        path: path.into(),
        source,
    }
}
