//! Error types for strata-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A helper or template file failed to parse.
    #[error("failed to parse template {template}")]
    Parse {
        template: String,
        #[source]
        source: tera::Error,
    },

    /// Template execution failed, including references to undefined values.
    #[error("failed to execute template {template}")]
    Execution {
        template: String,
        #[source]
        source: tera::Error,
    },

    /// Rendered output is missing a required manifest field.
    #[error("output of {template}: {field} must be set")]
    Validation {
        template: String,
        field: &'static str,
    },

    /// Rendered output is not a decodable manifest.
    #[error("output of {template} is not a valid manifest")]
    Decode {
        template: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The context could not be serialized for tera.
    #[error("failed to build template context")]
    Context(#[source] tera::Error),

    /// Invalid helper glob pattern.
    #[error("invalid helper pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Filesystem error while expanding a helper glob.
    #[error("failed to list helper files: {0}")]
    Glob(#[from] glob::GlobError),

    /// Filesystem error while reading a template.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
