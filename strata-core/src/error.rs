//! Error types for strata-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which overlay directory a lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Environment,
    Cluster,
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayKind::Environment => f.write_str("environment"),
            OverlayKind::Cluster => f.write_str("cluster"),
        }
    }
}

/// All errors that can arise from loading and resolving configs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, or the document does not have the config shape.
    #[error("failed to parse config{}: {source}", path_suffix(.path))]
    Decode {
        path: Option<PathBuf>,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required field is missing or empty.
    #[error("{field} must be set")]
    Validation { field: &'static str },

    /// An environment or cluster overlay could not be loaded.
    #[error("failed to load {kind} overlay '{name}'")]
    MissingOverlay {
        kind: OverlayKind,
        name: String,
        #[source]
        source: Box<ConfigError>,
    },

    /// A configured overlay directory does not exist or is not a directory.
    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" {}", p.display()),
        None => String::new(),
    }
}
