//! Generator settings — where overlays are read from and output is written.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::overlay::DirOverlays;

/// Directory settings for a generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Directory holding `<env>.yaml` overlays.
    pub env_dir: PathBuf,
    /// Directory holding `<cluster>.yaml` overlays.
    pub cluster_dir: PathBuf,
    /// Root of the rendered output tree. Created on first write.
    pub out_dir: PathBuf,
}

impl GeneratorSettings {
    pub fn new(
        env_dir: impl Into<PathBuf>,
        cluster_dir: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        GeneratorSettings {
            env_dir: env_dir.into(),
            cluster_dir: cluster_dir.into(),
            out_dir: out_dir.into(),
        }
    }

    /// Both overlay directories must exist up front.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_dir(&self.env_dir)?;
        require_dir(&self.cluster_dir)
    }

    /// The overlay source backed by these directories.
    pub fn overlays(&self) -> DirOverlays {
        DirOverlays::new(&self.env_dir, &self.cluster_dir)
    }
}

fn require_dir(path: &Path) -> Result<(), ConfigError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
