//! Overlay resolution — fans one application config out into one resolved
//! config per target cluster.
//!
//! # Precedence
//!
//! For each key, highest wins:
//!
//! 1. application config `values`
//! 2. environment overlay `values` (only when `env` is set)
//! 3. cluster overlay `values`

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{ConfigError, OverlayKind};
use crate::values::merge_values;

/// Where environment and cluster overlays come from.
pub trait OverlaySource {
    /// Load the environment overlay called `name`.
    fn environment(&self, name: &str) -> Result<Config, ConfigError>;

    /// Load the cluster overlay called `name`.
    fn cluster(&self, name: &str) -> Result<Config, ConfigError>;
}

/// Overlays stored as `<dir>/<name>.yaml`, decoded fresh on every lookup.
#[derive(Debug, Clone)]
pub struct DirOverlays {
    pub env_dir: PathBuf,
    pub cluster_dir: PathBuf,
}

impl DirOverlays {
    pub fn new(env_dir: impl Into<PathBuf>, cluster_dir: impl Into<PathBuf>) -> Self {
        DirOverlays {
            env_dir: env_dir.into(),
            cluster_dir: cluster_dir.into(),
        }
    }
}

fn overlay_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.yaml"))
}

impl OverlaySource for DirOverlays {
    fn environment(&self, name: &str) -> Result<Config, ConfigError> {
        let path = overlay_path(&self.env_dir, name);
        tracing::debug!("loading environment overlay {}", path.display());
        Config::from_path(&path)
    }

    fn cluster(&self, name: &str) -> Result<Config, ConfigError> {
        let path = overlay_path(&self.cluster_dir, name);
        tracing::debug!("loading cluster overlay {}", path.display());
        Config::from_path(&path)
    }
}

fn missing(kind: OverlayKind, name: &str, source: ConfigError) -> ConfigError {
    ConfigError::MissingOverlay {
        kind,
        name: name.to_string(),
        source: Box::new(source),
    }
}

/// Resolve `app` against its overlays: one config per listed cluster, in
/// listed order, each pinned to that single cluster.
///
/// The input config is never modified.
pub fn resolve(app: &Config, overlays: &impl OverlaySource) -> Result<Vec<Config>, ConfigError> {
    app.validate_app()?;

    let mut resolved = Vec::with_capacity(app.clusters.len());
    for cluster in &app.clusters {
        let mut out = app.clone();

        if let Some(env) = app.env_name() {
            let env_config = overlays
                .environment(env)
                .map_err(|e| missing(OverlayKind::Environment, env, e))?;
            out.values = merge_values(&env_config.values, &out.values);
        }

        let cluster_config = overlays
            .cluster(cluster)
            .map_err(|e| missing(OverlayKind::Cluster, cluster, e))?;
        out.values = merge_values(&cluster_config.values, &out.values);

        out.clusters = vec![cluster.clone()];
        resolved.push(out);
    }
    Ok(resolved)
}
