//! Config documents — application configs and environment/cluster overlays.
//!
//! All three roles share one shape; which role a document plays depends only
//! on the directory it was loaded from.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::values::Values;

/// A single config document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Defaults to the file name when loaded with [`Config::from_path`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub namespace: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clusters: Vec<String>,
    /// Environment overlay to apply, e.g. `prod` or `staging`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Values,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Config {
    /// Decode a config from YAML bytes. Unknown keys are ignored and an empty
    /// document decodes to an empty config.
    pub fn from_slice(data: &[u8]) -> Result<Self, ConfigError> {
        if is_blank_document(data) {
            return Ok(Config::default());
        }
        serde_yaml::from_slice(data).map_err(|source| ConfigError::Decode { path: None, source })
    }

    /// Read and decode a config file.
    ///
    /// When the document has no `name`, it defaults to the file name with a
    /// leading `_` and the `.yaml` suffix removed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Config::from_slice(&data).map_err(|e| match e {
            ConfigError::Decode { source, .. } => ConfigError::Decode {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })?;

        if config.name.is_empty() {
            config.name = default_name(path);
        }
        Ok(config)
    }

    /// The environment overlay name, if one is set and non-empty.
    pub fn env_name(&self) -> Option<&str> {
        self.env.as_deref().filter(|e| !e.is_empty())
    }

    /// The single cluster a resolved config is pinned to.
    pub fn cluster(&self) -> Option<&str> {
        match self.clusters.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Check the fields an application config needs before fan-out.
    pub fn validate_app(&self) -> Result<(), ConfigError> {
        if self.clusters.is_empty() {
            return Err(ConfigError::Validation { field: "clusters" });
        }
        if self.namespace.is_empty() {
            return Err(ConfigError::Validation { field: "namespace" });
        }
        Ok(())
    }
}

/// `_web.yaml` → `web`
pub fn default_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = base.strip_prefix('_').unwrap_or(&base);
    base.strip_suffix(".yaml").unwrap_or(base).to_string()
}

/// True for input with nothing but whitespace, comments and document markers.
pub fn is_blank_document(data: &[u8]) -> bool {
    String::from_utf8_lossy(data).lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}
