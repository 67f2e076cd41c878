//! Template context — the read-only view a template renders against.

use serde::{Deserialize, Serialize};

use strata_core::{Config, Values};

use crate::error::RenderError;

/// Rendering payload for one resolved config.
///
/// Serialized with PascalCase keys, so templates read `{{ AppName }}`,
/// `{{ Cluster }}` and `{{ Values.replicas }}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateContext {
    /// Name of the application directory.
    pub app_name: String,
    /// Name of the application config (file name or explicit `name`).
    pub config_name: String,
    pub namespace: String,
    /// The single cluster this render targets.
    pub cluster: String,
    /// Environment name, empty when the config sets none.
    pub env: String,
    /// Fully resolved values for this cluster.
    pub values: Values,
}

impl TemplateContext {
    /// Build a [`TemplateContext`] from a resolved config pinned to `cluster`.
    pub fn from_config(app_name: &str, config: &Config, cluster: &str) -> Self {
        TemplateContext {
            app_name: app_name.to_string(),
            config_name: config.name.clone(),
            namespace: config.namespace.clone(),
            cluster: cluster.to_string(),
            env: config.env_name().unwrap_or_default().to_string(),
            values: config.values.clone(),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::Context)
    }
}
