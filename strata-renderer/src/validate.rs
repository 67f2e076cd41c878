//! Minimal structural check on rendered manifests.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::RenderError;

/// The fields of a rendered object that are checked. Not a full schema.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedObject {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// Require non-empty `kind`, `apiVersion` and `metadata.name` in `content`.
///
/// Only the first document of a multi-document stream is checked.
pub fn validate_output(template: &str, content: &str) -> Result<(), RenderError> {
    let decode_err = |source| RenderError::Decode {
        template: template.to_string(),
        source,
    };
    let first = match serde_yaml::Deserializer::from_str(content).next() {
        Some(document) => serde_yaml::Value::deserialize(document).map_err(decode_err)?,
        None => serde_yaml::Value::Null,
    };
    let object: RenderedObject = if first.is_null() {
        RenderedObject::default()
    } else {
        serde_yaml::from_value(first).map_err(decode_err)?
    };

    let missing = |field| RenderError::Validation {
        template: template.to_string(),
        field,
    };
    if object.kind.is_empty() {
        return Err(missing("kind"));
    }
    if object.api_version.is_empty() {
        return Err(missing("apiVersion"));
    }
    if object.metadata.name.is_empty() {
        return Err(missing("metadata.name"));
    }
    Ok(())
}
