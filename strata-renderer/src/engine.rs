//! Tera rendering engine — [`TemplateEngine`] and [`Renderer`].
//!
//! # Helper isolation
//!
//! Helper templates are loaded into a base [`Tera`] once. Every render clones
//! that base and parses the template file into the clone, so a template never
//! changes the helper set seen by any other render.
//!
//! # Output paths
//!
//! | Part            | Source                          |
//! |-----------------|---------------------------------|
//! | `<cluster>`     | the resolved config's cluster   |
//! | `<namespace>`   | `namespace`                     |
//! | `<appName>`     | application directory name      |
//! | `<template>`    | template file base name         |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::{Tera, Value};

use strata_core::Config;

use crate::context::TemplateContext;
use crate::error::{io_err, RenderError};
use crate::strict;
use crate::validate::validate_output;

// ---------------------------------------------------------------------------
// Utility filters
// ---------------------------------------------------------------------------

/// `{{ Values.labels | to_yaml }}` — serialize a value as a YAML fragment.
fn to_yaml(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let yaml = serde_yaml::to_string(value).map_err(|e| tera::Error::msg(e.to_string()))?;
    Ok(Value::String(yaml.trim_end_matches('\n').to_string()))
}

/// `{{ Values.tag | quote }}` — double-quote the string form of a value.
fn quote(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let quoted = serde_json::to_string(&raw).map_err(|e| tera::Error::msg(e.to_string()))?;
    Ok(Value::String(quoted))
}

fn base_tera() -> Tera {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.register_filter("to_yaml", to_yaml);
    tera.register_filter("quote", quote);
    strict::register(&mut tera);
    tera
}

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, RenderError> {
    let mut files = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine holding the shared helper set.
///
/// Helpers are registered under their file base name, so a template can
/// `{% include "labels.tpl" %}` or `{% import "macros.tpl" as m %}`.
#[derive(Clone)]
pub struct TemplateEngine {
    helpers: Tera,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    /// Construct an engine with no helpers and the utility filters registered.
    pub fn new() -> Self {
        TemplateEngine { helpers: base_tera() }
    }

    /// Load every file matching `pattern` as a helper template.
    ///
    /// Adds to any helpers already loaded. On a parse failure the existing
    /// helper set is left as it was. Returns the number of files loaded.
    pub fn add_helpers(&mut self, pattern: &str) -> Result<usize, RenderError> {
        let files = expand_pattern(pattern)?;
        let mut templates = Vec::with_capacity(files.len());
        for path in &files {
            let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
            templates.push((base_name(path), content));
        }
        let names: Vec<String> = templates.iter().map(|(name, _)| name.clone()).collect();

        let mut next = self.helpers.clone();
        next.add_raw_templates(templates)
            .map_err(|source| RenderError::Parse {
                template: pattern.to_string(),
                source,
            })?;
        for name in &names {
            strict::tighten(&mut next, name);
        }
        self.helpers = next;

        tracing::debug!("loaded {} helper template(s) from {}", files.len(), pattern);
        Ok(files.len())
    }

    /// Names of all loaded helper templates.
    pub fn helper_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .helpers
            .get_template_names()
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    /// Parse `template` into a private copy of the helper set and execute it.
    ///
    /// Any reference to an undefined variable or key fails the render,
    /// including in conditions and under `default`.
    pub fn render(&self, template: &Path, ctx: &TemplateContext) -> Result<String, RenderError> {
        let content = std::fs::read_to_string(template).map_err(|e| io_err(template, e))?;
        self.render_str(&base_name(template), &content, ctx)
    }

    /// Like [`TemplateEngine::render`] for a template already in memory.
    pub fn render_str(
        &self,
        name: &str,
        content: &str,
        ctx: &TemplateContext,
    ) -> Result<String, RenderError> {
        let mut tera = self.helpers.clone();
        tera.add_raw_template(name, content)
            .map_err(|source| RenderError::Parse {
                template: name.to_string(),
                source,
            })?;
        strict::tighten(&mut tera, name);

        let tera_ctx = ctx.to_tera_context()?;
        tera.render(name, &tera_ctx)
            .map_err(|source| RenderError::Execution {
                template: name.to_string(),
                source,
            })
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// One rendered manifest, keyed by its path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
}

/// `<cluster>/<namespace>/<app>/<template>`
pub fn output_path(cluster: &str, namespace: &str, app_name: &str, template: &Path) -> PathBuf {
    PathBuf::from(cluster)
        .join(namespace)
        .join(app_name)
        .join(base_name(template))
}

/// Renders templates against resolved configs and validates the output.
///
/// Create once, load helpers, and reuse for every (config, template) pair.
#[derive(Clone, Default)]
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    pub fn new(engine: TemplateEngine) -> Self {
        Renderer { engine }
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TemplateEngine {
        &mut self.engine
    }

    /// Render `template` for one resolved config of application `app_name`.
    pub fn render_one(
        &self,
        app_name: &str,
        resolved: &Config,
        template: &Path,
    ) -> Result<RenderedFile, RenderError> {
        let template_name = base_name(template);
        let cluster = resolved.cluster().ok_or_else(|| RenderError::Validation {
            template: template_name.clone(),
            field: "cluster",
        })?;

        let ctx = TemplateContext::from_config(app_name, resolved, cluster);
        let content = self.engine.render(template, &ctx)?;
        validate_output(&template_name, &content)?;

        Ok(RenderedFile {
            path: output_path(cluster, &resolved.namespace, app_name, template),
            content,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
