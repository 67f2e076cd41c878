//! Directory orchestration — the render pipeline for one application directory.
//!
//! A directory holds application configs (`_*.yaml`) and templates (every
//! other `*.yaml`). Every config is resolved into one config per cluster, and
//! every resolved config is rendered with every template.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use strata_core::{resolve, Config, DirOverlays, GeneratorSettings};
use strata_renderer::{RenderedFile, Renderer, TemplateEngine};

use crate::error::{io_err, SyncError};
use crate::writer::{write_file, WriteResult};

// ---------------------------------------------------------------------------
// Directory scan
// ---------------------------------------------------------------------------

/// Files found in one application directory, sorted by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryScan {
    /// Base name of the absolute directory path.
    pub app_name: String,
    pub configs: Vec<PathBuf>,
    pub templates: Vec<PathBuf>,
}

/// List the application configs and templates directly inside `dir`.
pub fn scan_directory(dir: &Path) -> Result<DirectoryScan, SyncError> {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| io_err(dir, e))?
            .join(dir)
    };
    let app_name = absolute
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let entries = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<PathBuf>, _>>()
        .map_err(|e| io_err(dir, e))?;

    let mut files: Vec<PathBuf> = entries
        .into_iter()
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().ends_with(".yaml"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    let (configs, templates): (Vec<PathBuf>, Vec<PathBuf>) = files.into_iter().partition(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().starts_with('_'))
            .unwrap_or(false)
    });

    Ok(DirectoryScan {
        app_name,
        configs,
        templates,
    })
}

/// Load every application config, rejecting duplicate names.
pub fn load_configs(paths: &[PathBuf]) -> Result<Vec<Config>, SyncError> {
    let mut seen = HashSet::new();
    let mut configs = Vec::with_capacity(paths.len());
    for path in paths {
        let config = Config::from_path(path)?;
        if !seen.insert(config.name.clone()) {
            return Err(SyncError::DuplicateName {
                name: config.name,
                path: path.clone(),
            });
        }
        configs.push(config);
    }
    Ok(configs)
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Outcome of processing one application directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryReport {
    pub app_name: String,
    pub writes: Vec<WriteResult>,
}

impl DirectoryReport {
    /// Outputs that were written, or would be in dry-run mode.
    pub fn changed_count(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| !matches!(w, WriteResult::Unchanged { .. }))
            .count()
    }

    pub fn unchanged_count(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w, WriteResult::Unchanged { .. }))
            .count()
    }
}

/// Renders application directories into the output tree.
///
/// Create once with [`Generator::new`], load helpers, then call
/// [`Generator::process_directory`] per application directory.
pub struct Generator {
    settings: GeneratorSettings,
    overlays: DirOverlays,
    renderer: Renderer,
    dry_run: bool,
}

impl Generator {
    /// Construct a [`Generator`], checking that both overlay directories exist.
    pub fn new(settings: GeneratorSettings) -> Result<Self, SyncError> {
        settings.validate()?;
        Ok(Generator {
            overlays: settings.overlays(),
            settings,
            renderer: Renderer::new(TemplateEngine::new()),
            dry_run: false,
        })
    }

    /// Report would-be writes instead of touching the output tree.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Load helper templates matching `pattern`; adds to earlier loads.
    pub fn add_helpers(&mut self, pattern: &str) -> Result<usize, SyncError> {
        Ok(self.renderer.engine_mut().add_helpers(pattern)?)
    }

    /// Render every (resolved config × template) pair in `dir`, handing each
    /// result to `sink` in processing order. Stops at the first error.
    pub fn render_directory<F>(&self, dir: &Path, mut sink: F) -> Result<String, SyncError>
    where
        F: FnMut(RenderedFile) -> Result<(), SyncError>,
    {
        let scan = scan_directory(dir)?;
        let configs = load_configs(&scan.configs)?;
        tracing::info!(
            "processing {} ({} config(s), {} template(s))",
            dir.display(),
            configs.len(),
            scan.templates.len()
        );

        // Every config is validated and resolved before the first render.
        let resolved = configs
            .into_iter()
            .map(|config| {
                let per_cluster =
                    resolve(&config, &self.overlays).map_err(|source| SyncError::Resolve {
                        config: config.name.clone(),
                        source,
                    })?;
                Ok((config, per_cluster))
            })
            .collect::<Result<Vec<(Config, Vec<Config>)>, SyncError>>()?;

        for (config, per_cluster) in &resolved {
            for cluster_config in per_cluster {
                for template in &scan.templates {
                    let rendered = self
                        .renderer
                        .render_one(&scan.app_name, cluster_config, template)
                        .map_err(|source| SyncError::Template {
                            config: config.name.clone(),
                            cluster: cluster_config.clusters.join(","),
                            template: template.clone(),
                            source,
                        })?;
                    sink(rendered)?;
                }
            }
        }
        Ok(scan.app_name)
    }

    /// Render `dir` and write every changed output under the output root.
    ///
    /// Files written before a failure stay on disk.
    pub fn process_directory(&self, dir: &Path) -> Result<DirectoryReport, SyncError> {
        let mut writes = Vec::new();
        let app_name = self.render_directory(dir, |file| {
            let path = self.settings.out_dir.join(&file.path);
            writes.push(write_file(&path, &file.content, self.dry_run)?);
            Ok(())
        })?;

        let report = DirectoryReport { app_name, writes };
        tracing::info!(
            "finished {}: {} changed, {} unchanged",
            dir.display(),
            report.changed_count(),
            report.unchanged_count()
        );
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
