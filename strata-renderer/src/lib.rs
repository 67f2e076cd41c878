//! # strata-renderer
//!
//! Tera-based template engine that renders manifests from resolved configs.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use strata_core::Config;
//! use strata_renderer::{Renderer, TemplateEngine};
//!
//! fn render(resolved: &Config) {
//!     let mut engine = TemplateEngine::new();
//!     if engine.add_helpers("helpers/*.tpl").is_ok() {
//!         let renderer = Renderer::new(engine);
//!         if let Ok(file) = renderer.render_one("web", resolved, Path::new("web/deploy.yaml")) {
//!             println!("{}: {} bytes", file.path.display(), file.content.len());
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
mod strict;
pub mod validate;

pub use context::TemplateContext;
pub use engine::{output_path, RenderedFile, Renderer, TemplateEngine};
pub use error::RenderError;
pub use validate::validate_output;
