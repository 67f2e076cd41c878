//! Strata core library — config documents, value merging, overlay resolution.
//!
//! - [`config`] — [`Config`] decoding from YAML
//! - [`values`] — [`Values`] and the shallow [`merge_values`]
//! - [`overlay`] — per-cluster fan-out via [`resolve`]
//! - [`settings`] — [`GeneratorSettings`]
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod overlay;
pub mod settings;
pub mod values;

pub use config::Config;
pub use error::{ConfigError, OverlayKind};
pub use overlay::{resolve, DirOverlays, OverlaySource};
pub use settings::GeneratorSettings;
pub use values::{merge_values, Values};
