//! Configuration loading
//!
//! `defaults/modview.default.toml` is embedded into the binary so that docs and runtime
//! behavior stay in sync. Applications layer user-specific files on top of those defaults
//! via [`Loader`] before deserializing into [`ModviewConfig`].

use crate::modview::formats::TreevizFormatter;
use crate::modview::location::OffsetEncoding;
use crate::modview::pipeline::Pipeline;
use crate::modview::version::VersionError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use log::LevelFilter;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/modview.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModviewConfig {
    pub lexer: LexerConfig,
    pub render: RenderConfig,
    pub treeviz: TreevizConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexerConfig {
    /// Release that produced the records; `None` assumes the newest one.
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub format: String,
    pub elide_empty_text: bool,
    pub offsets: OffsetEncoding,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreevizConfig {
    pub label_width: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub level: LevelFilter,
}

impl ModviewConfig {
    /// A pipeline set up the way this configuration describes.
    pub fn pipeline(&self) -> Result<Pipeline, VersionError> {
        let pipeline = match &self.lexer.version {
            Some(version) => Pipeline::for_version(version)?,
            None => Pipeline::new(),
        };
        Ok(pipeline
            .with_offsets(self.render.offsets)
            .elide_empty_text(self.render.elide_empty_text))
    }

    pub fn treeviz_formatter(&self) -> TreevizFormatter {
        TreevizFormatter {
            label_width: self.treeviz.label_width,
        }
    }
}

/// Builds a [`ModviewConfig`] from the embedded defaults, then config files, then flags.
///
/// Later layers win key by key.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file passed with `--config`. Building fails if it does not exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file that may be absent, such as `./modview.toml`.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set a dotted key such as `render.offsets` from a command-line flag.
    /// `None` (flag not given) keeps whatever the lower layers say.
    pub fn set_override<V>(mut self, key: &str, value: Option<V>) -> Result<Self, ConfigError>
    where
        V: Into<ValueKind>,
    {
        if let Some(value) = value {
            self.builder = self.builder.set_override(key, value)?;
        }
        Ok(self)
    }

    pub fn build(self) -> Result<ModviewConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The shipped defaults with nothing layered on top.
pub fn load_defaults() -> Result<ModviewConfig, ConfigError> {
    Loader::new().build()
}
