//! Configuration types for PDF-to-DOCX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. One config value is shared by every
//! request the web shell serves, so it is `Clone + Send + Sync` and holds no
//! per-request state.

use crate::error::Pdf2WordError;
use crate::pipeline::engine::DocxEngine;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default program name of the external pdf2docx converter.
pub const DEFAULT_CONVERTER_PROGRAM: &str = "pdf2docx";

/// Default number of paragraphs shown in a text preview.
pub const DEFAULT_PREVIEW_PARAGRAPHS: usize = 20;

/// Configuration for a PDF-to-DOCX conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdf2word::{ConversionConfig, EngineKind};
///
/// let config = ConversionConfig::builder()
///     .engine(EngineKind::Reflow)
///     .preview_paragraphs(10)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Which conversion engine to run. Default: [`EngineKind::Pdf2Docx`].
    pub engine: EngineKind,

    /// Program invoked by [`EngineKind::Pdf2Docx`]. Default: `pdf2docx`.
    ///
    /// Either a bare name resolved through `PATH` or an absolute path, e.g. a
    /// virtualenv's `bin/pdf2docx`.
    pub converter_program: String,

    /// Ask the engine to preserve the original page layout. Default: true.
    pub preserve_layout: bool,

    /// Paragraph cap for text previews. Default: 20.
    pub preview_paragraphs: usize,

    /// Directory for the per-call scratch files. Default: the OS temp dir.
    pub temp_dir: Option<PathBuf>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Pre-constructed engine. Takes precedence over `engine`.
    pub custom_engine: Option<Arc<dyn DocxEngine>>,

    /// Stage events sink. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            converter_program: DEFAULT_CONVERTER_PROGRAM.to_string(),
            preserve_layout: true,
            preview_paragraphs: DEFAULT_PREVIEW_PARAGRAPHS,
            temp_dir: None,
            download_timeout_secs: 120,
            custom_engine: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("engine", &self.engine)
            .field("converter_program", &self.converter_program)
            .field("preserve_layout", &self.preserve_layout)
            .field("preview_paragraphs", &self.preview_paragraphs)
            .field("temp_dir", &self.temp_dir)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "custom_engine",
                &self.custom_engine.as_ref().map(|e| e.label()),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn engine(mut self, kind: EngineKind) -> Self {
        self.config.engine = kind;
        self
    }

    pub fn converter_program(mut self, program: impl Into<String>) -> Self {
        self.config.converter_program = program.into();
        self
    }

    pub fn preserve_layout(mut self, v: bool) -> Self {
        self.config.preserve_layout = v;
        self
    }

    pub fn preview_paragraphs(mut self, n: usize) -> Self {
        self.config.preview_paragraphs = n;
        self
    }

    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(dir.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn custom_engine(mut self, engine: Arc<dyn DocxEngine>) -> Self {
        self.config.custom_engine = Some(engine);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2WordError> {
        let c = &self.config;
        if c.engine == EngineKind::Pdf2Docx
            && c.custom_engine.is_none()
            && c.converter_program.trim().is_empty()
        {
            return Err(Pdf2WordError::InvalidConfig(
                "converter program must not be empty".into(),
            ));
        }
        if let Some(ref dir) = c.temp_dir {
            if !dir.is_dir() {
                return Err(Pdf2WordError::InvalidConfig(format!(
                    "temp dir '{}' is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which engine turns the PDF into a DOCX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// The external `pdf2docx` converter with layout reconstruction. (default)
    #[default]
    Pdf2Docx,
    /// Built-in text reflow: plain paragraphs, no layout reconstruction, no
    /// external programs required.
    Reflow,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Pdf2Docx => f.write_str("pdf2docx"),
            EngineKind::Reflow => f.write_str("reflow"),
        }
    }
}
