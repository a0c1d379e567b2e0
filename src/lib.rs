//! # edgequake-pdf2word
//!
//! Convert PDF documents to editable Word (`.docx`) files.
//!
//! The heavy lifting is done by an engine behind the [`DocxEngine`] trait:
//! by default the external `pdf2docx` converter, which rebuilds the page
//! layout, or a pure-Rust text reflow engine when no converter is installed.
//! This crate supplies everything around it: scratch-file handling with
//! guaranteed cleanup, a content-preserving validation pass, a bounded text
//! preview, a CLI and a small upload/download web shell.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Scratch   write a unique temp .pdf, reserve a unique temp .docx
//!  ├─ 2. Engine    pdf2docx (layout=True) or text reflow, full page range
//!  ├─ 3. Touch     open + re-save the .docx; failures leave it as-is
//!  ├─ 4. Read      DOCX bytes back into memory, temp files removed
//!  └─ 5. Preview   first N non-empty paragraphs as plain text (optional)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2word::{convert_pdf_bytes, docx_text_preview, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let pdf = std::fs::read("report.pdf")?;
//!     let output = convert_pdf_bytes(&pdf, &config)?;
//!     println!("{}", output.status);
//!     println!("{}", docx_text_preview(&output.docx, config.preview_paragraphs)?);
//!     std::fs::write("report.docx", &output.docx)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `pdf2word` binary (clap + anyhow + indicatif + tracing-subscriber) |
//! | `server` | on      | Enables the [`shell`] web application (axum + tower-http) |
//!
//! Disable both when using only the library:
//! ```toml
//! edgequake-pdf2word = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
#[cfg(feature = "server")]
pub mod shell;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionConfig, ConversionConfigBuilder, EngineKind, DEFAULT_CONVERTER_PROGRAM,
    DEFAULT_PREVIEW_PARAGRAPHS,
};
pub use convert::{
    convert_input, convert_pdf_bytes, convert_pdf_bytes_async, convert_to_file,
    default_output_path, status_message,
};
pub use error::Pdf2WordError;
pub use output::{docx_file_name, ConversionOutput, ConversionStats, PostProcessOutcome, DOCX_MIME};
pub use pipeline::engine::{DocxEngine, Pdf2DocxCli, TextReflow};
pub use pipeline::preview::docx_text_preview;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
