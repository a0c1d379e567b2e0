//! Error types for the edgequake-pdf2word library.
//!
//! Only one error type crosses the public API: [`Pdf2WordError`]. Every
//! variant is **fatal** for the conversion request that produced it.
//!
//! Failures that the pipeline recovers from on its own never show up here:
//!
//! * the validation pass skipping an unreadable or unwritable DOCX is reported
//!   as a [`crate::output::PostProcessOutcome`], not as an error;
//! * failing to delete a scratch file is logged and swallowed.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdf2word library.
#[derive(Debug, Error)]
pub enum Pdf2WordError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// The external converter program could not be started.
    #[error("Conversion engine '{program}' was not found.\n{hint}")]
    EngineNotFound { program: String, hint: String },

    /// The engine rejected the PDF (malformed, encrypted, unsupported, …).
    #[error("Conversion with {engine} failed: {detail}")]
    EngineFailed { engine: String, detail: String },

    /// The engine reported success but produced an empty document.
    #[error("Conversion with {engine} produced an empty document")]
    EmptyOutput { engine: String },

    // ── Document errors ───────────────────────────────────────────────────
    /// The validation pass hit a failure it does not know how to recover from.
    #[error("Post-processing failed on '{path}': {detail}")]
    PostProcess { path: PathBuf, detail: String },

    /// DOCX bytes could not be parsed (preview extraction).
    #[error("Malformed DOCX document: {detail}")]
    MalformedDocx { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Creating or writing one of the per-call scratch files failed.
    #[error("Scratch file error: {source}")]
    ScratchFile {
        #[source]
        source: std::io::Error,
    },

    /// The engine's output file could not be read back.
    #[error("Failed to read converted document '{path}': {source}")]
    OutputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output DOCX file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_display() {
        let e = Pdf2WordError::EngineNotFound {
            program: "pdf2docx".into(),
            hint: "pip install pdf2docx".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("'pdf2docx'"), "got: {msg}");
        assert!(msg.contains("pip install"), "got: {msg}");
    }

    #[test]
    fn engine_failed_display() {
        let e = Pdf2WordError::EngineFailed {
            engine: "pdf2docx (layout=True)".into(),
            detail: "exit status 1".into(),
        };
        assert!(e.to_string().contains("exit status 1"));
    }

    #[test]
    fn output_read_failed_keeps_source() {
        use std::error::Error as _;
        let e = Pdf2WordError::OutputReadFailed {
            path: PathBuf::from("/tmp/out.docx"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/tmp/out.docx"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = Pdf2WordError::NotAPdf {
            path: PathBuf::from("x.pdf"),
            magic: *b"PK\x03\x04",
        };
        assert!(e.to_string().contains("x.pdf"));
    }
}
