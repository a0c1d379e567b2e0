//! Conversion entry points.
//!
//! [`convert_pdf_bytes`] is the pipeline proper: synchronous and blocking
//! from the first byte written to the last byte read back. Everything else
//! in this module wraps it for async callers (the web shell, the CLI) or for
//! file-based input and output.

use crate::config::ConversionConfig;
use crate::error::Pdf2WordError;
use crate::output::{docx_file_name, ConversionOutput, ConversionStats, PostProcessOutcome};
use crate::pipeline::engine::resolve_engine;
use crate::pipeline::input::{self, is_url};
use crate::pipeline::postprocess::touch_docx;
use crate::pipeline::scratch::ScratchFiles;
use crate::progress::Stage;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Status line reported for a successful conversion with the given engine.
///
/// With the default engine this is
/// `"Converted with pdf2docx (layout=True) + post-processing"`.
pub fn status_message(engine_label: &str) -> String {
    format!("Converted with {engine_label} + post-processing")
}

/// Convert PDF bytes to DOCX bytes.
///
/// The bytes are written to a scratch `.pdf` file, the configured engine
/// converts it into a scratch `.docx` file over the full page range, the
/// validation pass opens and re-saves the result, and the finished document
/// is read back. Both scratch files are removed before this function
/// returns, whichever way it returns.
///
/// The input is not checked locally; a malformed or non-PDF input fails in
/// the engine.
///
/// # Errors
/// - [`Pdf2WordError::ScratchFile`]: temp files could not be created
/// - [`Pdf2WordError::EngineNotFound`] / [`Pdf2WordError::EngineFailed`]:
///   the engine could not run or rejected the PDF
/// - [`Pdf2WordError::EmptyOutput`]: the engine produced nothing
/// - [`Pdf2WordError::PostProcess`]: unrecoverable validation-pass failure
/// - [`Pdf2WordError::OutputReadFailed`]: the result could not be read back
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdf2word::{convert_pdf_bytes, ConversionConfig};
///
/// let pdf = std::fs::read("invoice.pdf").unwrap();
/// let (docx, status) = convert_pdf_bytes(&pdf, &ConversionConfig::default())
///     .unwrap()
///     .into_parts();
/// std::fs::write("invoice.docx", docx).unwrap();
/// println!("{status}");
/// ```
pub fn convert_pdf_bytes(
    pdf_bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2WordError> {
    run_pipeline(pdf_bytes, config, touch_docx)
}

/// The pipeline body, with the validation pass supplied by the caller.
fn run_pipeline<T>(
    pdf_bytes: &[u8],
    config: &ConversionConfig,
    touch: T,
) -> Result<ConversionOutput, Pdf2WordError>
where
    T: FnOnce(&Path) -> Result<PostProcessOutcome, Pdf2WordError>,
{
    let start = Instant::now();
    let engine = resolve_engine(config);
    let label = engine.label();
    info!("Starting conversion: {} bytes with {}", pdf_bytes.len(), label);

    // ── Step 1: Scratch files ────────────────────────────────────────────
    notify(config, Stage::WritingInput);
    let scratch = ScratchFiles::create(pdf_bytes, config.temp_dir.as_deref())?;

    // ── Step 2: Engine ───────────────────────────────────────────────────
    notify(config, Stage::Converting);
    engine.convert(scratch.input_path(), scratch.output_path())?;

    // ── Step 3: Validation pass ──────────────────────────────────────────
    notify(config, Stage::PostProcessing);
    let post_process = touch(scratch.output_path())?;
    if !post_process.is_resaved() {
        info!("Returning the engine's output without re-saving it");
    }

    // ── Step 4: Read back ────────────────────────────────────────────────
    notify(config, Stage::ReadingOutput);
    let docx = std::fs::read(scratch.output_path()).map_err(|source| {
        Pdf2WordError::OutputReadFailed {
            path: scratch.output_path().to_path_buf(),
            source,
        }
    })?;
    let (input_path, output_path) = scratch.paths();
    drop(scratch);
    debug!(
        "Removed scratch files {} and {}",
        input_path.display(),
        output_path.display()
    );

    if docx.is_empty() {
        return Err(Pdf2WordError::EmptyOutput { engine: label });
    }

    let stats = ConversionStats {
        input_bytes: pdf_bytes.len(),
        output_bytes: docx.len(),
        engine: label.clone(),
        post_process,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Conversion complete: {} -> {} bytes in {}ms",
        stats.input_bytes, stats.output_bytes, stats.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(docx.len());
    }

    Ok(ConversionOutput {
        docx,
        status: status_message(&label),
        stats,
    })
}

/// Run [`convert_pdf_bytes`] on tokio's blocking pool.
///
/// The engine can run for a long time and offers no cancellation, so it
/// must not occupy an async worker thread.
pub async fn convert_pdf_bytes_async(
    pdf_bytes: Vec<u8>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2WordError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || convert_pdf_bytes(&pdf_bytes, &config))
        .await
        .map_err(|e| Pdf2WordError::Internal(format!("Conversion task panicked: {e}")))?
}

/// Convert a local PDF file or URL.
///
/// Unlike [`convert_pdf_bytes`], the input is checked for the `%PDF` magic
/// before conversion.
pub async fn convert_input(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2WordError> {
    let resolved = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    info!("Input '{}' resolved ({} bytes)", resolved.name, resolved.bytes.len());
    convert_pdf_bytes_async(resolved.bytes, config).await
}

/// Convert a PDF file or URL and write the DOCX to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2WordError> {
    let output = convert_input(input_str, config).await?;
    let path = output_path.as_ref();
    let write_err = |source: std::io::Error| Pdf2WordError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("docx.tmp");
    tokio::fs::write(&tmp_path, &output.docx)
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    debug!("Wrote {}", path.display());
    Ok(output)
}

/// Where `pdf2word convert INPUT` writes when no `-o` is given.
///
/// Local files get a sibling `.docx`; URLs land in the current directory.
pub fn default_output_path(input_str: &str) -> PathBuf {
    if is_url(input_str) {
        PathBuf::from(docx_file_name(&input::filename_from_url(input_str)))
    } else {
        let path = Path::new(input_str);
        path.with_file_name(docx_file_name(input_str))
    }
}

fn notify(config: &ConversionConfig, stage: Stage) {
    debug!("Stage: {:?}", stage);
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage(stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::engine::DocxEngine;
    use crate::pipeline::postprocess::{replace_file_with, touch_docx_with};
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::{Cursor, Write};
    use std::sync::{Arc, Mutex};

    /// Writes a fixed DOCX and remembers the paths it was handed.
    struct WritingEngine {
        docx: Vec<u8>,
        seen: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    impl DocxEngine for WritingEngine {
        fn label(&self) -> String {
            "pdf2docx (layout=True)".to_string()
        }

        fn convert(&self, pdf_path: &Path, docx_path: &Path) -> Result<(), Pdf2WordError> {
            self.seen
                .lock()
                .unwrap()
                .push((pdf_path.to_path_buf(), docx_path.to_path_buf()));
            std::fs::write(docx_path, &self.docx).unwrap();
            Ok(())
        }
    }

    fn sample_docx() -> Vec<u8> {
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Invoice 42")));
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    #[test]
    fn failed_resave_returns_engine_output_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(WritingEngine {
            docx: sample_docx(),
            seen: Mutex::new(Vec::new()),
        });
        let config = ConversionConfig::builder()
            .custom_engine(engine.clone())
            .temp_dir(dir.path())
            .build()
            .unwrap();

        // The disk fills up halfway through the re-save.
        let output = run_pipeline(b"%PDF-1.7", &config, |path| {
            touch_docx_with(path, |target, bytes| {
                replace_file_with(target, |file| {
                    file.write_all(&bytes[..bytes.len() / 2])?;
                    Err(std::io::Error::other("No space left on device"))
                })
            })
        })
        .unwrap();

        assert!(matches!(
            output.stats.post_process,
            PostProcessOutcome::SkippedOnSave(_)
        ));
        assert_eq!(output.docx, engine.docx);
        assert_eq!(
            output.status,
            "Converted with pdf2docx (layout=True) + post-processing"
        );

        let seen = engine.seen.lock().unwrap();
        let (pdf, docx) = &seen[0];
        assert!(!pdf.exists());
        assert!(!docx.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn default_status_literal() {
        assert_eq!(
            status_message("pdf2docx (layout=True)"),
            "Converted with pdf2docx (layout=True) + post-processing"
        );
    }

    #[test]
    fn default_output_path_for_local_file() {
        assert_eq!(
            default_output_path("/data/in/report.pdf"),
            PathBuf::from("/data/in/report.docx")
        );
        assert_eq!(default_output_path("scan.PDF"), PathBuf::from("scan.docx"));
    }

    #[test]
    fn default_output_path_for_url() {
        assert_eq!(
            default_output_path("https://example.com/files/paper.pdf"),
            PathBuf::from("paper.docx")
        );
        assert_eq!(
            default_output_path("https://arxiv.org/pdf/1706"),
            PathBuf::from("downloaded.docx")
        );
    }
}
