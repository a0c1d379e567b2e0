//! Conversion engines: the opaque "PDF file in, DOCX file out" step.
//!
//! Everything that reconstructs layout lives behind [`DocxEngine`]. The
//! pipeline only hands an engine two paths and checks whether it succeeded;
//! it never inspects how the document was built.
//!
//! Two engines ship with the crate:
//!
//! * [`Pdf2DocxCli`] (default) drives the external `pdf2docx` converter, which
//!   parses the PDF and rebuilds paragraphs, tables and images with layout
//!   preserved. It has to be installed separately (`pip install pdf2docx`).
//! * [`TextReflow`] needs nothing outside this crate: it pulls the text layer
//!   out with `pdf-extract` and writes one DOCX paragraph per text block. No
//!   tables, images or styling survive.

use crate::config::{ConversionConfig, EngineKind};
use crate::error::Pdf2WordError;
use docx_rs::{BreakType, Docx, Paragraph, Run};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tracing::{debug, info};

/// A PDF-to-DOCX converter.
///
/// Implementations must be `Send + Sync`; one engine instance serves every
/// request of the web shell.
pub trait DocxEngine: Send + Sync {
    /// Human-readable engine description used in the status line, e.g.
    /// `"pdf2docx (layout=True)"`.
    fn label(&self) -> String;

    /// Convert the PDF at `pdf_path` into a DOCX written to `docx_path`.
    ///
    /// `docx_path` already exists as an empty file and may be overwritten.
    /// The whole page range is converted.
    fn convert(&self, pdf_path: &Path, docx_path: &Path) -> Result<(), Pdf2WordError>;
}

/// Pick the engine a config asks for.
///
/// A pre-built [`ConversionConfig::custom_engine`] wins over
/// [`ConversionConfig::engine`].
pub fn resolve_engine(config: &ConversionConfig) -> Arc<dyn DocxEngine> {
    if let Some(ref engine) = config.custom_engine {
        return Arc::clone(engine);
    }
    match config.engine {
        EngineKind::Pdf2Docx => Arc::new(Pdf2DocxCli::new(
            config.converter_program.clone(),
            config.preserve_layout,
        )),
        EngineKind::Reflow => Arc::new(TextReflow::new(config.preserve_layout)),
    }
}

fn python_bool(v: bool) -> &'static str {
    if v {
        "True"
    } else {
        "False"
    }
}

// ── pdf2docx ─────────────────────────────────────────────────────────────────

const PDF2DOCX_HINT: &str = "Install it with: pip install pdf2docx\n\
Or point --converter at an existing pdf2docx executable, or use --engine reflow.";

/// Number of stderr lines kept in [`Pdf2WordError::EngineFailed`].
const STDERR_TAIL_LINES: usize = 6;

/// Runs the external `pdf2docx` command-line converter.
///
/// Invocation: `<program> convert <in.pdf> <out.docx> --start=0 --layout=True`.
/// No `--end` is passed, so conversion runs to the last page.
#[derive(Debug, Clone)]
pub struct Pdf2DocxCli {
    program: String,
    preserve_layout: bool,
}

impl Pdf2DocxCli {
    pub fn new(program: impl Into<String>, preserve_layout: bool) -> Self {
        Self {
            program: program.into(),
            preserve_layout,
        }
    }

    fn command(&self, pdf_path: &Path, docx_path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("convert")
            .arg(pdf_path)
            .arg(docx_path)
            .arg("--start=0")
            .arg(format!("--layout={}", python_bool(self.preserve_layout)))
            .stdin(Stdio::null());
        cmd
    }
}

impl DocxEngine for Pdf2DocxCli {
    fn label(&self) -> String {
        format!("pdf2docx (layout={})", python_bool(self.preserve_layout))
    }

    fn convert(&self, pdf_path: &Path, docx_path: &Path) -> Result<(), Pdf2WordError> {
        debug!("Running {} convert {}", self.program, pdf_path.display());

        let output = self
            .command(pdf_path, docx_path)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Pdf2WordError::EngineNotFound {
                    program: self.program.clone(),
                    hint: PDF2DOCX_HINT.to_string(),
                },
                _ => Pdf2WordError::EngineFailed {
                    engine: self.label(),
                    detail: format!("could not start '{}': {}", self.program, e),
                },
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("{} stderr:\n{}", self.program, stderr.trim_end());
        }

        if !output.status.success() {
            return Err(Pdf2WordError::EngineFailed {
                engine: self.label(),
                detail: format!("{}\n{}", output.status, stderr_tail(&stderr)),
            });
        }
        Ok(())
    }
}

/// Last few non-empty stderr lines; a Python traceback ends with the message.
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return "(no output on stderr)".to_string();
    }
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

// ── Text reflow ──────────────────────────────────────────────────────────────

/// Lines of one output paragraph.
type Lines = Vec<String>;

/// Built-in engine: text layer only, one paragraph per blank-line separated
/// block, one page break per form feed.
///
/// With `preserve_layout` the original line breaks inside a block are kept
/// as soft breaks; without it each block is reflowed into a single line.
#[derive(Debug, Clone)]
pub struct TextReflow {
    preserve_layout: bool,
}

impl TextReflow {
    pub fn new(preserve_layout: bool) -> Self {
        Self { preserve_layout }
    }
}

impl DocxEngine for TextReflow {
    fn label(&self) -> String {
        format!("text reflow (layout={})", python_bool(self.preserve_layout))
    }

    fn convert(&self, pdf_path: &Path, docx_path: &Path) -> Result<(), Pdf2WordError> {
        // pdf-extract panics on some malformed inputs instead of erroring.
        let text = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(pdf_path)))
            .map_err(|_| Pdf2WordError::EngineFailed {
                engine: self.label(),
                detail: "PDF text extraction aborted on malformed input".to_string(),
            })?
            .map_err(|e| Pdf2WordError::EngineFailed {
                engine: self.label(),
                detail: e.to_string(),
            })?;

        let pages = reflow_pages(&text, self.preserve_layout);
        info!(
            "Reflowed {} pages, {} paragraphs",
            pages.len(),
            pages.iter().map(Vec::len).sum::<usize>()
        );

        let file = File::create(docx_path).map_err(|source| Pdf2WordError::OutputWriteFailed {
            path: docx_path.to_path_buf(),
            source,
        })?;
        build_docx(&pages)
            .build()
            .pack(file)
            .map_err(|e| Pdf2WordError::EngineFailed {
                engine: self.label(),
                detail: format!("writing DOCX: {e}"),
            })?;
        Ok(())
    }
}

static RE_CONTROL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0E-\x1F\x7F]").unwrap());

static RE_INLINE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{A0}]+").unwrap());

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n\s*").unwrap());

/// Split extracted text into pages of paragraphs of lines.
///
/// Pages are separated by form feeds; pages without any text are dropped.
fn reflow_pages(text: &str, preserve_layout: bool) -> Vec<Vec<Lines>> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    text.split('\x0C')
        .map(|page| {
            let page = RE_CONTROL.replace_all(page, " ");
            RE_BLANK_LINES
                .split(&page)
                .filter_map(|block| {
                    let lines: Lines = block
                        .lines()
                        .map(|l| RE_INLINE_WS.replace_all(l, " ").trim().to_string())
                        .filter(|l| !l.is_empty())
                        .collect();
                    match lines.len() {
                        0 => None,
                        _ if preserve_layout => Some(lines),
                        _ => Some(vec![lines.join(" ")]),
                    }
                })
                .collect::<Vec<Lines>>()
        })
        .filter(|page| !page.is_empty())
        .collect()
}

fn build_docx(pages: &[Vec<Lines>]) -> Docx {
    let mut docx = Docx::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
        }
        for lines in page {
            let mut run = Run::new();
            for (j, line) in lines.iter().enumerate() {
                if j > 0 {
                    run = run.add_break(BreakType::TextWrapping);
                }
                run = run.add_text(line);
            }
            docx = docx.add_paragraph(Paragraph::new().add_run(run));
        }
    }
    docx
}
