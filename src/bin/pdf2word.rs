//! CLI binary for edgequake-pdf2word.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` / `ServerConfig` and either runs the web shell or a
//! one-shot conversion.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edgequake_pdf2word::shell::{self, ServerConfig, DEFAULT_PORT};
use edgequake_pdf2word::{
    convert_to_file, default_output_path, docx_text_preview, ConversionConfig,
    ConversionProgressCallback, EngineKind, ProgressCallback, Stage, DEFAULT_CONVERTER_PROGRAM,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner that shows which pipeline stage is running.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("pdf2word");
        bar.set_message("Starting…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Stop and erase the spinner so an error report is not drawn over.
    fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_stage(&self, stage: Stage) {
        self.bar.set_message(stage.describe());
    }

    fn on_conversion_complete(&self, docx_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} Conversion completed successfully {}",
            green("✔"),
            dim(&format!("({docx_len} bytes)"))
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Run the web shell on http://127.0.0.1:8501
  pdf2word serve

  # Listen on all interfaces, cap uploads at 50 MB
  pdf2word serve --host 0.0.0.0 --port 8080 --max-upload-mb 50

  # Convert a file (writes report.docx next to report.pdf)
  pdf2word convert report.pdf

  # Convert to a chosen path and print the first 10 paragraphs
  pdf2word convert report.pdf -o out/report.docx --preview 10

  # Convert from URL with the built-in engine (no pdf2docx needed)
  pdf2word --engine reflow convert https://arxiv.org/pdf/1706.03762.pdf

  # Machine-readable summary
  pdf2word convert report.pdf --json

ENGINES:
  pdf2docx (default)  External converter with layout reconstruction.
                      Install with: pip install pdf2docx
  reflow              Built-in text reflow. Paragraphs only, no layout.

ENVIRONMENT VARIABLES:
  PDF2WORD_ENGINE         Engine: pdf2docx or reflow
  PDF2WORD_CONVERTER      Path or name of the pdf2docx program
  PDF2WORD_TEMP_DIR       Directory for scratch files
  PDF2WORD_HOST / PDF2WORD_PORT / PDF2WORD_MAX_UPLOAD_MB
  RUST_LOG                Overrides the log filter, e.g. RUST_LOG=debug
"#;

/// Convert PDF files to editable Word documents.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2word",
    version,
    about = "Convert PDF files to editable Word (DOCX) documents",
    long_about = "Convert PDF documents to editable DOCX files while trying to preserve the \
original layout. Run the upload/download web shell, or convert files and URLs from the \
command line.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Conversion engine.
    #[arg(long, global = true, env = "PDF2WORD_ENGINE", value_enum, default_value = "pdf2docx")]
    engine: EngineArg,

    /// Program run by the pdf2docx engine (name on PATH or absolute path).
    #[arg(long, global = true, env = "PDF2WORD_CONVERTER", default_value = DEFAULT_CONVERTER_PROGRAM)]
    converter: String,

    /// Do not ask the engine to preserve the page layout.
    #[arg(long, global = true, env = "PDF2WORD_NO_LAYOUT")]
    no_layout: bool,

    /// Directory for scratch files (default: the OS temp dir).
    #[arg(long, global = true, env = "PDF2WORD_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDF2WORD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDF2WORD_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web shell.
    Serve {
        /// Host address to bind to.
        #[arg(long, env = "PDF2WORD_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on.
        #[arg(short, long, env = "PDF2WORD_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Reject uploads larger than this many megabytes (default: no limit).
        #[arg(long, env = "PDF2WORD_MAX_UPLOAD_MB")]
        max_upload_mb: Option<usize>,
    },

    /// Convert one PDF file or URL.
    Convert {
        /// Local PDF file path or HTTP/HTTPS URL.
        input: String,

        /// Write the DOCX here (default: <stem>.docx next to the input).
        #[arg(short, long, env = "PDF2WORD_OUTPUT")]
        output: Option<PathBuf>,

        /// Print the first N non-empty paragraphs of the result.
        #[arg(long, env = "PDF2WORD_PREVIEW", value_name = "N")]
        preview: Option<usize>,

        /// Print a JSON summary instead of text.
        #[arg(long, env = "PDF2WORD_JSON")]
        json: bool,

        /// Disable the progress spinner.
        #[arg(long, env = "PDF2WORD_NO_PROGRESS")]
        no_progress: bool,

        /// HTTP download timeout in seconds.
        #[arg(long, env = "PDF2WORD_DOWNLOAD_TIMEOUT", default_value_t = 120)]
        download_timeout: u64,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum EngineArg {
    Pdf2docx,
    Reflow,
}

impl From<EngineArg> for EngineKind {
    fn from(v: EngineArg) -> Self {
        match v {
            EngineArg::Pdf2docx => EngineKind::Pdf2Docx,
            EngineArg::Reflow => EngineKind::Reflow,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback a one-shot conversion needs, so
    // INFO-level library logs are hidden while it runs.
    let show_progress = match &cli.command {
        Command::Convert {
            json, no_progress, ..
        } => !cli.quiet && !no_progress && !json,
        Command::Serve { .. } => false,
    };
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::Serve {
            host,
            port,
            max_upload_mb,
        } => {
            let config = build_config(&cli, None, 120)?;
            let server = ServerConfig {
                host: host.clone(),
                port: *port,
                max_upload_bytes: max_upload_mb.map(|mb| mb.saturating_mul(1024 * 1024)),
            };
            if !cli.quiet {
                eprintln!(
                    "{} {} {}",
                    cyan("◆"),
                    bold("pdf2word shell on"),
                    bold(&format!("http://{}:{}", server.host, server.port))
                );
            }
            shell::serve(&server, config)
                .await
                .context("Web shell stopped with an error")?;
        }

        Command::Convert {
            input,
            output,
            preview,
            json,
            download_timeout,
            ..
        } => {
            let spinner = show_progress.then(CliProgressCallback::new);
            let progress_cb = spinner
                .clone()
                .map(|cb| cb as Arc<dyn ConversionProgressCallback>);
            let config = build_config(&cli, progress_cb, *download_timeout)?;
            let output_path = output
                .clone()
                .unwrap_or_else(|| default_output_path(input));

            let result = convert_to_file(input, &output_path, &config)
                .await
                .inspect_err(|_| {
                    if let Some(ref cb) = spinner {
                        cb.abandon();
                    }
                })
                .context("Conversion failed")?;

            if !cli.quiet && !*json && !result.stats.post_process.is_resaved() {
                eprintln!(
                    "{}",
                    dim(&format!(
                        "Validation pass skipped, engine output kept as-is ({:?})",
                        result.stats.post_process
                    ))
                );
            }

            let preview_text = match preview {
                Some(n) => Some(
                    docx_text_preview(&result.docx, *n).context("Failed to build text preview")?,
                ),
                None => None,
            };

            if *json {
                let summary = serde_json::json!({
                    "output": output_path,
                    "status": result.status,
                    "stats": result.stats,
                    "preview": preview_text,
                });
                let json =
                    serde_json::to_string_pretty(&summary).context("Failed to serialise output")?;
                println!("{json}");
            } else {
                if let Some(text) = preview_text {
                    if text.is_empty() {
                        println!("{}", dim("No text extracted from the DOCX."));
                    } else {
                        println!("{text}");
                    }
                }
                if !cli.quiet {
                    eprintln!(
                        "{}  {}  {}ms  →  {}",
                        green("✔"),
                        result.status,
                        result.stats.duration_ms,
                        bold(&output_path.display().to_string()),
                    );
                }
            }
        }
    }

    Ok(())
}

/// Map global CLI args to `ConversionConfig`.
fn build_config(
    cli: &Cli,
    progress: Option<ProgressCallback>,
    download_timeout: u64,
) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .engine(cli.engine.into())
        .converter_program(cli.converter.clone())
        .preserve_layout(!cli.no_layout)
        .download_timeout_secs(download_timeout);

    if let Some(ref dir) = cli.temp_dir {
        builder = builder.temp_dir(dir.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
