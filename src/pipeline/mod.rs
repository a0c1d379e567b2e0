//! Pipeline stages for PDF-to-DOCX conversion.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ scratch ──▶ engine ──▶ postprocess ──▶ read back ──▶ preview
//!          (temp .pdf   (pdf2docx   (open + raw                  (first N
//!           + .docx)     or reflow)  re-pack)                     paragraphs)
//! ```
//!
//! 1. [`scratch`]    : the two per-call temp files, removed on drop
//! 2. [`engine`]     : the opaque converter behind the [`engine::DocxEngine`] trait
//! 3. [`postprocess`]: best-effort open-and-resave validation pass
//! 4. [`preview`]    : bounded plain-text preview of the result
//!
//! [`input`] is not a stage: it turns CLI arguments (paths, URLs) into bytes.

pub mod engine;
pub mod input;
pub mod postprocess;
pub mod preview;
pub mod scratch;
