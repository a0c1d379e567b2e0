//! Result types returned by the conversion entry points.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// MIME type of Office Open XML word-processing documents.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Download name for the DOCX converted from `input_name`: the input's base
/// name with its extension replaced by `.docx`.
///
/// Directory components are dropped; an empty or unusable name falls back
/// to `document.docx`.
pub fn docx_file_name(input_name: &str) -> String {
    let stem = Path::new(input_name.trim())
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem.is_empty() {
        "document.docx".to_string()
    } else {
        format!("{stem}.docx")
    }
}

/// A finished conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The converted document.
    #[serde(skip)]
    pub docx: Vec<u8>,
    /// Human-readable status line, e.g.
    /// `"Converted with pdf2docx (layout=True) + post-processing"`.
    pub status: String,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Split into the `(docx_bytes, status_message)` pair.
    pub fn into_parts(self) -> (Vec<u8>, String) {
        (self.docx, self.status)
    }
}

/// Per-call bookkeeping, mostly for logs and `--json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    pub input_bytes: usize,
    pub output_bytes: usize,
    /// Label of the engine that produced the document.
    pub engine: String,
    pub post_process: PostProcessOutcome,
    pub duration_ms: u64,
}

/// What the open-and-resave validation pass ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum PostProcessOutcome {
    /// The document opened cleanly and was written back.
    Resaved,
    /// The document could not be opened; the engine output is kept as-is.
    SkippedOnOpen(String),
    /// The document opened but could not be written back; kept as-is.
    SkippedOnSave(String),
}

impl PostProcessOutcome {
    pub fn is_resaved(&self) -> bool {
        matches!(self, PostProcessOutcome::Resaved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_parts_returns_bytes_and_status() {
        let out = ConversionOutput {
            docx: vec![1, 2, 3],
            status: "ok".into(),
            stats: ConversionStats {
                input_bytes: 10,
                output_bytes: 3,
                engine: "test".into(),
                post_process: PostProcessOutcome::Resaved,
                duration_ms: 0,
            },
        };
        let (bytes, status) = out.into_parts();
        assert_eq!(bytes, vec![1, 2, 3]);
        assert_eq!(status, "ok");
    }

    #[test]
    fn docx_file_name_replaces_extension() {
        assert_eq!(docx_file_name("report.pdf"), "report.docx");
        assert_eq!(docx_file_name("Report.PDF"), "Report.docx");
        assert_eq!(docx_file_name("archive.v2.pdf"), "archive.v2.docx");
        assert_eq!(docx_file_name("noext"), "noext.docx");
        assert_eq!(docx_file_name("uploads/scan.pdf"), "scan.docx");
        assert_eq!(docx_file_name(""), "document.docx");
        assert_eq!(docx_file_name(".."), "document.docx");
    }

    #[test]
    fn outcome_serialises_tagged() {
        let json = serde_json::to_value(PostProcessOutcome::SkippedOnOpen("bad zip".into())).unwrap();
        assert_eq!(json["outcome"], "skipped_on_open");
        assert_eq!(json["reason"], "bad zip");
        assert!(PostProcessOutcome::Resaved.is_resaved());
    }
}
