//! Plain-text preview of a DOCX document.
//!
//! Only top-level body paragraphs are read (table cells, headers and
//! footnotes are not part of the preview). A paragraph's text is the
//! concatenation of its runs, hyperlink runs included.

use crate::error::Pdf2WordError;
use docx_rs::{read_docx, Docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild};
use std::panic;

/// Extract up to `max_paragraphs` non-blank paragraphs, trimmed, one per line.
///
/// Blank paragraphs (empty or whitespace-only) are skipped and do not count
/// towards the cap. Soft line breaks inside a paragraph are folded into
/// spaces so the result never has more than `max_paragraphs` lines.
///
/// # Errors
/// [`Pdf2WordError::MalformedDocx`] when the bytes are not a readable DOCX.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdf2word::docx_text_preview;
///
/// let bytes = std::fs::read("report.docx").unwrap();
/// println!("{}", docx_text_preview(&bytes, 20).unwrap());
/// ```
pub fn docx_text_preview(docx: &[u8], max_paragraphs: usize) -> Result<String, Pdf2WordError> {
    let doc = parse_docx(docx).map_err(|detail| Pdf2WordError::MalformedDocx { detail })?;

    let lines: Vec<String> = body_paragraphs(&doc)
        .map(paragraph_text)
        .map(|t| fold_lines(&t))
        .filter(|t| !t.is_empty())
        .take(max_paragraphs)
        .collect();

    Ok(lines.join("\n"))
}

/// Parse DOCX bytes, turning reader panics into errors.
pub(crate) fn parse_docx(bytes: &[u8]) -> Result<Docx, String> {
    match panic::catch_unwind(|| read_docx(bytes)) {
        Ok(Ok(doc)) => Ok(doc),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("DOCX reader aborted on malformed input".to_string()),
    }
}

fn body_paragraphs(doc: &Docx) -> impl Iterator<Item = &Paragraph> {
    doc.document.children.iter().filter_map(|child| match child {
        DocumentChild::Paragraph(p) => Some(p.as_ref()),
        _ => None,
    })
}

fn paragraph_text(p: &Paragraph) -> String {
    let mut out = String::new();
    push_children(&p.children, &mut out);
    out
}

fn push_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, out),
            ParagraphChild::Hyperlink(link) => push_children(&link.children, out),
            _ => {}
        }
    }
}

fn push_run(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

/// Trim, and join the non-blank lines of a multi-line paragraph with spaces.
fn fold_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
