//! HTML rendering for the upload page.
//!
//! Every response is rendered from scratch out of the current request; the
//! shell keeps no session state between requests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use crate::output::DOCX_MIME;

/// What the right-hand panel of the page shows.
pub(crate) enum PageView<'a> {
    /// Nothing uploaded yet.
    Empty,
    /// A finished conversion.
    Converted {
        download_name: &'a str,
        status: &'a str,
        preview: &'a str,
        docx: &'a [u8],
    },
    /// The upload or the conversion failed.
    Failed { message: &'a str },
}

const STYLE: &str = r#"
body { background-color: #f0f2f6; font-family: 'Arial', sans-serif; color: #333333; margin: 0; }
.app { background-color: #ffffff; border-radius: 10px; padding: 20px; margin: 24px auto; max-width: 1100px; box-shadow: 0 4px 8px rgba(0,0,0,0.1); }
h1 { color: #1f77b4; font-weight: bold; }
.columns { display: flex; gap: 32px; }
.upload { flex: 1; }
.result { flex: 2; }
.uploader { border: 2px dashed #1f77b4; border-radius: 10px; padding: 20px; background-color: #f9f9f9; }
button { background-color: #ff7f0e; color: white; border-radius: 5px; border: none; padding: 10px 20px; font-weight: bold; cursor: pointer; }
button:hover { background-color: #e66a0a; }
.success { background-color: #d4edda; color: #155724; border: 1px solid #c3e6cb; border-radius: 5px; padding: 10px; }
.info { background-color: #d1ecf1; color: #0c5460; border: 1px solid #bee5eb; border-radius: 5px; padding: 10px; }
.error { background-color: #f8d7da; color: #721c24; border: 1px solid #f5c6cb; border-radius: 5px; padding: 10px; }
.caption { color: #6c757d; font-size: 0.9em; }
pre { background-color: #f8f9fa; border: 1px solid #dee2e6; border-radius: 5px; padding: 10px; white-space: pre-wrap; }
a.download { display: block; text-align: center; background-color: #28a745; color: white; border-radius: 5px; padding: 10px 20px; font-weight: bold; text-decoration: none; }
a.download:hover { background-color: #218838; }
"#;

/// Render the full page.
pub(crate) fn render(view: &PageView<'_>) -> String {
    let hint = match view {
        PageView::Empty => {
            r#"<p class="info">👆 Upload a PDF to get started. Supported formats: PDF only.</p>"#
        }
        _ => "",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>PDF to Docx Converter</title>
<style>{STYLE}</style>
</head>
<body>
<div class="app">
<h1>📄 PDF to Docx Converter</h1>
<p>Transform your PDFs into editable DOCX files with <strong>layout preservation</strong>.
Upload, convert, and download in seconds! 🚀</p>
<div class="columns">
<section class="upload">
<h3>📤 Upload Your PDF</h3>
<form class="uploader" action="/convert" method="post" enctype="multipart/form-data">
<input type="file" name="file" accept=".pdf,application/pdf" required>
<button type="submit">Convert</button>
</form>
{hint}
</section>
<section class="result">
{result}
</section>
</div>
</div>
</body>
</html>
"#,
        result = render_result(view),
    )
}

fn render_result(view: &PageView<'_>) -> String {
    match view {
        PageView::Empty => String::new(),
        PageView::Failed { message } => format!(
            r#"<p class="error">❌ Conversion failed: {}</p>"#,
            escape_html(message)
        ),
        PageView::Converted {
            download_name,
            status,
            preview,
            docx,
        } => {
            let preview_html = if preview.is_empty() {
                r#"<p class="info">No text extracted from the DOCX.</p>"#.to_string()
            } else {
                format!("<pre>{}</pre>", escape_html(preview))
            };

            format!(
                r#"<p class="success">✅ Conversion completed successfully!</p>
<p class="caption">ℹ️ {status}</p>
<h3>👀 Text Preview</h3>
{preview_html}
<h3>⬇️ Download Your DOCX</h3>
<a class="download" href="data:{DOCX_MIME};base64,{data}" download="{name}">📥 Download DOCX</a>"#,
                status = escape_html(status),
                data = STANDARD.encode(docx),
                name = escape_html(download_name),
            )
        }
    }
}

/// Escape text for element content and double-quoted attributes.
pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_shows_hint() {
        let html = render(&PageView::Empty);
        assert!(html.contains("Upload a PDF to get started"));
        assert!(html.contains(r#"name="file""#));
        assert!(!html.contains("Download DOCX"));
    }

    #[test]
    fn converted_page_carries_download() {
        let html = render(&PageView::Converted {
            download_name: "report.docx",
            status: "Converted with pdf2docx (layout=True) + post-processing",
            preview: "Hello <world>",
            docx: b"PK",
        });
        assert!(html.contains("Conversion completed successfully!"));
        assert!(html.contains("Converted with pdf2docx (layout=True) + post-processing"));
        assert!(html.contains("<pre>Hello &lt;world&gt;</pre>"));
        assert!(html.contains(r#"download="report.docx""#));
        assert!(html.contains(&format!("data:{DOCX_MIME};base64,UEs=")));
        assert!(!html.contains("Upload a PDF to get started"));
    }

    #[test]
    fn empty_preview_shows_notice() {
        let html = render(&PageView::Converted {
            download_name: "blank.docx",
            status: "ok",
            preview: "",
            docx: b"",
        });
        assert!(html.contains("No text extracted from the DOCX."));
        assert!(!html.contains("<pre>"));
    }

    #[test]
    fn failure_is_escaped() {
        let html = render(&PageView::Failed {
            message: "engine said <boom>",
        });
        assert!(html.contains("engine said &lt;boom&gt;"));
    }
}
