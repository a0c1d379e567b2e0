//! Request handlers for the web shell.

use super::error::ShellError;
use super::page::{self, PageView};
use super::AppState;
use crate::convert::convert_pdf_bytes_async;
use crate::output::{docx_file_name, ConversionOutput, DOCX_MIME};
use crate::pipeline::preview::docx_text_preview;
use axum::{
    extract::{Multipart, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

/// Response header carrying the conversion status line.
pub const STATUS_HEADER: &str = "x-conversion-status";

static RE_HEADER_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"["\\\p{Cc}]"#).unwrap());

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "pdf2word",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /
pub async fn index() -> Html<String> {
    Html(page::render(&PageView::Empty))
}

/// POST /convert
///
/// Form upload from the index page. Always answers with a full HTML page.
pub async fn convert_form(State(state): State<AppState>, multipart: Multipart) -> Response {
    let result = async {
        let upload = read_upload(multipart).await?;
        let download_name = docx_file_name(&upload.file_name);
        let output = run_conversion(&state, upload).await?;
        let preview = docx_text_preview(&output.docx, state.config.preview_paragraphs)?;
        Ok::<_, ShellError>((download_name, output, preview))
    }
    .await;

    match result {
        Ok((download_name, output, preview)) => Html(page::render(&PageView::Converted {
            download_name: &download_name,
            status: &output.status,
            preview: &preview,
            docx: &output.docx,
        }))
        .into_response(),
        Err(e) => {
            warn!("Form conversion failed: {}", e);
            let message = e.to_string();
            (e.status(), Html(page::render(&PageView::Failed { message: &message })))
                .into_response()
        }
    }
}

/// POST /api/convert
///
/// Same upload as the form route; answers with the DOCX itself.
pub async fn convert_api(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ShellError> {
    let upload = read_upload(multipart).await?;
    let download_name = docx_file_name(&upload.file_name);
    let output = run_conversion(&state, upload).await?;

    let disposition = content_disposition(&download_name);
    let mut response = (StatusCode::OK, output.docx).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(DOCX_MIME));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&output.status) {
        headers.insert(HeaderName::from_static(STATUS_HEADER), value);
    }
    Ok(response)
}

/// `attachment` disposition with an ASCII `filename` for old clients and the
/// exact UTF-8 name as RFC 5987 `filename*`.
fn content_disposition(file_name: &str) -> String {
    let cleaned = RE_HEADER_UNSAFE.replace_all(file_name, "");
    let fallback: String = cleaned
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(&cleaned)
    )
}

/// An uploaded PDF.
struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

/// Pull the `file` field out of a multipart body.
///
/// Only the file name is checked here: a name without a `.pdf` extension is
/// refused. The bytes themselves go to the engine unvalidated.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ShellError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if !has_pdf_extension(&file_name) {
            return Err(ShellError::UnsupportedFile(file_name));
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Upload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(ShellError::InvalidRequest(
        "missing multipart field `file`".to_string(),
    ))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ShellError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ShellError::PayloadTooLarge
    } else {
        ShellError::InvalidRequest(e.body_text())
    }
}

fn has_pdf_extension(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

async fn run_conversion(state: &AppState, upload: Upload) -> Result<ConversionOutput, ShellError> {
    info!(
        "Converting upload '{}' ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );
    Ok(convert_pdf_bytes_async(upload.bytes, &state.config).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert!(has_pdf_extension("report.pdf"));
        assert!(has_pdf_extension("REPORT.PDF"));
        assert!(has_pdf_extension("archive.v2.Pdf"));
        assert!(!has_pdf_extension("report.docx"));
        assert!(!has_pdf_extension("pdf"));
        assert!(!has_pdf_extension(""));
    }

    #[test]
    fn header_unsafe_characters_are_stripped() {
        let cleaned = RE_HEADER_UNSAFE.replace_all("we\"ird\r\nname.docx", "");
        assert_eq!(cleaned, "weirdname.docx");
    }

    #[test]
    fn disposition_carries_ascii_and_utf8_names() {
        assert_eq!(
            content_disposition("report.docx"),
            "attachment; filename=\"report.docx\"; filename*=UTF-8''report.docx"
        );
        assert_eq!(
            content_disposition("résumé.docx"),
            "attachment; filename=\"r_sum_.docx\"; filename*=UTF-8''r%C3%A9sum%C3%A9.docx"
        );
        assert_eq!(
            content_disposition("Q3 \"final\".docx"),
            "attachment; filename=\"Q3 final.docx\"; filename*=UTF-8''Q3%20final.docx"
        );
    }

    #[tokio::test]
    async fn health_reports_service() {
        let Json(response) = health().await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "pdf2word");
    }
}
