//! Input resolution for the CLI: normalise a path or URL to local PDF bytes.
//!
//! The conversion pipeline itself takes bytes and never validates them; this
//! module is the command-line counterpart of the web shell's `.pdf` upload
//! filter. It refuses files that do not start with the `%PDF` magic so a
//! mistyped path fails fast instead of inside the engine.

use crate::error::Pdf2WordError;
use std::path::PathBuf;
use tracing::{debug, info};

/// A PDF ready for conversion.
#[derive(Debug)]
pub struct ResolvedInput {
    /// Name used to derive the output file name (`report.pdf`).
    pub name: String,
    /// Local path of the input, `None` for downloaded URLs.
    pub local_path: Option<PathBuf>,
    pub bytes: Vec<u8>,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to PDF bytes.
///
/// If the input is a URL, download it (bounded by `timeout_secs`).
/// If the input is a local file, validate it exists and is readable.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, Pdf2WordError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input).await
    }
}

async fn resolve_local(path_str: &str) -> Result<ResolvedInput, Pdf2WordError> {
    let path = PathBuf::from(path_str);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2WordError::PermissionDenied { path });
        }
        Err(_) => return Err(Pdf2WordError::FileNotFound { path }),
    };
    check_magic(&bytes, &path)?;

    debug!("Resolved local PDF: {} ({} bytes)", path.display(), bytes.len());
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ResolvedInput {
        name,
        local_path: Some(path),
        bytes,
    })
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, Pdf2WordError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Pdf2WordError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Pdf2WordError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Pdf2WordError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Pdf2WordError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let name = filename_from_url(url);
    let bytes = response
        .bytes()
        .await
        .map_err(|e| Pdf2WordError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .to_vec();

    check_magic(&bytes, &PathBuf::from(&name))?;
    info!("Downloaded {} bytes", bytes.len());

    Ok(ResolvedInput {
        name,
        local_path: None,
        bytes,
    })
}

fn check_magic(bytes: &[u8], path: &std::path::Path) -> Result<(), Pdf2WordError> {
    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(Pdf2WordError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}

/// Last path segment of the URL when it looks like a file name.
pub(crate) fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.pdf".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(filename_from_url("https://example.com/a/report.pdf"), "report.pdf");
        assert_eq!(filename_from_url("https://arxiv.org/pdf/1706"), "downloaded.pdf");
        assert_eq!(filename_from_url("not a url"), "downloaded.pdf");
    }

    #[tokio::test]
    async fn local_pdf_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, b"%PDF-1.7\n...").unwrap();

        let resolved = resolve_input(path.to_str().unwrap(), 5).await.unwrap();
        assert_eq!(resolved.name, "scan.pdf");
        assert_eq!(resolved.local_path.as_deref(), Some(path.as_path()));
        assert!(resolved.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = resolve_input("/definitely/not/a/real/file.pdf", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2WordError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn non_pdf_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"PK\x03\x04 zip").unwrap();

        let err = resolve_input(path.to_str().unwrap(), 5).await.unwrap_err();
        assert!(matches!(err, Pdf2WordError::NotAPdf { magic, .. } if &magic == b"PK\x03\x04"));
    }
}
