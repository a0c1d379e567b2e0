//! Validation pass: open the engine's DOCX and save it back, nothing more.
//!
//! Rewriting paragraphs, styles or numbering after the engine has run risks
//! undoing the layout it reconstructed, so this pass never touches content.
//! It proves the output is a readable WordprocessingML package and re-packs
//! the zip container entry by entry with a raw copy (no decompression, no
//! recompression), which normalises the container without changing a single
//! part.
//!
//! ## Failure policy
//!
//! | Step | Failure | Result |
//! |------|---------|--------|
//! | open | I/O error, not a zip, not a DOCX | [`PostProcessOutcome::SkippedOnOpen`] |
//! | save | I/O error while re-packing, writing or renaming | [`PostProcessOutcome::SkippedOnSave`] |
//! | save | zip structure error while re-packing | [`Pdf2WordError::PostProcess`] |
//!
//! Skipped outcomes leave the engine's file exactly as it was. The re-packed
//! bytes go to a sibling temp file that is renamed over the original only
//! once fully written, so a failed save never truncates the engine's output.

use crate::error::Pdf2WordError;
use crate::output::PostProcessOutcome;
use crate::pipeline::preview::parse_docx;
use std::fs::File;
use std::io::{self, Cursor, Write};
use std::path::Path;
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::{ZipArchive, ZipWriter};

/// Run the open-and-resave pass on the DOCX at `path`.
pub fn touch_docx(path: &Path) -> Result<PostProcessOutcome, Pdf2WordError> {
    touch_docx_with(path, replace_file)
}

/// [`touch_docx`] with the final write delegated to `save`.
///
/// `save` receives the target path and the re-packed bytes. An error from it
/// becomes [`PostProcessOutcome::SkippedOnSave`].
pub(crate) fn touch_docx_with<F>(
    path: &Path,
    save: F,
) -> Result<PostProcessOutcome, Pdf2WordError>
where
    F: FnOnce(&Path, &[u8]) -> io::Result<()>,
{
    let bytes = match open_docx(path) {
        Ok(bytes) => bytes,
        Err(reason) => {
            warn!("Skipping post-processing, cannot open {}: {}", path.display(), reason);
            return Ok(PostProcessOutcome::SkippedOnOpen(reason));
        }
    };

    let repacked = match repack(&bytes) {
        Ok(repacked) => repacked,
        Err(RepackError::Io(e)) => {
            warn!("Skipping post-processing, cannot save {}: {}", path.display(), e);
            return Ok(PostProcessOutcome::SkippedOnSave(e.to_string()));
        }
        Err(RepackError::Format(detail)) => {
            return Err(Pdf2WordError::PostProcess {
                path: path.to_path_buf(),
                detail,
            })
        }
    };

    if let Err(e) = save(path, &repacked) {
        warn!("Skipping post-processing, cannot save {}: {}", path.display(), e);
        return Ok(PostProcessOutcome::SkippedOnSave(e.to_string()));
    }

    debug!(
        "Re-saved {} ({} -> {} bytes)",
        path.display(),
        bytes.len(),
        repacked.len()
    );
    Ok(PostProcessOutcome::Resaved)
}

/// Replace the file at `path` with `bytes` through a sibling temp file.
pub(crate) fn replace_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    replace_file_with(path, |file| file.write_all(bytes))
}

/// Create a temp file next to `path`, fill it with `write`, then rename it
/// over `path`. On any error the temp file is removed and `path` is left as
/// it was.
pub(crate) fn replace_file_with<W>(path: &Path, write: W) -> io::Result<()>
where
    W: FnOnce(&mut File) -> io::Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".pdf2word-touch-")
        .suffix(".docx")
        .tempfile_in(dir)?;

    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn open_docx(path: &Path) -> Result<Vec<u8>, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    parse_docx(&bytes)?;
    Ok(bytes)
}

enum RepackError {
    Io(std::io::Error),
    Format(String),
}

impl From<ZipError> for RepackError {
    fn from(e: ZipError) -> Self {
        match e {
            ZipError::Io(io) => RepackError::Io(io),
            other => RepackError::Format(other.to_string()),
        }
    }
}

/// Copy every entry of the zip container, compressed bytes untouched.
fn repack(bytes: &[u8]) -> Result<Vec<u8>, RepackError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(bytes.len())));

    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        writer.raw_copy_file(entry)?;
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::preview::docx_text_preview;
    use docx_rs::{Docx, Paragraph, Run};

    fn sample_docx() -> Vec<u8> {
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Quarterly report")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Revenue grew")));
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn valid_docx_is_resaved_without_content_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        let original = sample_docx();
        std::fs::write(&path, &original).unwrap();

        let outcome = touch_docx(&path).unwrap();
        assert_eq!(outcome, PostProcessOutcome::Resaved);

        let after = std::fs::read(&path).unwrap();
        assert_eq!(entry_names(&after), entry_names(&original));
        assert_eq!(
            docx_text_preview(&after, 20).unwrap(),
            "Quarterly report\nRevenue grew"
        );
    }

    #[test]
    fn resave_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        std::fs::write(&path, sample_docx()).unwrap();

        assert_eq!(touch_docx(&path).unwrap(), PostProcessOutcome::Resaved);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn partial_write_keeps_the_original_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        let original = sample_docx();
        std::fs::write(&path, &original).unwrap();

        // Half the bytes land, then the file-size limit hits.
        let outcome = touch_docx_with(&path, |target, bytes| {
            replace_file_with(target, |file| {
                file.write_all(&bytes[..bytes.len() / 2])?;
                Err(io::Error::other("File too large"))
            })
        })
        .unwrap();

        assert_eq!(
            outcome,
            PostProcessOutcome::SkippedOnSave("File too large".to_string())
        );
        let after = std::fs::read(&path).unwrap();
        assert_eq!(after, original);
        assert_eq!(
            docx_text_preview(&after, 20).unwrap(),
            "Quarterly report\nRevenue grew"
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_rename_keeps_the_original_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        let original = sample_docx();
        std::fs::write(&path, &original).unwrap();

        // A directory in the way makes the rename fail after a full write.
        let blocked = dir.path().join("blocked.docx");
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), b"x").unwrap();

        let outcome = touch_docx_with(&path, |_, bytes| replace_file(&blocked, bytes)).unwrap();

        assert!(matches!(outcome, PostProcessOutcome::SkippedOnSave(_)));
        assert_eq!(std::fs::read(&path).unwrap(), original);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn garbage_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        std::fs::write(&path, b"not a docx at all").unwrap();

        let outcome = touch_docx(&path).unwrap();
        assert!(matches!(outcome, PostProcessOutcome::SkippedOnOpen(_)));
        assert_eq!(std::fs::read(&path).unwrap(), b"not a docx at all");
    }

    #[test]
    fn missing_file_is_skipped_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = touch_docx(&dir.path().join("missing.docx")).unwrap();
        assert!(matches!(outcome, PostProcessOutcome::SkippedOnOpen(_)));
    }

    #[test]
    fn zip_io_errors_count_as_save_failures() {
        let io = std::io::Error::other("disk full");
        assert!(matches!(RepackError::from(ZipError::Io(io)), RepackError::Io(_)));
        assert!(matches!(
            RepackError::from(ZipError::InvalidArchive("bad central directory".into())),
            RepackError::Format(_)
        ));
    }

    #[test]
    fn repack_roundtrips_entries() {
        let original = sample_docx();
        let repacked = match repack(&original) {
            Ok(b) => b,
            Err(_) => panic!("repack failed"),
        };
        assert_eq!(entry_names(&repacked), entry_names(&original));
    }
}
