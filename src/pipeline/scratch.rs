//! Per-call scratch files: one `.pdf` input and one `.docx` output.
//!
//! Both paths come from [`tempfile`], so names are unique per call and two
//! concurrent conversions never collide. Both files are deleted when the
//! [`ScratchFiles`] value is dropped, which covers every exit path of the
//! pipeline including early `?` returns and panics. Deletion tolerates files
//! that are already gone (an engine may remove or never create its output)
//! and never surfaces an error to the caller.

use crate::error::Pdf2WordError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempPath};
use tracing::debug;

/// The pair of temp files owned by one pipeline call.
pub struct ScratchFiles {
    input: Option<TempPath>,
    output: Option<TempPath>,
}

impl ScratchFiles {
    /// Write `pdf_bytes` to a fresh `.pdf` temp file and reserve a fresh
    /// `.docx` temp path next to it.
    ///
    /// `dir` overrides the OS temp directory.
    pub fn create(pdf_bytes: &[u8], dir: Option<&Path>) -> Result<Self, Pdf2WordError> {
        let mut input = named_temp(".pdf", dir)?;
        input
            .write_all(pdf_bytes)
            .map_err(|source| Pdf2WordError::ScratchFile { source })?;
        input
            .flush()
            .map_err(|source| Pdf2WordError::ScratchFile { source })?;
        let input = input.into_temp_path();

        let output = named_temp(".docx", dir)?.into_temp_path();

        debug!(
            "Scratch files: {} -> {}",
            input.display(),
            output.display()
        );

        Ok(Self {
            input: Some(input),
            output: Some(output),
        })
    }

    pub fn input_path(&self) -> &Path {
        self.input.as_deref().unwrap_or_else(|| Path::new(""))
    }

    pub fn output_path(&self) -> &Path {
        self.output.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Owned copies of both paths, for logging after the files are gone.
    pub fn paths(&self) -> (PathBuf, PathBuf) {
        (
            self.input_path().to_path_buf(),
            self.output_path().to_path_buf(),
        )
    }
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        for temp in [self.input.take(), self.output.take()].into_iter().flatten() {
            let path = temp.to_path_buf();
            if let Err(e) = temp.close() {
                if e.kind() != std::io::ErrorKind::NotFound {
                    debug!("Could not remove scratch file {}: {}", path.display(), e);
                }
            }
        }
    }
}

fn named_temp(suffix: &str, dir: Option<&Path>) -> Result<tempfile::NamedTempFile, Pdf2WordError> {
    let mut b = Builder::new();
    b.prefix("pdf2word-").suffix(suffix);
    match dir {
        Some(d) => b.tempfile_in(d),
        None => b.tempfile(),
    }
    .map_err(|source| Pdf2WordError::ScratchFile { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_are_created_with_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchFiles::create(b"%PDF-1.4", Some(dir.path())).unwrap();
        let (input, output) = scratch.paths();

        assert!(input.to_string_lossy().ends_with(".pdf"));
        assert!(output.to_string_lossy().ends_with(".docx"));
        assert_eq!(std::fs::read(&input).unwrap(), b"%PDF-1.4");
        assert!(output.exists());
    }

    #[test]
    fn drop_removes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchFiles::create(b"data", Some(dir.path())).unwrap();
        let (input, output) = scratch.paths();
        drop(scratch);

        assert!(!input.exists());
        assert!(!output.exists());
    }

    #[test]
    fn drop_tolerates_already_removed_files() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchFiles::create(b"data", Some(dir.path())).unwrap();
        let (input, output) = scratch.paths();
        std::fs::remove_file(&input).unwrap();
        std::fs::remove_file(&output).unwrap();
        drop(scratch);

        assert!(!input.exists());
        assert!(!output.exists());
    }

    #[test]
    fn names_are_unique_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let a = ScratchFiles::create(b"a", Some(dir.path())).unwrap();
        let b = ScratchFiles::create(b"b", Some(dir.path())).unwrap();
        assert_ne!(a.input_path(), b.input_path());
        assert_ne!(a.output_path(), b.output_path());
    }

    #[test]
    fn missing_dir_is_a_scratch_error() {
        let err = ScratchFiles::create(b"a", Some(Path::new("/definitely/not/here"))).err();
        assert!(matches!(err, Some(Pdf2WordError::ScratchFile { .. })));
    }
}
