//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to be told
//! which stage a conversion is in. The pipeline is a single blocking call, so
//! there is nothing finer-grained than stages to report: the engine itself is
//! a black box that gives no page-level feedback.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2word::{ConversionConfig, ConversionProgressCallback, Stage};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl ConversionProgressCallback for Printer {
//!     fn on_stage(&self, stage: Stage) {
//!         eprintln!("{}", stage.describe());
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(Printer) as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Pipeline stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Persisting the uploaded PDF to its scratch file.
    WritingInput,
    /// Waiting on the conversion engine.
    Converting,
    /// Running the open-and-resave validation pass.
    PostProcessing,
    /// Reading the finished DOCX back into memory.
    ReadingOutput,
}

impl Stage {
    /// Short human-readable label, suitable for a spinner message.
    pub fn describe(&self) -> &'static str {
        match self {
            Stage::WritingInput => "Preparing PDF…",
            Stage::Converting => "Converting your PDF to DOCX…",
            Stage::PostProcessing => "Validating DOCX…",
            Stage::ReadingOutput => "Reading DOCX…",
        }
    }
}

/// Called by the conversion pipeline as it moves between stages.
///
/// Implementations must be `Send + Sync`: the web shell runs conversions on
/// tokio's blocking pool and one config (with its callback) may be shared by
/// concurrent requests. All methods default to no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called when the pipeline enters `stage`.
    fn on_stage(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called once after a successful conversion.
    ///
    /// # Arguments
    /// * `docx_len`: byte length of the produced document
    fn on_conversion_complete(&self, docx_len: usize) {
        let _ = docx_len;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        stages: Mutex<Vec<Stage>>,
        completed: Mutex<Option<usize>>,
    }

    impl ConversionProgressCallback for Recorder {
        fn on_stage(&self, stage: Stage) {
            self.stages.lock().unwrap().push(stage);
        }

        fn on_conversion_complete(&self, docx_len: usize) {
            *self.completed.lock().unwrap() = Some(docx_len);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_stage(Stage::Converting);
        cb.on_conversion_complete(42);
    }

    #[test]
    fn recorder_receives_events() {
        let rec = Recorder::default();
        rec.on_stage(Stage::WritingInput);
        rec.on_stage(Stage::Converting);
        rec.on_conversion_complete(7);
        assert_eq!(
            *rec.stages.lock().unwrap(),
            vec![Stage::WritingInput, Stage::Converting]
        );
        assert_eq!(*rec.completed.lock().unwrap(), Some(7));
    }

    #[test]
    fn every_stage_has_a_label() {
        for stage in [
            Stage::WritingInput,
            Stage::Converting,
            Stage::PostProcessing,
            Stage::ReadingOutput,
        ] {
            assert!(!stage.describe().is_empty());
        }
    }
}
