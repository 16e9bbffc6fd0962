//! Fieldstamp Pipeline - Timeout-guarded photo processing
//!
//! This crate orchestrates the Fieldstamp image operations into the single
//! entry point the capture UI calls per photo:
//!
//! validate -> resample -> annotate (optional)
//!
//! Each stage's CPU-bound work runs on a blocking task racing a wall-clock
//! budget, so the caller's task stays responsive and a stuck decode can
//! never hang a submission. Every invocation is independent: configuration
//! is an immutable value passed per call, and no state is shared between
//! concurrent photos.

pub mod config;
pub mod error;
pub mod process;
pub mod stages;

pub use config::{AnnotateFallback, AnnotationConfig, PipelineConfig, StageTimeouts};
pub use error::{PipelineError, Stage};
pub use process::process;

// The blob and output types cross the crate boundary constantly; re-export
// them so callers don't need a direct fieldstamp-core dependency.
pub use fieldstamp_core::{EncodedImage, ImageBlob};
