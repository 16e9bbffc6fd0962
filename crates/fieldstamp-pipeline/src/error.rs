//! Pipeline error taxonomy.
//!
//! Five kinds cover every way a photo can fail, each carrying the stage it
//! failed in and the underlying cause where one exists. The UI maps each
//! kind to a specific user-facing message ("image too large", "unsupported
//! format", "timed out processing photo") and lets the worker retry the
//! capture from scratch; the pipeline itself never retries.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use fieldstamp_core::{AnnotateError, DecodeError, EncodeError, ValidateError};

/// The pipeline stage an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Resample,
    Annotate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Validate => write!(f, "validate"),
            Stage::Resample => write!(f, "resample"),
            Stage::Annotate => write!(f, "annotate"),
        }
    }
}

/// Errors a `process` call can resolve with.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The upload exceeds the configured byte limit.
    #[error("Image is {actual} bytes, exceeding the {max} byte limit")]
    TooLarge { actual: usize, max: usize },

    /// The declared media type is not in the allowed set.
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),

    /// Bytes could not be interpreted as an image.
    #[error("{stage} stage failed to decode image: {reason}")]
    DecodeFailed { stage: Stage, reason: String },

    /// A raster could not be serialized to the output format.
    #[error("{stage} stage failed to encode image: {reason}")]
    EncodeFailed { stage: Stage, reason: String },

    /// A stage exceeded its wall-clock budget.
    #[error("{stage} stage exceeded its {}ms budget", .budget.as_millis())]
    Timeout { stage: Stage, budget: Duration },
}

impl PipelineError {
    pub(crate) fn decode(stage: Stage, err: DecodeError) -> Self {
        PipelineError::DecodeFailed {
            stage,
            reason: err.to_string(),
        }
    }

    pub(crate) fn encode(stage: Stage, err: EncodeError) -> Self {
        PipelineError::EncodeFailed {
            stage,
            reason: err.to_string(),
        }
    }

    pub(crate) fn annotate(err: AnnotateError) -> Self {
        match err {
            // A raster inconsistent with its dimensions is a decode-side
            // failure; a missing font means no output can be produced.
            AnnotateError::InvalidRaster(reason) => PipelineError::DecodeFailed {
                stage: Stage::Annotate,
                reason,
            },
            AnnotateError::FontUnavailable(reason) => PipelineError::EncodeFailed {
                stage: Stage::Annotate,
                reason,
            },
        }
    }

    pub(crate) fn timeout(stage: Stage, budget: Duration) -> Self {
        PipelineError::Timeout { stage, budget }
    }

    /// The stage this error occurred in, if it is stage-specific.
    /// Validation errors always belong to the validate stage.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::TooLarge { .. } | PipelineError::UnsupportedType(_) => Stage::Validate,
            PipelineError::DecodeFailed { stage, .. }
            | PipelineError::EncodeFailed { stage, .. }
            | PipelineError::Timeout { stage, .. } => *stage,
        }
    }
}

impl From<ValidateError> for PipelineError {
    fn from(err: ValidateError) -> Self {
        match err {
            ValidateError::TooLarge { actual, max } => PipelineError::TooLarge { actual, max },
            ValidateError::UnsupportedType(t) => PipelineError::UnsupportedType(t),
        }
    }
}
