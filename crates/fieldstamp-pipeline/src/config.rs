//! Pipeline configuration.
//!
//! One immutable value carries everything a `process` call needs; there is
//! no ambient global. Defaults mirror the capture flow's long-standing
//! settings: 1920x1920 bounds, 0.8 JPEG quality, 5 MiB uploads, and a
//! bottom-left timestamp label.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use fieldstamp_core::{AnnotationStyle, FilterType, UploadLimits};

/// Full configuration for one `process` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum output width in pixels.
    pub max_width: u32,
    /// Maximum output height in pixels.
    pub max_height: u32,
    /// JPEG encoding quality in [0, 1].
    pub quality: f32,
    /// Byte-size and media-type limits checked before any decoding.
    pub limits: UploadLimits,
    /// Resampling filter for downscaling.
    pub filter: FilterType,
    /// Timestamp-label settings.
    pub annotation: AnnotationConfig,
    /// Per-stage wall-clock budgets.
    pub timeouts: StageTimeouts,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1920,
            quality: 0.8,
            limits: UploadLimits::default(),
            filter: FilterType::default(),
            annotation: AnnotationConfig::default(),
            timeouts: StageTimeouts::default(),
        }
    }
}

impl PipelineConfig {
    /// Encoder quality on the JPEG encoder's 1-100 scale.
    pub fn quality_u8(&self) -> u8 {
        ((self.quality.clamp(0.0, 1.0) * 100.0).round() as u8).max(1)
    }
}

/// What to do when resampling succeeded but annotation failed.
///
/// The capture flow historically varied between call sites on this; here it
/// is an explicit choice. The default fails the whole call so an
/// unannotated photo can never slip through unnoticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnnotateFallback {
    /// Propagate the annotation error; no output is returned.
    #[default]
    Fail,
    /// Return the unannotated resample output instead.
    KeepUnannotated,
}

/// Timestamp-label settings for one invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationConfig {
    /// Whether the annotate stage runs at all.
    pub enabled: bool,
    /// Label text, typically a formatted capture timestamp. Generated per
    /// call and discarded after compositing.
    pub text: String,
    /// Visual style of the label.
    pub style: AnnotationStyle,
    /// Policy when annotation fails after a successful resample.
    pub on_failure: AnnotateFallback,
}

impl AnnotationConfig {
    /// Enabled annotation with the default style and the given label text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            enabled: true,
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Wall-clock budgets per stage.
///
/// Annotation re-decodes an already-bounded image, so its budget is
/// shorter than resample's, matching the stage timers the capture flow
/// always ran with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimeouts {
    /// Budget for decode + resize + encode of the raw upload.
    pub resample: Duration,
    /// Budget for decode + composite + encode of the label.
    pub annotate: Duration,
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            resample: Duration::from_secs(15),
            annotate: Duration::from_secs(10),
        }
    }
}
