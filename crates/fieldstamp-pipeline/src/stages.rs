//! The three pipeline stages as plain synchronous operations.
//!
//! `process` wraps these in blocking tasks with budgets; they are also
//! usable directly when the caller manages its own scheduling (batch
//! re-processing, tests). Each stage owns its buffers and touches no
//! shared state.

use log::debug;

use fieldstamp_core::{
    decode_image, draw_label, encode_jpeg, resize_to_bounds, validate_upload, AnnotationStyle,
    EncodedImage, ImageBlob, UploadLimits, MEDIA_TYPE_JPEG,
};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Stage};

/// Check byte length and media type against the limits. Runs before any
/// pixel work; the size check is reported first when both fail.
pub fn validate(blob: &ImageBlob, limits: &UploadLimits) -> Result<(), PipelineError> {
    validate_upload(blob, limits)?;
    Ok(())
}

/// Decode the upload, shrink it to the configured bounds (never upscaling),
/// and encode the result as JPEG at the configured quality.
pub fn resample(bytes: &[u8], config: &PipelineConfig) -> Result<EncodedImage, PipelineError> {
    let decoded = decode_image(bytes).map_err(|e| PipelineError::decode(Stage::Resample, e))?;
    debug!(
        "resample: decoded {}x{} ({} bytes in)",
        decoded.width,
        decoded.height,
        bytes.len()
    );

    let resized = resize_to_bounds(&decoded, config.max_width, config.max_height, config.filter)
        // A raster the resizer cannot produce output from is an encode-side
        // failure: the input decoded fine
        .map_err(|e| PipelineError::EncodeFailed {
            stage: Stage::Resample,
            reason: e.to_string(),
        })?;

    let jpeg = encode_jpeg(
        &resized.pixels,
        resized.width,
        resized.height,
        config.quality_u8(),
    )
    .map_err(|e| PipelineError::encode(Stage::Resample, e))?;

    debug!(
        "resample: encoded {}x{} ({} bytes out)",
        resized.width,
        resized.height,
        jpeg.len()
    );
    Ok(EncodedImage::new(MEDIA_TYPE_JPEG, jpeg))
}

/// Decode an already-encoded image, composite the label text at the styled
/// corner, and re-encode at the given quality. Dimensions are unchanged.
pub fn annotate(
    image: &EncodedImage,
    text: &str,
    style: &AnnotationStyle,
    quality: u8,
) -> Result<EncodedImage, PipelineError> {
    let decoded =
        decode_image(&image.bytes).map_err(|e| PipelineError::decode(Stage::Annotate, e))?;

    let labeled = draw_label(&decoded, text, style).map_err(PipelineError::annotate)?;

    let jpeg = encode_jpeg(&labeled.pixels, labeled.width, labeled.height, quality)
        .map_err(|e| PipelineError::encode(Stage::Annotate, e))?;

    debug!(
        "annotate: stamped {:?} onto {}x{} image",
        text, labeled.width, labeled.height
    );
    Ok(EncodedImage::new(MEDIA_TYPE_JPEG, jpeg))
}
