//! Bounded resampling for upload-sized photos.
//!
//! Provides resize operations using the `image` crate's algorithms.
//! All functions return new `DecodedImage` instances without modifying the
//! input. Downscaling is always uniform on both axes, so aspect ratio is
//! preserved; images already within bounds are never upscaled.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::EmptyImage` if either target dimension is zero and
/// `DecodeError::CorruptedFile` if the pixel buffer cannot be reinterpreted.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage);
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Shrink an image so both axes fit within the given bounds, preserving
/// aspect ratio. Images already within bounds are returned unchanged.
///
/// The scale factor is `min(max_width/w, max_height/h, 1.0)` and target
/// dimensions are floored, matching how the capture flow has always sized
/// photos for upload.
///
/// # Errors
///
/// Returns `DecodeError::EmptyImage` if either bound is zero and
/// `DecodeError::CorruptedFile` if the pixel buffer cannot be reinterpreted.
pub fn resize_to_bounds(
    image: &DecodedImage,
    max_width: u32,
    max_height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if max_width == 0 || max_height == 0 {
        return Err(DecodeError::EmptyImage);
    }

    let (src_width, src_height) = (image.width, image.height);

    // Never upscale: already fits, just clone
    if src_width <= max_width && src_height <= max_height {
        return Ok(image.clone());
    }

    let (new_width, new_height) = bounded_dimensions(src_width, src_height, max_width, max_height);

    resize(image, new_width, new_height, filter)
}

/// Calculate dimensions that fit within the bounds with a uniform scale.
///
/// Scale never exceeds 1.0; results are floored and clamped to at least 1
/// so extreme aspect ratios cannot collapse an axis to zero.
pub fn bounded_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let scale = (max_width as f64 / width as f64)
        .min(max_height as f64 / height as f64)
        .min(1.0);

    let new_width = ((width as f64 * scale).floor() as u32).max(1);
    let new_height = ((height as f64 * scale).floor() as u32).max(1);
    (new_width, new_height)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
