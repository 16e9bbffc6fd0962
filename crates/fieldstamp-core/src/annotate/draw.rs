//! Label compositing onto a decoded raster.
//!
//! Mirrors what the capture flow draws on its canvas: a semi-transparent
//! rounded-margin rectangle in one corner with the timestamp text on top.
//! Compositing happens in RGBA with alpha blending, then flattens back to
//! the RGB working representation. Dimensions are never changed.

use ab_glyph::{FontRef, PxScale};
use image::DynamicImage;
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size, Blend};
use imageproc::rect::Rect;
use thiserror::Error;

use super::style::{AnnotationStyle, Corner};
use crate::decode::DecodedImage;

// DejaVu Sans ships with the crate so field devices never depend on system
// fonts. License text sits next to the font file.
static FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Errors from label compositing.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// The embedded label font failed to parse.
    #[error("Label font could not be loaded: {0}")]
    FontUnavailable(String),

    /// The raster's pixel buffer doesn't match its dimensions.
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),
}

/// Pixel placement of the label, resolved before any drawing happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LabelLayout {
    bg_x: i32,
    bg_y: i32,
    bg_w: u32,
    bg_h: u32,
    text_x: i32,
    text_y: i32,
}

/// Composite `text` onto the image at the styled corner.
///
/// Returns a new raster with identical dimensions; the input is untouched.
///
/// # Errors
///
/// Returns `AnnotateError::FontUnavailable` if the embedded font cannot be
/// parsed and `AnnotateError::InvalidRaster` if the pixel buffer is
/// inconsistent with the declared dimensions.
pub fn draw_label(
    image: &DecodedImage,
    text: &str,
    style: &AnnotationStyle,
) -> Result<DecodedImage, AnnotateError> {
    let font = FontRef::try_from_slice(FONT_BYTES)
        .map_err(|e| AnnotateError::FontUnavailable(e.to_string()))?;

    let rgb = image
        .to_rgb_image()
        .ok_or_else(|| AnnotateError::InvalidRaster("pixel buffer size mismatch".to_string()))?;

    let font_px = style.font_size.resolve(image.width);
    let scale = PxScale::from(font_px);
    let (text_w, text_h) = text_size(scale, &font, text);

    let layout = resolve_layout(
        image.width,
        image.height,
        text_w,
        text_h,
        font_px,
        style.position,
    );

    // Blend wraps the canvas so fills and text alpha-composite instead of
    // overwriting pixels.
    let mut canvas = Blend(DynamicImage::ImageRgb8(rgb).into_rgba8());

    let bg_rect = Rect::at(layout.bg_x, layout.bg_y).of_size(layout.bg_w, layout.bg_h);
    draw_filled_rect_mut(&mut canvas, bg_rect, style.background.to_rgba());
    if let Some(border) = style.border {
        draw_hollow_rect_mut(&mut canvas, bg_rect, border.to_rgba());
    }
    draw_text_mut(
        &mut canvas,
        style.text.to_rgba(),
        layout.text_x,
        layout.text_y,
        scale,
        &font,
        text,
    );

    let flattened = DynamicImage::ImageRgba8(canvas.0).into_rgb8();
    Ok(DecodedImage::from_rgb_image(flattened))
}

/// Compute where the background rectangle and text land for the given
/// corner. The text margin from the image edge is `max(10, width * 0.02)`;
/// the rectangle pads the text by 80% of that margin on each side and the
/// text is vertically centered in a line box 1.5x the font size, so the
/// glyphs always sit fully inside the rectangle.
fn resolve_layout(
    img_w: u32,
    img_h: u32,
    text_w: u32,
    text_h: u32,
    font_px: f32,
    corner: Corner,
) -> LabelLayout {
    let margin = (img_w as f32 * 0.02).max(10.0);
    let bg_pad = margin * 0.8;
    let line_h = font_px * 1.5;

    let text_x = if corner.is_left() {
        margin
    } else {
        img_w as f32 - margin - text_w as f32
    };
    let line_top = if corner.is_top() {
        margin
    } else {
        img_h as f32 - margin - line_h
    };

    let bg_w = (text_w as f32 + bg_pad * 2.0).round().max(1.0) as u32;
    let bg_h = (line_h + bg_pad).round().max(1.0) as u32;
    let bg_x = (text_x - bg_pad).round() as i32;
    let bg_y = (line_top - bg_pad * 0.5).round() as i32;

    // Center the measured glyph box inside the line box
    let text_y = line_top + (line_h - text_h as f32) / 2.0;

    LabelLayout {
        bg_x,
        bg_y,
        bg_w,
        bg_h,
        text_x: text_x.round() as i32,
        text_y: text_y.round() as i32,
    }
}
