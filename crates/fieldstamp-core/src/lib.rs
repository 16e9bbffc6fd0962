//! Fieldstamp Core - Image operations for attendance photos
//!
//! This crate provides the synchronous image operations the Fieldstamp
//! pipeline is built from: upload validation, decoding with EXIF orientation
//! correction, bounded resampling, timestamp-label compositing, and JPEG
//! encoding. All operations are pure request/response: they never retain
//! their input and hold no shared state between calls.

pub mod annotate;
pub mod decode;
pub mod encode;
pub mod validate;

pub use annotate::{draw_label, AnnotateError, AnnotationStyle, Color, Corner, FontSizing};
pub use decode::{
    bounded_dimensions, decode_image, resize_to_bounds, DecodeError, DecodedImage, FilterType,
    Orientation,
};
pub use encode::{encode_jpeg, EncodeError, MEDIA_TYPE_JPEG};
pub use validate::{validate_upload, UploadLimits, ValidateError};

/// A raw image payload as handed over by the capture UI.
///
/// The bytes are whatever the camera or file picker produced; `media_type`
/// is the declared type (e.g. "image/jpeg"), not a sniffed one. Validation
/// trusts the declaration; decoding does not.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ImageBlob {
    /// Declared media type, e.g. "image/jpeg".
    pub media_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Byte length of the payload.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

/// A finished, transmittable image: encoded bytes plus their media type.
///
/// Produced by the resample and annotate operations; ownership transfers to
/// the caller, which may upload, store, or discard it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EncodedImage {
    /// Media type of `bytes`, e.g. "image/jpeg".
    pub media_type: String,
    /// Encoded file bytes.
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Byte length of the encoded payload.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

/// Pixel dimensions of an image. Both axes are always at least 1 for any
/// image that decoded successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check whether both axes fit within the given bounds.
    pub fn fits_within(&self, max_width: u32, max_height: u32) -> bool {
        self.width <= max_width && self.height <= max_height
    }

    /// Width-to-height ratio.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}
