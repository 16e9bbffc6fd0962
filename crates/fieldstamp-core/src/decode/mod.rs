//! Image decoding for attendance photos.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, and WebP uploads (format sniffed from the bytes)
//! - EXIF orientation correction for camera photos
//! - Bounded resizing so uploads never exceed the configured dimensions
//!
//! # Architecture
//!
//! Decoding is synchronous and single-threaded; the pipeline crate wraps
//! these calls in blocking tasks with wall-clock budgets. Nothing here
//! touches the filesystem or network: bytes in, rasters out.

mod loader;
mod resize;
mod types;

pub use loader::{decode_image, get_orientation};
pub use resize::{bounded_dimensions, resize, resize_to_bounds};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
