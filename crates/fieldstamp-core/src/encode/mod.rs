//! Image encoding for upload.
//!
//! Attendance photos are always uploaded as JPEG, whatever format the
//! capture produced; quality is configurable per call.

mod jpeg;

pub use jpeg::{encode_jpeg, EncodeError, MEDIA_TYPE_JPEG};
