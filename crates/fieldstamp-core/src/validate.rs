//! Upload validation.
//!
//! Runs before any decoding so oversized or disallowed uploads are rejected
//! without spending any pixel work on them. The size check always comes
//! first: when a blob is both too large and of a disallowed type, the
//! caller deterministically sees the size failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ImageBlob;

/// Limits an upload must satisfy before it is decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadLimits {
    /// Maximum accepted byte length.
    pub max_bytes: usize,
    /// Accepted declared media types, e.g. "image/jpeg".
    pub allowed_media_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024, // 5 MiB
            allowed_media_types: vec![
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

impl UploadLimits {
    /// Check whether a declared media type is accepted. Comparison is
    /// case-insensitive since browsers are inconsistent about casing.
    pub fn allows(&self, media_type: &str) -> bool {
        self.allowed_media_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(media_type))
    }
}

/// Errors from upload validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The upload exceeds the configured byte limit.
    #[error("Image is {actual} bytes, exceeding the {max} byte limit")]
    TooLarge { actual: usize, max: usize },

    /// The declared media type is not in the allowed set.
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),
}

/// Validate an upload against the configured limits.
///
/// # Errors
///
/// Returns `ValidateError::TooLarge` if the byte length exceeds
/// `limits.max_bytes` (checked first), then `ValidateError::UnsupportedType`
/// if the declared media type is not allowed. No side effects on success.
pub fn validate_upload(blob: &ImageBlob, limits: &UploadLimits) -> Result<(), ValidateError> {
    if blob.byte_len() > limits.max_bytes {
        return Err(ValidateError::TooLarge {
            actual: blob.byte_len(),
            max: limits.max_bytes,
        });
    }

    if !limits.allows(&blob.media_type) {
        return Err(ValidateError::UnsupportedType(blob.media_type.clone()));
    }

    Ok(())
}
