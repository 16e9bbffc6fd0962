//! Timestamp-label annotation.
//!
//! This module composites a short text label (typically a formatted capture
//! timestamp) onto a decoded photo: a semi-transparent background rectangle
//! anchored at a configurable corner, an optional 1px border, and the text
//! on top. The raster's dimensions never change.
//!
//! Text rendering uses an embedded DejaVu Sans face via `ab_glyph`, drawn
//! through `imageproc`'s blending canvas.

mod draw;
mod style;

pub use draw::{draw_label, AnnotateError};
pub use style::{AnnotationStyle, Color, Corner, FontSizing};
