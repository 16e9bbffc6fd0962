//! Label styling for timestamp annotation.

use serde::{Deserialize, Serialize};

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to the image crate's pixel type.
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Which corner of the image the label is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    #[default]
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl Corner {
    /// True for the two left-anchored corners.
    pub fn is_left(self) -> bool {
        matches!(self, Corner::BottomLeft | Corner::TopLeft)
    }

    /// True for the two top-anchored corners.
    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// Font sizing policy for the label.
///
/// `Auto` scales with image width so the label stays legible on thumbnails
/// and unobtrusive on full-size photos.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FontSizing {
    #[default]
    Auto,
    Px(f32),
}

impl FontSizing {
    /// Resolve to a pixel size for an image of the given width.
    ///
    /// Auto sizing is `width * 0.03` clamped to [12, 20], the sizing the
    /// capture flow has always used for its timestamp stamp.
    pub fn resolve(self, image_width: u32) -> f32 {
        match self {
            FontSizing::Auto => (image_width as f32 * 0.03).clamp(12.0, 20.0),
            FontSizing::Px(px) => px.max(1.0),
        }
    }
}

/// Visual style of the composited label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    /// Corner the label is anchored to.
    pub position: Corner,
    /// Background fill behind the text (semi-transparent).
    pub background: Color,
    /// Text color.
    pub text: Color,
    /// Optional 1px border around the background rectangle.
    pub border: Option<Color>,
    /// Font sizing policy.
    pub font_size: FontSizing,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            position: Corner::BottomLeft,
            background: Color::new(0, 0, 0, 217),     // rgba(0,0,0,0.85)
            text: Color::new(255, 255, 255, 255),     // #ffffff
            border: Some(Color::new(255, 255, 255, 204)), // rgba(255,255,255,0.8)
            font_size: FontSizing::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_sizing_auto_clamps_low() {
        // 100px wide image: 100 * 0.03 = 3, clamped up to 12
        assert_eq!(FontSizing::Auto.resolve(100), 12.0);
    }

    #[test]
    fn test_font_sizing_auto_clamps_high() {
        // 1920px wide image: 1920 * 0.03 = 57.6, clamped down to 20
        assert_eq!(FontSizing::Auto.resolve(1920), 20.0);
    }

    #[test]
    fn test_font_sizing_auto_in_range() {
        // 500px wide image: 500 * 0.03 = 15
        assert_eq!(FontSizing::Auto.resolve(500), 15.0);
    }

    #[test]
    fn test_font_sizing_fixed() {
        assert_eq!(FontSizing::Px(14.0).resolve(4000), 14.0);
        // Degenerate fixed sizes are floored at 1px
        assert_eq!(FontSizing::Px(0.0).resolve(4000), 1.0);
    }

    #[test]
    fn test_corner_predicates() {
        assert!(Corner::BottomLeft.is_left());
        assert!(!Corner::BottomLeft.is_top());
        assert!(Corner::TopRight.is_top());
        assert!(!Corner::TopRight.is_left());
        assert!(Corner::TopLeft.is_left());
        assert!(Corner::TopLeft.is_top());
        assert!(!Corner::BottomRight.is_left());
        assert!(!Corner::BottomRight.is_top());
    }

    #[test]
    fn test_default_style_matches_capture_flow() {
        let style = AnnotationStyle::default();
        assert_eq!(style.position, Corner::BottomLeft);
        assert_eq!(style.background, Color::new(0, 0, 0, 217));
        assert_eq!(style.text, Color::new(255, 255, 255, 255));
        assert!(style.border.is_some());
        assert_eq!(style.font_size, FontSizing::Auto);
    }

    #[test]
    fn test_color_to_rgba() {
        let c = Color::new(1, 2, 3, 4);
        assert_eq!(c.to_rgba().0, [1, 2, 3, 4]);
    }
}
