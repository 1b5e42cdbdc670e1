//! Fill and text style values.

use crate::gradient::CanvasGradient;

/// What `fill`, `fill_rect` and `fill_text` paint with. Defaults to opaque black.
#[derive(Debug, Clone)]
pub enum FillStyle {
    Color(tiny_skia::Color),
    LinearGradient(CanvasGradient),
}

impl Default for FillStyle {
    fn default() -> Self {
        FillStyle::Color(tiny_skia::Color::BLACK)
    }
}

/// Horizontal placement of text relative to its anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

/// Vertical placement of text relative to its anchor y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Anchor at the ascent line.
    Top,
    /// Anchor halfway between ascent and descent.
    Middle,
    #[default]
    Alphabetic,
    /// Anchor at the descent line.
    Bottom,
}
