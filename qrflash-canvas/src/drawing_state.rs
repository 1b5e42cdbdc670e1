//! The part of the context that `save` pushes and `restore` pops.

use crate::font_parser::ParsedFont;
use crate::shadow::Shadow;
use crate::style::{FillStyle, TextAlign, TextBaseline};

/// Style attributes in effect for the next draw call.
///
/// Paths and pixels are not part of it, matching Canvas 2D.
#[derive(Debug, Clone)]
pub struct DrawingState {
    pub fill_style: FillStyle,
    pub font: ParsedFont,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
    /// Multiplied into every fill, 0.0 to 1.0.
    pub global_alpha: f32,
    pub shadow: Shadow,
    /// Bilinear when set, nearest-neighbour otherwise.
    pub image_smoothing_enabled: bool,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill_style: FillStyle::default(),
            font: ParsedFont::default(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            global_alpha: 1.0,
            shadow: Shadow::default(),
            image_smoothing_enabled: true,
        }
    }
}
