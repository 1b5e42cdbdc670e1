//! Canvas rendering context.

mod drawing;
mod image_ops;
mod path_ops;
mod text_rendering;

use crate::drawing_state::DrawingState;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::font_config::{FontConfig, ResolvedFontConfig};
use crate::gradient::CanvasGradient;
use crate::style::FillStyle;
use cosmic_text::{FontSystem, SwashCache};
use tiny_skia::Pixmap;

/// Maximum canvas dimension (same as Chrome).
const MAX_DIMENSION: u32 = 32767;

/// A 2D drawing surface with Canvas-2D-like state and operations.
pub struct Canvas2dContext {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Premultiplied RGBA pixel buffer.
    pub(crate) pixmap: Pixmap,
    pub(crate) font_system: FontSystem,
    pub(crate) swash_cache: SwashCache,
    pub(crate) hinting_enabled: bool,
    pub(crate) state: DrawingState,
    state_stack: Vec<DrawingState>,
    /// Path under construction (user space == device space, no transforms).
    pub(crate) path_builder: tiny_skia::PathBuilder,
}

impl std::fmt::Debug for Canvas2dContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas2dContext")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Canvas2dContext {
    /// Create a canvas using `FontConfig::default()` (system fonts).
    pub fn new(width: u32, height: u32) -> Canvas2dResult<Self> {
        Self::with_resolved(width, height, &FontConfig::default().resolve())
    }

    /// Create a canvas sharing an already resolved font database.
    pub fn with_resolved(
        width: u32,
        height: u32,
        resolved: &ResolvedFontConfig,
    ) -> Canvas2dResult<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Canvas2dError::InvalidDimensions { width, height });
        }
        let pixmap =
            Pixmap::new(width, height).ok_or(Canvas2dError::InvalidDimensions { width, height })?;
        let font_system =
            FontSystem::new_with_locale_and_db("en".to_string(), resolved.fontdb.clone());

        Ok(Self {
            width,
            height,
            pixmap,
            font_system,
            swash_cache: SwashCache::new(),
            hinting_enabled: resolved.hinting_enabled,
            state: DrawingState::default(),
            state_stack: Vec::new(),
            path_builder: tiny_skia::PathBuilder::new(),
        })
    }

    /// Get canvas width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get canvas height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current drawing state.
    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    /// Save the current drawing state.
    pub fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.state_stack.push(self.state.clone());
    }

    /// Restore the most recently saved drawing state.
    pub fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    // --- Style setters ---

    /// Set the fill style from a CSS color string.
    pub fn set_fill_style(&mut self, style: &str) -> Canvas2dResult<()> {
        self.state.fill_style = FillStyle::Color(parse_color(style)?);
        Ok(())
    }

    /// Set the fill style to a gradient.
    pub fn set_fill_style_gradient(&mut self, gradient: CanvasGradient) {
        self.state.fill_style = FillStyle::LinearGradient(gradient);
    }

    /// Create a linear gradient.
    pub fn create_linear_gradient(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> CanvasGradient {
        CanvasGradient::new_linear(x0, y0, x1, y1)
    }

    /// Set the global alpha. Non-finite values or values outside [0, 1] are ignored.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    /// Set whether scaled images are smoothed.
    pub fn set_image_smoothing_enabled(&mut self, enabled: bool) {
        self.state.image_smoothing_enabled = enabled;
    }

    // --- Shadows ---

    /// Set the shadow color from a CSS color string (`"transparent"` disables it).
    pub fn set_shadow_color(&mut self, color: &str) -> Canvas2dResult<()> {
        self.state.shadow.color = parse_color(color)?;
        Ok(())
    }

    /// Set the shadow blur. Negative or non-finite values are ignored.
    pub fn set_shadow_blur(&mut self, blur: f32) {
        if blur.is_finite() && blur >= 0.0 {
            self.state.shadow.blur = blur;
        }
    }

    /// Set the horizontal shadow offset. Non-finite values are ignored.
    pub fn set_shadow_offset_x(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.shadow.offset_x = offset;
        }
    }

    /// Set the vertical shadow offset. Non-finite values are ignored.
    pub fn set_shadow_offset_y(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.shadow.offset_y = offset;
        }
    }
}

/// Parse a CSS color string into a tiny_skia::Color.
pub(crate) fn parse_color(s: &str) -> Canvas2dResult<tiny_skia::Color> {
    let parsed = csscolorparser::parse(s)
        .map_err(|e| Canvas2dError::ColorParseError(format!("{}: {}", s, e)))?;

    let [r, g, b, a] = parsed.to_array();
    tiny_skia::Color::from_rgba(r, g, b, a)
        .ok_or_else(|| Canvas2dError::ColorParseError(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RectParams;

    fn isolated(width: u32, height: u32) -> Canvas2dContext {
        Canvas2dContext::with_resolved(width, height, &FontConfig::isolated().resolve()).unwrap()
    }

    #[test]
    fn test_new_context_defaults() {
        let ctx = isolated(200, 150);
        assert_eq!(ctx.width(), 200);
        assert_eq!(ctx.height(), 150);
        assert_eq!(ctx.state.global_alpha, 1.0);
        assert!(!ctx.state.shadow.is_visible());
        assert!(ctx.pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_invalid_dimensions() {
        let resolved = FontConfig::isolated().resolve();
        assert!(matches!(
            Canvas2dContext::with_resolved(0, 100, &resolved),
            Err(Canvas2dError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Canvas2dContext::with_resolved(100, MAX_DIMENSION + 1, &resolved),
            Err(Canvas2dError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_bad_color_rejected() {
        let mut ctx = isolated(10, 10);
        assert!(matches!(
            ctx.set_fill_style("not-a-color"),
            Err(Canvas2dError::ColorParseError(_))
        ));
    }

    #[test]
    fn test_shadow_setters_ignore_invalid() {
        let mut ctx = isolated(10, 10);
        ctx.set_shadow_blur(16.0);
        ctx.set_shadow_blur(-1.0);
        ctx.set_shadow_blur(f32::NAN);
        assert_eq!(ctx.state.shadow.blur, 16.0);

        ctx.set_shadow_offset_y(8.0);
        ctx.set_shadow_offset_y(f32::INFINITY);
        assert_eq!(ctx.state.shadow.offset_y, 8.0);

        ctx.set_shadow_offset_x(-3.0);
        ctx.set_shadow_offset_x(f32::NAN);
        assert_eq!(ctx.state.shadow.offset_x, -3.0);
    }

    #[test]
    fn test_save_restore_shadow_and_fill() {
        let mut ctx = isolated(20, 20);
        ctx.set_fill_style("#ff0000").unwrap();
        ctx.save();
        ctx.set_fill_style("#00ff00").unwrap();
        ctx.set_shadow_color("rgba(0,0,0,0.5)").unwrap();
        ctx.set_shadow_blur(4.0);
        ctx.restore();

        assert!(!ctx.state.shadow.is_visible());
        ctx.fill_rect(&RectParams {
            x: 0.0,
            y: 0.0,
            width: 20.0,
            height: 20.0,
        });
        let data = ctx.get_image_data(0, 0, 20, 20);
        assert_eq!(&data[0..4], &[255, 0, 0, 255]);
    }
}
