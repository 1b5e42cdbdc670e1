//! Text rendering operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::error::Canvas2dResult;
use crate::font_parser::parse_font;
use crate::style::{TextAlign, TextBaseline};
use crate::text::{buffer_metrics, shape_line, text_x_offset, text_y_offset, TextMetrics};
use cosmic_text::Command;
use tiny_skia::Transform;

impl Canvas2dContext {
    /// Set the font from a CSS font string.
    pub fn set_font(&mut self, font: &str) -> Canvas2dResult<()> {
        self.state.font = parse_font(font)?;
        Ok(())
    }

    /// Set the text alignment.
    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    /// Set the text baseline.
    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
    }

    /// Measure text with the current font.
    pub fn measure_text(&mut self, text: &str) -> TextMetrics {
        let buffer = shape_line(
            &mut self.font_system,
            text,
            &self.state.font,
            self.hinting_enabled,
        );
        buffer_metrics(&buffer, &self.state.font)
    }

    /// Fill text at the specified anchor.
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "canvas", "fillText \"{}\" {} {}", text, x, y);
        let font = self.state.font.clone();
        let buffer = shape_line(&mut self.font_system, text, &font, self.hinting_enabled);
        let metrics = buffer_metrics(&buffer, &font);

        let base_x = x + text_x_offset(metrics.width, self.state.text_align);
        let base_y = y + text_y_offset(metrics.ascent, metrics.descent, self.state.text_baseline);

        self.with_shadow(|ctx| {
            ctx.with_fill_paint(|ctx, paint| {
                for run in buffer.layout_runs() {
                    for glyph in run.glyphs.iter() {
                        let physical_glyph = glyph.physical((base_x, base_y), 1.0);

                        // Floating-point glyph position for sub-pixel precision
                        let glyph_x = base_x + glyph.x + glyph.font_size * glyph.x_offset;
                        let glyph_y = base_y + glyph.y - glyph.font_size * glyph.y_offset;

                        let Some(commands) = ctx
                            .swash_cache
                            .get_outline_commands(&mut ctx.font_system, physical_glyph.cache_key)
                        else {
                            continue;
                        };

                        // Font outlines are Y-up, the canvas is Y-down
                        let mut path_builder = tiny_skia::PathBuilder::new();
                        for cmd in commands {
                            match cmd {
                                Command::MoveTo(p) => path_builder.move_to(p.x, -p.y),
                                Command::LineTo(p) => path_builder.line_to(p.x, -p.y),
                                Command::QuadTo(ctrl, end) => {
                                    path_builder.quad_to(ctrl.x, -ctrl.y, end.x, -end.y)
                                }
                                Command::CurveTo(c1, c2, end) => {
                                    path_builder.cubic_to(c1.x, -c1.y, c2.x, -c2.y, end.x, -end.y)
                                }
                                Command::Close => path_builder.close(),
                            }
                        }

                        if let Some(path) = path_builder.finish() {
                            ctx.pixmap.fill_path(
                                &path,
                                paint,
                                tiny_skia::FillRule::Winding,
                                Transform::from_translate(glyph_x, glyph_y),
                                None,
                            );
                        }
                    }
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::font_config::FontConfig;
    use crate::Canvas2dContext;

    #[test]
    fn test_set_font_updates_state() {
        let mut ctx =
            Canvas2dContext::with_resolved(10, 10, &FontConfig::isolated().resolve()).unwrap();
        ctx.set_font("bold 32px Arial").unwrap();
        assert_eq!(ctx.state().font.size_px, 32.0);
        assert_eq!(ctx.state().font.weight, cosmic_text::Weight::BOLD);
        assert!(ctx.set_font("bold").is_err());
    }

    #[test]
    fn test_measure_without_fonts_is_empty() {
        let mut ctx =
            Canvas2dContext::with_resolved(10, 10, &FontConfig::isolated().resolve()).unwrap();
        ctx.set_font("16px Arial").unwrap();
        let metrics = ctx.measure_text("https://example.com");
        assert_eq!(metrics.width, 0.0);
        // Nominal ascent/descent still apply
        assert_eq!(metrics.ascent, 16.0 * 0.8);
    }

    #[test]
    fn test_fill_text_without_fonts_draws_nothing() {
        let mut ctx =
            Canvas2dContext::with_resolved(40, 20, &FontConfig::isolated().resolve()).unwrap();
        ctx.fill_text("Scan", 20.0, 15.0);
        assert!(ctx.get_image_data(0, 0, 40, 20).iter().all(|&b| b == 0));
    }
}
