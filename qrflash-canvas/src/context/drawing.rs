//! Fill and paint helper operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::geometry::RectParams;
use crate::style::FillStyle;
use tiny_skia::{Pixmap, PixmapPaint, Transform};

impl Canvas2dContext {
    /// Fill the current path using the non-zero winding rule.
    pub fn fill(&mut self) {
        log::debug!(target: "canvas", "fill");
        // Clone the path builder so the path can be filled again
        let Some(path) = self.path_builder.clone().finish() else {
            return;
        };
        self.with_shadow(|ctx| {
            ctx.with_fill_paint(|ctx, paint| {
                ctx.pixmap.fill_path(
                    &path,
                    paint,
                    tiny_skia::FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            });
        });
    }

    /// Fill a rectangle.
    pub fn fill_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "fillRect {:?}", params);
        let Some(rect) =
            tiny_skia::Rect::from_xywh(params.x, params.y, params.width, params.height)
        else {
            return;
        };
        self.with_shadow(|ctx| {
            ctx.with_fill_paint(|ctx, paint| {
                ctx.pixmap
                    .fill_rect(rect, paint, Transform::identity(), None);
            });
        });
    }

    /// Fill the whole canvas with transparent black.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Run `draw` so that it casts the current shadow.
    ///
    /// Without a visible shadow this draws straight onto the canvas. Otherwise
    /// `draw` renders onto a scratch layer whose shadow is composited first,
    /// followed by the layer itself.
    pub(crate) fn with_shadow<R>(&mut self, draw: impl FnOnce(&mut Self) -> R) -> R {
        let shadow = self.state.shadow;
        if !shadow.is_visible() {
            return draw(self);
        }
        let Some(layer) = Pixmap::new(self.width, self.height) else {
            return draw(self);
        };

        let canvas = std::mem::replace(&mut self.pixmap, layer);
        let result = draw(self);
        let layer = std::mem::replace(&mut self.pixmap, canvas);

        if let Some(cast) = shadow.render(&layer) {
            self.pixmap.draw_pixmap(
                0,
                0,
                cast.as_ref(),
                &PixmapPaint::default(),
                Transform::from_translate(shadow.offset_x, shadow.offset_y),
                None,
            );
        }
        self.pixmap.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        result
    }

    pub(crate) fn with_fill_paint<R>(
        &mut self,
        draw: impl for<'a> FnOnce(&mut Self, &tiny_skia::Paint<'a>) -> R,
    ) -> Option<R> {
        let mut paint = tiny_skia::Paint {
            anti_alias: true,
            ..Default::default()
        };

        match self.state.fill_style.clone() {
            FillStyle::Color(mut color) => {
                // Apply global alpha
                if self.state.global_alpha < 1.0 {
                    color.set_alpha((color.alpha() * self.state.global_alpha).clamp(0.0, 1.0));
                }
                paint.set_color(color);
                Some(draw(self, &paint))
            }
            FillStyle::LinearGradient(gradient) => {
                paint.shader = gradient.to_shader(self.state.global_alpha)?;
                Some(draw(self, &paint))
            }
        }
    }
}
