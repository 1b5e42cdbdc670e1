//! Path building operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::geometry::{RectParams, RoundRectParams};

/// Cubic Bezier control distance for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

impl Canvas2dContext {
    /// Begin a new path.
    pub fn begin_path(&mut self) {
        log::debug!(target: "canvas", "beginPath");
        self.path_builder = tiny_skia::PathBuilder::new();
    }

    /// Move to a point without drawing.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.path_builder.move_to(x, y);
    }

    /// Draw a line to a point.
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.path_builder.line_to(x, y);
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) {
        self.path_builder.close();
    }

    /// Add a rectangle to the current path.
    pub fn rect(&mut self, params: &RectParams) {
        let RectParams {
            x,
            y,
            width,
            height,
        } = *params;
        self.path_builder.move_to(x, y);
        self.path_builder.line_to(x + width, y);
        self.path_builder.line_to(x + width, y + height);
        self.path_builder.line_to(x, y + height);
        self.path_builder.close();
    }

    /// Add a rounded rectangle with a uniform corner radius to the current path.
    ///
    /// Degenerate rectangles (zero or negative size) add nothing.
    pub fn round_rect(&mut self, params: &RoundRectParams) {
        if !(params.width > 0.0 && params.height > 0.0) {
            return;
        }
        let r = params.effective_radius();
        if r == 0.0 {
            self.rect(&RectParams {
                x: params.x,
                y: params.y,
                width: params.width,
                height: params.height,
            });
            return;
        }

        let (x, y) = (params.x, params.y);
        let (right, bottom) = (x + params.width, y + params.height);
        let k = r * KAPPA;
        let pb = &mut self.path_builder;

        pb.move_to(x + r, y);
        pb.line_to(right - r, y);
        pb.cubic_to(right - r + k, y, right, y + r - k, right, y + r);
        pb.line_to(right, bottom - r);
        pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
        pb.line_to(x + r, bottom);
        pb.cubic_to(x + r - k, bottom, x, bottom - r + k, x, bottom - r);
        pb.line_to(x, y + r);
        pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
        pb.close();
    }
}
