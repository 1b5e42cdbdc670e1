//! Linear gradients for canvas fills.

use crate::error::{Canvas2dError, Canvas2dResult};

/// A color stop in a gradient.
#[derive(Debug, Clone)]
pub struct GradientStop {
    /// Offset position (0.0 to 1.0).
    pub offset: f64,
    /// Color at this stop.
    pub color: tiny_skia::Color,
}

/// Linear gradient from (x0, y0) to (x1, y1).
#[derive(Debug, Clone)]
pub struct CanvasGradient {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    /// Color stops, kept sorted by offset.
    pub stops: Vec<GradientStop>,
}

impl CanvasGradient {
    /// Create a new linear gradient with no stops.
    pub fn new_linear(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            stops: Vec::new(),
        }
    }

    /// Add a color stop from a CSS color string.
    pub fn add_color_stop(&mut self, offset: f64, color: &str) -> Canvas2dResult<()> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(Canvas2dError::InvalidGradientStop(offset));
        }
        let color = crate::context::parse_color(color)?;
        self.stops.push(GradientStop { offset, color });
        // Stable sort keeps insertion order for equal offsets
        self.stops.sort_by(|a, b| {
            a.offset
                .partial_cmp(&b.offset)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(())
    }

    pub(crate) fn to_shader(&self, global_alpha: f32) -> Option<tiny_skia::Shader<'static>> {
        if self.stops.is_empty() {
            return None;
        }
        let stops = self
            .stops
            .iter()
            .map(|stop| {
                let mut color = stop.color;
                if global_alpha < 1.0 {
                    color.set_alpha((color.alpha() * global_alpha).clamp(0.0, 1.0));
                }
                tiny_skia::GradientStop::new(stop.offset as f32, color)
            })
            .collect();

        tiny_skia::LinearGradient::new(
            tiny_skia::Point {
                x: self.x0,
                y: self.y0,
            },
            tiny_skia::Point {
                x: self.x1,
                y: self.y1,
            },
            stops,
            tiny_skia::SpreadMode::Pad,
            tiny_skia::Transform::identity(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_sorted() {
        let mut gradient = CanvasGradient::new_linear(0.0, 0.0, 10.0, 10.0);
        gradient.add_color_stop(1.0, "#0000ff").unwrap();
        gradient.add_color_stop(0.0, "#ff0000").unwrap();
        let offsets: Vec<f64> = gradient.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 1.0]);
    }

    #[test]
    fn test_invalid_stop_offset() {
        let mut gradient = CanvasGradient::new_linear(0.0, 0.0, 10.0, 10.0);
        assert!(matches!(
            gradient.add_color_stop(1.5, "#000"),
            Err(Canvas2dError::InvalidGradientStop(_))
        ));
        assert!(gradient.stops.is_empty());
    }
}
