//! Drop shadows, following the Canvas 2D `shadow*` attributes.
//!
//! A shadow is produced from the alpha channel of whatever was just drawn:
//! the alpha is blurred with three box passes (a close Gaussian approximation,
//! sigma = blur / 2 as HTML canvas defines it), tinted with the shadow color, and
//! composited under the drawing at the shadow offset.

use tiny_skia::Pixmap;

/// Drop shadow settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Shadow color (straight alpha).
    pub color: tiny_skia::Color,
    /// Blur radius in pixels.
    pub blur: f32,
    /// Horizontal offset in pixels.
    pub offset_x: f32,
    /// Vertical offset in pixels.
    pub offset_y: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: tiny_skia::Color::TRANSPARENT,
            blur: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Shadow {
    /// Whether drawing with this shadow produces any visible pixels.
    pub fn is_visible(&self) -> bool {
        self.color.alpha() > 0.0
            && (self.blur > 0.0 || self.offset_x != 0.0 || self.offset_y != 0.0)
    }

    /// Render the shadow cast by `layer`, without applying the offset.
    pub(crate) fn render(&self, layer: &Pixmap) -> Option<Pixmap> {
        let width = layer.width() as usize;
        let height = layer.height() as usize;

        let mut alpha: Vec<f32> = layer.pixels().iter().map(|p| p.alpha() as f32).collect();
        let sigma = self.blur / 2.0;
        if sigma > 0.0 {
            let mut scratch = vec![0.0f32; alpha.len()];
            for size in box_sizes_for_gauss(sigma, 3) {
                let radius = (size - 1) / 2;
                for y in 0..height {
                    blur_line(&alpha, &mut scratch, y * width, 1, width, radius);
                }
                for x in 0..width {
                    blur_line(&scratch, &mut alpha, x, width, height, radius);
                }
            }
        }

        let mut out = Pixmap::new(layer.width(), layer.height())?;
        let color = self.color;
        for (dst, a) in out.data_mut().chunks_exact_mut(4).zip(alpha) {
            let sa = (a / 255.0).clamp(0.0, 1.0) * color.alpha();
            dst[0] = (color.red() * sa * 255.0).round() as u8;
            dst[1] = (color.green() * sa * 255.0).round() as u8;
            dst[2] = (color.blue() * sa * 255.0).round() as u8;
            dst[3] = (sa * 255.0).round() as u8;
        }
        Some(out)
    }
}

/// Odd box widths whose three-pass convolution approximates a Gaussian.
fn box_sizes_for_gauss(sigma: f32, passes: usize) -> Vec<usize> {
    let n = passes as f32;
    let w_ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut wl = w_ideal.floor() as usize;
    if wl % 2 == 0 {
        wl = wl.saturating_sub(1);
    }
    let wl = wl.max(1);
    let wu = wl + 2;

    let wl_f = wl as f32;
    let m_ideal =
        (12.0 * sigma * sigma - n * wl_f * wl_f - 4.0 * n * wl_f - 3.0 * n) / (-4.0 * wl_f - 4.0);
    let m = m_ideal.round().max(0.0) as usize;

    (0..passes).map(|i| if i < m { wl } else { wu }).collect()
}

/// One-dimensional box blur of `len` samples starting at `start` with `stride`.
/// Samples outside the line count as fully transparent.
fn blur_line(src: &[f32], dst: &mut [f32], start: usize, stride: usize, len: usize, radius: usize) {
    if len == 0 {
        return;
    }
    let norm = 1.0 / (2 * radius + 1) as f32;
    let at = |i: usize| start + i * stride;

    let mut acc = 0.0f32;
    for i in 0..=radius.min(len - 1) {
        acc += src[at(i)];
    }
    for i in 0..len {
        dst[at(i)] = (acc * norm).max(0.0);
        let incoming = i + radius + 1;
        if incoming < len {
            acc += src[at(incoming)];
        }
        if i >= radius {
            acc -= src[at(i - radius)];
        }
    }
}
