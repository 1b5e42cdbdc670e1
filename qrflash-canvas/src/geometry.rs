//! Parameter structs and image sources for canvas drawing operations.

use crate::error::{Canvas2dError, Canvas2dResult};

/// Parameters for an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectParams {
    /// X coordinate of the top-left corner.
    pub x: f32,
    /// Y coordinate of the top-left corner.
    pub y: f32,
    /// Rectangle width.
    pub width: f32,
    /// Rectangle height.
    pub height: f32,
}

/// Parameters for a rectangle with four equal circular corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRectParams {
    /// X coordinate of the top-left corner.
    pub x: f32,
    /// Y coordinate of the top-left corner.
    pub y: f32,
    /// Rectangle width.
    pub width: f32,
    /// Rectangle height.
    pub height: f32,
    /// Requested corner radius. Clamped to half of the shorter side.
    pub radius: f32,
}

impl RoundRectParams {
    /// Corner radius actually used when building the path.
    pub fn effective_radius(&self) -> f32 {
        self.radius
            .min(self.width.abs() / 2.0)
            .min(self.height.abs() / 2.0)
            .max(0.0)
    }
}

/// A decoded image ready to be drawn onto a canvas.
///
/// Pixels are stored premultiplied, which is what tiny-skia composites with.
#[derive(Debug, Clone)]
pub struct CanvasImage {
    pub(crate) pixmap: tiny_skia::Pixmap,
}

impl CanvasImage {
    /// Build an image from straight-alpha RGBA bytes (4 bytes per pixel).
    pub fn from_rgba(data: &[u8], width: u32, height: u32) -> Canvas2dResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or(Canvas2dError::InvalidDimensions { width, height })?;
        if width == 0 || height == 0 {
            return Err(Canvas2dError::InvalidDimensions { width, height });
        }
        if data.len() != expected {
            return Err(Canvas2dError::ImageDataError {
                expected,
                actual: data.len(),
            });
        }

        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(Canvas2dError::InvalidDimensions {
                width,
                height,
            })?;
        for (dst, src) in pixmap.data_mut().chunks_exact_mut(4).zip(data.chunks_exact(4)) {
            let a = src[3];
            if a == 255 {
                dst.copy_from_slice(src);
            } else if a == 0 {
                dst.copy_from_slice(&[0, 0, 0, 0]);
            } else {
                // (color * alpha + 127) / 255 rounds to nearest
                let a16 = a as u16;
                dst[0] = ((src[0] as u16 * a16 + 127) / 255) as u8;
                dst[1] = ((src[1] as u16 * a16 + 127) / 255) as u8;
                dst[2] = ((src[2] as u16 * a16 + 127) / 255) as u8;
                dst[3] = a;
            }
        }

        Ok(Self { pixmap })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
}
