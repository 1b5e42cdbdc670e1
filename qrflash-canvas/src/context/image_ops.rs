//! Image drawing, pixel readback and PNG export for Canvas2dContext.

use super::Canvas2dContext;
use crate::error::Canvas2dResult;
use crate::geometry::CanvasImage;
use tiny_skia::Transform;

impl Canvas2dContext {
    /// Draw an image scaled into the destination rectangle.
    pub fn draw_image_scaled(&mut self, image: &CanvasImage, dx: f32, dy: f32, dw: f32, dh: f32) {
        log::debug!(target: "canvas", "drawImage {} {} {} {}", dx, dy, dw, dh);
        if !(dw > 0.0 && dh > 0.0) {
            return;
        }
        let paint = tiny_skia::PixmapPaint {
            opacity: self.state.global_alpha,
            quality: if self.state.image_smoothing_enabled {
                tiny_skia::FilterQuality::Bilinear
            } else {
                tiny_skia::FilterQuality::Nearest
            },
            ..Default::default()
        };

        let scale_x = dw / image.width() as f32;
        let scale_y = dh / image.height() as f32;
        let transform = Transform::from_translate(dx, dy).pre_scale(scale_x, scale_y);

        self.with_shadow(|ctx| {
            ctx.pixmap
                .draw_pixmap(0, 0, image.pixmap.as_ref(), &paint, transform, None);
        });
    }

    /// Get straight-alpha RGBA data for a region of the canvas.
    ///
    /// Pixels outside the canvas read as transparent black.
    pub fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0u8; (width * height * 4) as usize];

        for dy in 0..height {
            for dx in 0..width {
                let src_x = x + dx as i32;
                let src_y = y + dy as i32;
                if src_x < 0 || src_x >= self.width as i32 || src_y < 0 || src_y >= self.height as i32
                {
                    continue;
                }

                let dst_idx = ((dy * width + dx) * 4) as usize;
                let src_idx = ((src_y as u32 * self.width + src_x as u32) * 4) as usize;
                let pixel = &self.pixmap.data()[src_idx..src_idx + 4];

                // Convert from premultiplied alpha to straight alpha
                let a = pixel[3];
                if a == 255 {
                    data[dst_idx..dst_idx + 4].copy_from_slice(pixel);
                } else if a > 0 {
                    let alpha_f = a as f32 / 255.0;
                    data[dst_idx] = (pixel[0] as f32 / alpha_f).round().min(255.0) as u8;
                    data[dst_idx + 1] = (pixel[1] as f32 / alpha_f).round().min(255.0) as u8;
                    data[dst_idx + 2] = (pixel[2] as f32 / alpha_f).round().min(255.0) as u8;
                    data[dst_idx + 3] = a;
                }
            }
        }

        data
    }

    /// Export the canvas as PNG data.
    ///
    /// # Arguments
    /// * `ppi` - Optional pixels per inch for PNG metadata. Defaults to 72 if not specified.
    pub fn to_png(&self, ppi: Option<f32>) -> Canvas2dResult<Vec<u8>> {
        let ppi = ppi.unwrap_or(72.0);

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            // Pixel density metadata (pixels per meter)
            let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;
            let data = self.get_image_data(0, 0, self.width, self.height);
            writer.write_image_data(&data)?;
        }
        Ok(buf)
    }
}
