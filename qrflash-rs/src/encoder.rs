//! Code-image encoder boundary.
//!
//! The pipeline only depends on [`CodeEncoder`]; [`QrCodeEncoder`] is the
//! default implementation backed by the `qrcode` crate. It rasterizes the
//! module matrix with the same scale and margin arithmetic browsers get from
//! the common JavaScript `qrcode` package, so `width` is an exact pixel size
//! whenever it is large enough to hold the symbol.

use crate::artifact::RasterArtifact;
use crate::error::{CompositionError, EncodingError};
use async_trait::async_trait;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};
use std::sync::Arc;

/// Scale used when `width` is too small to hold the symbol plus margins.
const FALLBACK_SCALE: f32 = 4.0;

/// Largest code edge in pixels; the canvas cannot draw anything wider.
pub const MAX_CODE_SIZE: u32 = 32767;

/// How the code is rasterized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Target image width (and height) in pixels. Must be positive.
    pub width: u32,
    /// Quiet zone around the symbol, in modules.
    pub margin: u32,
    /// CSS color of dark modules.
    pub dark_color: String,
    /// CSS color of light modules and the quiet zone.
    pub light_color: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 256,
            margin: 2,
            dark_color: "#1a1a1a".to_string(),
            light_color: "#ffffff".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_dark_color(mut self, color: impl Into<String>) -> Self {
        self.dark_color = color.into();
        self
    }

    pub fn with_light_color(mut self, color: impl Into<String>) -> Self {
        self.light_color = color.into();
        self
    }

    fn parsed_colors(&self) -> Result<([u8; 4], [u8; 4]), EncodingError> {
        let parse = |role: &'static str, value: &str| {
            csscolorparser::parse(value)
                .map(|c| c.to_rgba8())
                .map_err(|_| EncodingError::InvalidColor {
                    role,
                    value: value.to_string(),
                })
        };
        Ok((
            parse("dark", &self.dark_color)?,
            parse("light", &self.light_color)?,
        ))
    }
}

/// Raster output of an encoder: straight-alpha RGBA pixels.
///
/// The surface is not validated on construction; a buffer that does not
/// match its dimensions fails later, when it is decoded for drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSurface {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl CodeSurface {
    pub fn new(width: u32, height: u32, pixels: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    /// Decode a PNG into a surface.
    pub fn from_png(bytes: &[u8]) -> Result<Self, CompositionError> {
        let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|e| CompositionError::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        Ok(Self::new(width, height, decoded.into_raw()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Encode a copy of the pixels as a PNG artifact, for display and direct download.
    pub fn to_artifact(&self) -> Result<RasterArtifact, EncodingError> {
        RasterArtifact::from_rgba(&self.pixels, self.width, self.height)
            .map_err(|e| EncodingError::Failed(e.to_string()))
    }
}

/// Turns text into a code surface. Implementations may suspend.
#[async_trait(?Send)]
pub trait CodeEncoder {
    /// Fails with [`EncodingError::CapacityExceeded`] when `text` does not fit.
    async fn encode(&self, text: &str, options: &RenderOptions) -> Result<CodeSurface, EncodingError>;
}

/// QR encoder using the `qrcode` crate.
#[derive(Debug, Clone, Copy)]
pub struct QrCodeEncoder {
    ec_level: EcLevel,
}

impl Default for QrCodeEncoder {
    fn default() -> Self {
        Self { ec_level: EcLevel::M }
    }
}

impl QrCodeEncoder {
    pub fn new(ec_level: EcLevel) -> Self {
        Self { ec_level }
    }
}

#[async_trait(?Send)]
impl CodeEncoder for QrCodeEncoder {
    async fn encode(&self, text: &str, options: &RenderOptions) -> Result<CodeSurface, EncodingError> {
        if options.width == 0 {
            return Err(EncodingError::InvalidOptions(
                "width must be positive".to_string(),
            ));
        }
        let (dark, light) = options.parsed_colors()?;

        let code = QrCode::with_error_correction_level(text.as_bytes(), self.ec_level).map_err(
            |err| match err {
                QrError::DataTooLong => EncodingError::CapacityExceeded { len: text.len() },
                other => EncodingError::Failed(other.to_string()),
            },
        )?;
        log::debug!(
            "encoded {} bytes into a {}x{} module QR code",
            text.len(),
            code.width(),
            code.width()
        );

        let size = code_size(code.width(), options.width, options.margin).ok_or_else(|| {
            EncodingError::InvalidOptions(format!(
                "a {} px code with a margin of {} modules exceeds {} px",
                options.width, options.margin, MAX_CODE_SIZE
            ))
        })?;

        tokio::task::yield_now().await;
        Ok(rasterize(
            &code.to_colors(),
            code.width(),
            size,
            options.margin,
            dark,
            light,
        ))
    }
}

/// Modules across the symbol plus `margin` on each side.
fn span_for(modules: usize, margin: u32) -> Option<u32> {
    u32::try_from(modules).ok()?.checked_add(margin.checked_mul(2)?)
}

/// Pixel scale for a symbol of `modules` modules plus `margin` on each side.
fn scale_for(modules: usize, width: u32, margin: u32) -> f32 {
    match span_for(modules, margin) {
        Some(span) if width >= span => width as f32 / span as f32,
        _ => FALLBACK_SCALE,
    }
}

/// Edge length of the rasterized code, or `None` past [`MAX_CODE_SIZE`].
fn code_size(modules: usize, width: u32, margin: u32) -> Option<u32> {
    let span = span_for(modules, margin)?;
    // span * (width / span) is exactly width; skip the float round trip
    let size = if width >= span {
        width
    } else {
        span.checked_mul(FALLBACK_SCALE as u32)?
    };
    (size <= MAX_CODE_SIZE).then_some(size)
}

/// Draw `colors` into a `size` x `size` surface. `size` comes from [`code_size`].
fn rasterize(
    colors: &[Color],
    modules: usize,
    size: u32,
    margin: u32,
    dark: [u8; 4],
    light: [u8; 4],
) -> CodeSurface {
    let scale = scale_for(modules, size, margin);
    let scaled_margin = margin as f32 * scale;
    let inner_end = size as f32 - scaled_margin;

    let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
    for row in 0..size {
        for col in 0..size {
            let (r, c) = (row as f32, col as f32);
            let inside =
                r >= scaled_margin && c >= scaled_margin && r < inner_end && c < inner_end;
            let px = if inside {
                let src_row = (((r - scaled_margin) / scale) as usize).min(modules - 1);
                let src_col = (((c - scaled_margin) / scale) as usize).min(modules - 1);
                match colors[src_row * modules + src_col] {
                    Color::Dark => dark,
                    Color::Light => light,
                }
            } else {
                light
            };
            pixels.extend_from_slice(&px);
        }
    }
    CodeSurface::new(size, size, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pixel(surface: &CodeSurface, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * surface.width() + x) * 4) as usize;
        let p = &surface.pixels()[idx..idx + 4];
        [p[0], p[1], p[2], p[3]]
    }

    #[tokio::test]
    async fn test_default_options_produce_256_px_code() {
        let surface = QrCodeEncoder::default()
            .encode("https://example.com", &RenderOptions::default())
            .await
            .unwrap();
        assert_eq!(surface.width(), 256);
        assert_eq!(surface.height(), 256);
        assert_eq!(surface.pixels().len(), 256 * 256 * 4);

        // Quiet zone is light, the finder pattern corner is dark.
        assert_eq!(pixel(&surface, 0, 0), [255, 255, 255, 255]);
        let margin_px = (2.0 * scale_for(25, 256, 2)).ceil() as u32;
        assert_eq!(pixel(&surface, margin_px + 1, margin_px + 1), [26, 26, 26, 255]);
    }

    #[tokio::test]
    async fn test_small_width_falls_back_to_fixed_scale() {
        let options = RenderOptions::default().with_width(10).with_margin(0);
        let surface = QrCodeEncoder::default()
            .encode("hi", &options)
            .await
            .unwrap();
        // Version 1 symbol: 21 modules at scale 4.
        assert_eq!(surface.width(), 84);
    }

    #[tokio::test]
    async fn test_capacity_exceeded() {
        let text = "x".repeat(4000);
        let err = QrCodeEncoder::default()
            .encode(&text, &RenderOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, EncodingError::CapacityExceeded { len: 4000 });
    }

    #[rstest]
    #[case(RenderOptions::default().with_dark_color("nope"), "dark")]
    #[case(RenderOptions::default().with_light_color("#12"), "light")]
    #[tokio::test]
    async fn test_bad_color_is_encoding_error(#[case] options: RenderOptions, #[case] role: &str) {
        let err = QrCodeEncoder::default()
            .encode("https://example.com", &options)
            .await
            .unwrap_err();
        assert!(matches!(err, EncodingError::InvalidColor { role: r, .. } if r == role));
    }

    #[tokio::test]
    async fn test_zero_width_rejected() {
        let options = RenderOptions::default().with_width(0);
        assert!(matches!(
            QrCodeEncoder::default().encode("a", &options).await,
            Err(EncodingError::InvalidOptions(_))
        ));
    }

    #[rstest]
    #[case(RenderOptions::default().with_width(40_000))]
    #[case(RenderOptions::default().with_width(u32::MAX))]
    #[case(RenderOptions::default().with_margin(u32::MAX / 2 + 1))]
    #[case(RenderOptions::default().with_width(10).with_margin(5_000))]
    #[tokio::test]
    async fn test_oversized_options_rejected(#[case] options: RenderOptions) {
        assert!(matches!(
            QrCodeEncoder::default().encode("https://example.com", &options).await,
            Err(EncodingError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_code_size_limits() {
        assert_eq!(code_size(25, 256, 2), Some(256));
        assert_eq!(code_size(21, 10, 0), Some(84));
        assert_eq!(code_size(25, MAX_CODE_SIZE, 2), Some(MAX_CODE_SIZE));
        assert_eq!(code_size(25, MAX_CODE_SIZE + 1, 2), None);
        assert_eq!(code_size(25, 256, u32::MAX), None);
    }

    #[test]
    fn test_surface_roundtrips_through_png() {
        let colors = vec![Color::Dark, Color::Light, Color::Light, Color::Dark];
        let surface = rasterize(&colors, 2, 8, 1, [0, 0, 0, 255], [255, 255, 255, 255]);
        assert_eq!(surface.width(), 8);

        let artifact = surface.to_artifact().unwrap();
        let decoded = CodeSurface::from_png(artifact.blob().bytes()).unwrap();
        assert_eq!(decoded, surface);
        assert_eq!(
            crate::artifact::parse_data_url(artifact.data_url()).unwrap().1,
            artifact.blob().bytes()
        );
    }

    #[test]
    fn test_from_png_rejects_garbage() {
        assert!(matches!(
            CodeSurface::from_png(b"not a png"),
            Err(CompositionError::Decode(_))
        ));
    }

    #[test]
    fn test_rasterize_maps_modules_with_margin() {
        // 2x2 modules, margin 1, width 8 -> scale 2, 8x8 image.
        let colors = vec![Color::Dark, Color::Light, Color::Light, Color::Dark];
        let surface = rasterize(&colors, 2, 8, 1, [0, 0, 0, 255], [255, 255, 255, 255]);
        let dark = [0, 0, 0, 255];
        let light = [255, 255, 255, 255];
        assert_eq!(pixel(&surface, 0, 0), light);
        assert_eq!(pixel(&surface, 2, 2), dark);
        assert_eq!(pixel(&surface, 3, 3), dark);
        assert_eq!(pixel(&surface, 4, 2), light);
        assert_eq!(pixel(&surface, 5, 5), dark);
        assert_eq!(pixel(&surface, 6, 6), light);
    }
}
