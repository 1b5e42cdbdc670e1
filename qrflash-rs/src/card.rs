//! Branded QR card composition.

use crate::artifact::RasterArtifact;
use crate::destination::CanonicalDestination;
use crate::encoder::CodeSurface;
use crate::error::CompositionError;
use qrflash_canvas::{
    Canvas2dContext, CanvasImage, FontConfig, RectParams, ResolvedFontConfig, RoundRectParams,
    TextAlign, TextBaseline,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Layout of a card. All positions are in card pixels.
const GRADIENT_START: &str = "hsl(262, 83%, 58%)";
const GRADIENT_END: &str = "hsl(230, 83%, 58%)";
const PANEL_COLOR: &str = "#ffffff";
const PANEL_INSET: f32 = 20.0;
const PANEL_RADIUS: f32 = 16.0;

const TITLE_FONT: &str = "bold 32px Arial";
const TITLE_COLOR: &str = "#111827";
const TITLE_Y: f32 = 78.0;
const TAGLINE_FONT: &str = "16px Arial";
const TAGLINE_COLOR: &str = "#6B7280";
const TAGLINE_Y: f32 = 106.0;
const DESTINATION_FONT: &str = "16px Arial";
const DESTINATION_COLOR: &str = "#374151";
const DESTINATION_Y: f32 = 132.0;
/// The destination may use the card width minus this much.
const DESTINATION_WIDTH_RESERVE: f32 = 200.0;
const TRUNCATED_CHARS: usize = 40;
const ELLIPSIS: char = '\u{2026}';

const CODE_SIZE: f32 = 200.0;
const CODE_TOP: f32 = 150.0;
const FRAME_PADDING: f32 = 10.0;
const FRAME_RADIUS: f32 = 12.0;
const SHADOW_COLOR: &str = "rgba(0,0,0,0.08)";
const SHADOW_BLUR: f32 = 16.0;
const SHADOW_OFFSET_Y: f32 = 8.0;

const FOOTER_TEXT: &str = "Scan to visit the link";
const FOOTER_FONT: &str = "14px Arial";
const FOOTER_COLOR: &str = "#6B7280";
const FOOTER_BOTTOM_OFFSET: f32 = 30.0;

/// Branding options of a card. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrandingSpec {
    pub brand_name: String,
    pub brand_tagline: String,
    pub card_width: u32,
    pub card_height: u32,
}

impl Default for BrandingSpec {
    fn default() -> Self {
        Self {
            brand_name: "QR Flash Code".to_string(),
            brand_tagline: "Instant QR Code".to_string(),
            card_width: 600,
            card_height: 400,
        }
    }
}

/// Shorten `text` to its first 40 characters plus an ellipsis when `measure`
/// reports it wider than `budget`. Text exactly at the budget is kept.
pub fn truncate_to_width<'a>(
    text: &'a str,
    budget: f32,
    mut measure: impl FnMut(&str) -> f32,
) -> Cow<'a, str> {
    if measure(text) > budget {
        let mut shortened: String = text.chars().take(TRUNCATED_CHARS).collect();
        shortened.push(ELLIPSIS);
        Cow::Owned(shortened)
    } else {
        Cow::Borrowed(text)
    }
}

/// Composes code surfaces into branded cards.
///
/// Fonts are resolved once and shared by every composition.
#[derive(Debug, Clone)]
pub struct CardCompositor {
    fonts: ResolvedFontConfig,
}

impl Default for CardCompositor {
    fn default() -> Self {
        Self::from_config(&FontConfig::default())
    }
}

impl CardCompositor {
    pub fn new(fonts: ResolvedFontConfig) -> Self {
        Self { fonts }
    }

    pub fn from_config(config: &FontConfig) -> Self {
        Self::new(config.resolve())
    }

    /// Compose `surface` into a card showing `destination`.
    ///
    /// The destination is drawn as given; it is already canonical.
    pub async fn compose(
        &self,
        surface: CodeSurface,
        destination: &CanonicalDestination,
        branding: &BrandingSpec,
    ) -> Result<RasterArtifact, CompositionError> {
        log::debug!(
            "composing {}x{} card for {}",
            branding.card_width,
            branding.card_height,
            destination
        );

        // Decode before drawing anything so a bad surface leaves no canvas behind.
        tokio::task::yield_now().await;
        let code = CanvasImage::from_rgba(surface.pixels(), surface.width(), surface.height())
            .map_err(|e| CompositionError::Decode(e.to_string()))?;
        drop(surface);

        let (width, height) = (branding.card_width, branding.card_height);
        let mut ctx = Canvas2dContext::with_resolved(width, height, &self.fonts)?;
        let (w, h) = (width as f32, height as f32);
        let center_x = w / 2.0;

        // Background
        let mut gradient = ctx.create_linear_gradient(0.0, 0.0, w, h);
        gradient.add_color_stop(0.0, GRADIENT_START)?;
        gradient.add_color_stop(1.0, GRADIENT_END)?;
        ctx.set_fill_style_gradient(gradient);
        ctx.fill_rect(&RectParams {
            x: 0.0,
            y: 0.0,
            width: w,
            height: h,
        });

        // Panel
        ctx.set_fill_style(PANEL_COLOR)?;
        ctx.begin_path();
        ctx.round_rect(&RoundRectParams {
            x: PANEL_INSET,
            y: PANEL_INSET,
            width: w - 2.0 * PANEL_INSET,
            height: h - 2.0 * PANEL_INSET,
            radius: PANEL_RADIUS,
        });
        ctx.fill();

        // Text rows are laid out by their baselines
        ctx.set_text_align(TextAlign::Center);
        ctx.set_text_baseline(TextBaseline::Alphabetic);
        ctx.set_fill_style(TITLE_COLOR)?;
        ctx.set_font(TITLE_FONT)?;
        ctx.fill_text(&branding.brand_name, center_x, TITLE_Y);

        ctx.set_font(TAGLINE_FONT)?;
        ctx.set_fill_style(TAGLINE_COLOR)?;
        ctx.fill_text(&branding.brand_tagline, center_x, TAGLINE_Y);

        ctx.set_font(DESTINATION_FONT)?;
        ctx.set_fill_style(DESTINATION_COLOR)?;
        let label = truncate_to_width(
            destination.as_str(),
            w - DESTINATION_WIDTH_RESERVE,
            |text| ctx.measure_text(text).width,
        );
        ctx.fill_text(&label, center_x, DESTINATION_Y);

        // Frame and code
        let code_x = (w - CODE_SIZE) / 2.0;
        ctx.set_fill_style(PANEL_COLOR)?;
        ctx.begin_path();
        ctx.round_rect(&RoundRectParams {
            x: code_x - FRAME_PADDING,
            y: CODE_TOP - FRAME_PADDING,
            width: CODE_SIZE + 2.0 * FRAME_PADDING,
            height: CODE_SIZE + 2.0 * FRAME_PADDING,
            radius: FRAME_RADIUS,
        });
        ctx.fill();

        // Only the code casts a shadow. Modules are resampled without
        // smoothing so their edges stay sharp for scanners.
        ctx.save();
        ctx.set_shadow_color(SHADOW_COLOR)?;
        ctx.set_shadow_blur(SHADOW_BLUR);
        ctx.set_shadow_offset_y(SHADOW_OFFSET_Y);
        ctx.set_image_smoothing_enabled(false);
        ctx.draw_image_scaled(&code, code_x, CODE_TOP, CODE_SIZE, CODE_SIZE);
        ctx.restore();

        ctx.set_font(FOOTER_FONT)?;
        ctx.set_fill_style(FOOTER_COLOR)?;
        ctx.fill_text(FOOTER_TEXT, center_x, h - FOOTER_BOTTOM_OFFSET);

        // One PNG encode feeds both representations
        tokio::task::yield_now().await;
        let png = ctx.to_png(None)?;
        Ok(RasterArtifact::from_png(png, width, height))
    }
}
