//! Minimal pure Rust 2D canvas used to compose QR cards.
//!
//! The API follows the shape of the browser Canvas 2D context closely enough
//! that a layout written against `CanvasRenderingContext2D` translates line
//! for line. It uses:
//! - `tiny-skia` for rasterization
//! - `cosmic-text` for text shaping, measurement, and glyph outlines
//! - `fontdb` for font discovery
//! - `png` for encoding the finished pixel buffer
//!
//! # Example
//!
//! ```rust,ignore
//! use qrflash_canvas::{Canvas2dContext, RectParams};
//!
//! let mut ctx = Canvas2dContext::new(400, 300)?;
//! ctx.set_fill_style("#ff0000")?;
//! ctx.fill_rect(&RectParams { x: 10.0, y: 10.0, width: 100.0, height: 50.0 });
//! let png_data = ctx.to_png(None)?;
//! ```

mod context;
mod drawing_state;
mod error;
mod font_config;
mod font_parser;
mod geometry;
mod gradient;
mod shadow;
mod style;
mod text;

// Re-export public API
pub use context::Canvas2dContext;
pub use drawing_state::DrawingState;
pub use error::{Canvas2dError, Canvas2dResult};
pub use font_config::{CustomFont, FontConfig, GenericFamilyMap, ResolvedFontConfig};
pub use font_parser::{parse_font, ParsedFont};
pub use geometry::{CanvasImage, RectParams, RoundRectParams};
pub use gradient::{CanvasGradient, GradientStop};
pub use shadow::Shadow;
pub use style::{FillStyle, TextAlign, TextBaseline};
pub use text::TextMetrics;
