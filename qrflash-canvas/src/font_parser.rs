//! CSS font shorthand parsing.
//!
//! Handles the subset of the `font` shorthand that canvas code actually
//! writes: `[style] [variant] [weight] size[/line-height] family[, family]*`,
//! e.g. `"bold 32px Arial"` or `"italic 600 12pt 'Open Sans', sans-serif"`.

use crate::error::{Canvas2dError, Canvas2dResult};
use cosmic_text::{Style, Weight};

/// Parsed font specification from a CSS font string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFont {
    /// Font style (normal, italic, oblique).
    pub style: Style,
    /// Font weight (100-900).
    pub weight: Weight,
    /// Font size in pixels.
    pub size_px: f32,
    /// Font families in order of preference.
    pub families: Vec<String>,
}

impl Default for ParsedFont {
    fn default() -> Self {
        // Canvas default is "10px sans-serif"
        Self {
            style: Style::Normal,
            weight: Weight::NORMAL,
            size_px: 10.0,
            families: vec!["sans-serif".to_string()],
        }
    }
}

/// Parse a CSS font string into components.
pub fn parse_font(font_str: &str) -> Canvas2dResult<ParsedFont> {
    let font_str = font_str.trim();
    if font_str.is_empty() {
        return Err(Canvas2dError::FontParseError("empty font string".to_string()));
    }

    let mut result = ParsedFont::default();
    let mut rest = font_str;

    // Leading style / variant / weight keywords, in any order
    loop {
        rest = rest.trim_start();
        let (token, tail) = match rest.find(char::is_whitespace) {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        match token {
            "italic" => result.style = Style::Italic,
            "oblique" => result.style = Style::Oblique,
            "normal" | "small-caps" => {}
            "bold" | "bolder" => result.weight = Weight::BOLD,
            "lighter" => result.weight = Weight::LIGHT,
            _ => match token.parse::<u16>() {
                Ok(w) if (1..=1000).contains(&w) && !tail.is_empty() => {
                    result.weight = Weight(w)
                }
                _ => break,
            },
        }
        rest = tail;
    }

    // Size, with an optional line height we don't need
    let (size_token, families) = match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    };
    let size_token = size_token.split('/').next().unwrap_or(size_token);
    result.size_px = parse_size(size_token)
        .ok_or_else(|| Canvas2dError::FontParseError(format!("invalid font size in {font_str:?}")))?;

    if families.is_empty() {
        return Err(Canvas2dError::FontParseError(format!(
            "missing font family in {font_str:?}"
        )));
    }
    result.families = families
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|f| !f.is_empty())
        .collect();

    Ok(result)
}

fn parse_size(token: &str) -> Option<f32> {
    let (number, factor) = if let Some(n) = token.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = token.strip_suffix("pt") {
        (n, 4.0 / 3.0)
    } else if let Some(n) = token.strip_suffix("rem") {
        (n, 16.0)
    } else if let Some(n) = token.strip_suffix("em") {
        (n, 16.0)
    } else {
        return None;
    };
    let value: f32 = number.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value * factor)
}
