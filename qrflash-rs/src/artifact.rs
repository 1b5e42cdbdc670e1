//! Raster artifacts and their two representations.
//!
//! An artifact is encoded to PNG exactly once; the data URL and the blob are
//! both derived from those bytes, so they always decode to the same pixels.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;

pub const PNG_MIME: &str = "image/png";

/// Binary payload with a MIME type. Cloning shares the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Arc<[u8]>,
    mime: String,
}

impl Blob {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: mime.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A new handle to the same bytes.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// An encoded PNG image exposed as an embeddable data URL and as a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterArtifact {
    width: u32,
    height: u32,
    data_url: String,
    blob: Blob,
}

impl RasterArtifact {
    /// Wrap already encoded PNG bytes.
    pub fn from_png(png: Vec<u8>, width: u32, height: u32) -> Self {
        let data_url = to_data_url(PNG_MIME, &png);
        Self {
            width,
            height,
            data_url,
            blob: Blob::new(png, PNG_MIME),
        }
    }

    /// Encode straight-alpha RGBA pixels.
    pub fn from_rgba(rgba: &[u8], width: u32, height: u32) -> Result<Self, png::EncodingError> {
        let png = encode_png(rgba, width, height)?;
        Ok(Self::from_png(png, width, height))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Embeddable `data:image/png;base64,...` representation, used for previews.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn blob(&self) -> &Blob {
        &self.blob
    }

    pub fn byte_len(&self) -> usize {
        self.blob.len()
    }
}

/// Build a base64 data URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 data URL into its MIME type and decoded bytes.
pub fn parse_data_url(url: &str) -> Option<(&str, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((mime, bytes))
}

pub(crate) fn encode_png(rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(buf)
}
