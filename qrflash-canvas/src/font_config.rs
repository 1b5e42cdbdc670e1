//! Font configuration for canvas text.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Which fonts a canvas may use and how CSS generic families resolve.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Font files supplied as bytes (e.g. embedded brand fonts).
    pub custom_fonts: Vec<CustomFont>,
    /// Concrete families for the CSS generic names, in priority order.
    pub generic_families: GenericFamilyMap,
    /// Whether to scan the operating system's fonts (default: true).
    pub load_system_fonts: bool,
    /// Additional directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
    /// Whether glyph outlines are hinted (default: false).
    pub hinting_enabled: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_fonts: Vec::new(),
            generic_families: GenericFamilyMap::defaults(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
            hinting_enabled: false,
        }
    }
}

impl FontConfig {
    /// A configuration that loads nothing from the host.
    ///
    /// Text still shapes, but renders with zero width unless custom fonts are
    /// added. Useful for reproducible output across machines.
    pub fn isolated() -> Self {
        Self {
            load_system_fonts: false,
            ..Self::default()
        }
    }

    /// Resolve this configuration into a font database once, so it can be
    /// reused by many canvases without rescanning the filesystem.
    pub fn resolve(&self) -> ResolvedFontConfig {
        ResolvedFontConfig::new(self)
    }
}

/// A custom font: raw TTF/OTF bytes, shared cheaply between configs.
#[derive(Clone, Debug)]
pub struct CustomFont {
    pub data: Arc<Vec<u8>>,
}

/// Concrete font families for the CSS generic names.
#[derive(Clone, Debug, Default)]
pub struct GenericFamilyMap {
    pub sans_serif: Vec<String>,
    pub serif: Vec<String>,
    pub monospace: Vec<String>,
}

impl GenericFamilyMap {
    /// Browser-like defaults. Card text is set in Arial, so Arial-metric
    /// compatible families come first for sans-serif.
    pub fn defaults() -> Self {
        Self {
            sans_serif: vec![
                "Arial".into(),
                "Helvetica".into(),
                "Liberation Sans".into(),
                "DejaVu Sans".into(),
            ],
            serif: vec![
                "Times New Roman".into(),
                "Times".into(),
                "Liberation Serif".into(),
                "DejaVu Serif".into(),
            ],
            monospace: vec![
                "Courier New".into(),
                "Courier".into(),
                "Liberation Mono".into(),
                "DejaVu Sans Mono".into(),
            ],
        }
    }
}

/// A [`FontConfig`] resolved into a concrete font database.
///
/// Cloning copies the in-memory database; no filesystem access happens.
#[derive(Clone)]
pub struct ResolvedFontConfig {
    pub(crate) fontdb: fontdb::Database,
    pub(crate) hinting_enabled: bool,
}

impl std::fmt::Debug for ResolvedFontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFontConfig")
            .field("faces", &self.fontdb.len())
            .field("hinting_enabled", &self.hinting_enabled)
            .finish()
    }
}

impl ResolvedFontConfig {
    pub fn new(config: &FontConfig) -> Self {
        let mut db = fontdb::Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &config.font_dirs {
            db.load_fonts_dir(dir);
        }
        for font in &config.custom_fonts {
            db.load_font_data(Vec::from(font.data.as_slice()));
        }
        apply_generic_families(&mut db, &config.generic_families);
        log::debug!(target: "canvas", "resolved font database with {} faces", db.len());

        Self {
            fontdb: db,
            hinting_enabled: config.hinting_enabled,
        }
    }

    /// Number of font faces available.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }
}

/// Point each generic family at the first available candidate.
fn apply_generic_families(db: &mut fontdb::Database, families: &GenericFamilyMap) {
    let available: HashSet<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    let first_available = |candidates: &[String]| -> Option<String> {
        candidates.iter().find(|c| available.contains(*c)).cloned()
    };

    if let Some(family) = first_available(&families.sans_serif) {
        db.set_sans_serif_family(family);
    }
    if let Some(family) = first_available(&families.serif) {
        db.set_serif_family(family);
    }
    if let Some(family) = first_available(&families.monospace) {
        db.set_monospace_family(family);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_font_config() {
        let config = FontConfig::default();
        assert!(config.custom_fonts.is_empty());
        assert!(config.load_system_fonts);
        assert_eq!(config.generic_families.sans_serif[0], "Arial");
        assert!(!config.hinting_enabled);
    }

    #[test]
    fn test_isolated_config_has_no_faces() {
        let resolved = FontConfig::isolated().resolve();
        assert_eq!(resolved.face_count(), 0);
    }

    #[test]
    fn test_custom_font_clone_shares_bytes() {
        let config = FontConfig {
            custom_fonts: vec![CustomFont {
                data: Arc::new(vec![0u8; 64]),
            }],
            ..FontConfig::isolated()
        };
        let cloned = config.clone();
        assert!(Arc::ptr_eq(
            &config.custom_fonts[0].data,
            &cloned.custom_fonts[0].data
        ));
    }
}
