//! Face selection: CSS-style family chains resolved against system fonts.
//!
//! ```text
//! "Inter, 'Helvetica Neue', sans-serif"
//!     │ parse_family_chain
//!     ▼
//! [Title("inter"), Title("helvetica neue"), SansSerif]
//!     │ SystemSource::select_best_match(properties_for(FontType))
//!     ▼
//! LoadedFace { font, data, units_per_em, ascent, descent }
//! ```

use std::sync::Arc;

use font_kit::error::{FontLoadingError, GlyphLoadingError, SelectionError};
use font_kit::family_name::FamilyName;
use font_kit::font::Font;
use font_kit::handle::Handle;
use font_kit::properties::{Properties, Style, Weight};
use font_kit::source::SystemSource;
use scribe_text::FontType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FontError {
    #[error("no system font matches {families:?} ({font_type:?})")]
    Selection {
        families: String,
        font_type: FontType,
        #[source]
        source: SelectionError,
    },

    #[error("font loading failed: {0}")]
    Loading(#[from] FontLoadingError),

    #[error("glyph loading failed: {0}")]
    Glyph(#[from] GlyphLoadingError),

    #[error("font tables unreadable: {0}")]
    Parse(#[from] ttf_parser::FaceParsingError),
}

// ── Font spec ───────────────────────────────────────────────────────

/// Which system fonts back a [`SystemRasterizer`](crate::SystemRasterizer).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    /// CSS-like fallback chain, e.g. `"Inter, Helvetica, sans-serif"`.
    pub families: String,
    /// Kerning pairs remembered per rasterizer.
    pub kerning_cache_capacity: usize,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            families: "sans-serif".into(),
            kerning_cache_capacity: 4096,
        }
    }
}

impl FontSpec {
    pub fn new(families: impl Into<String>) -> Self {
        Self {
            families: families.into(),
            ..Default::default()
        }
    }

    pub fn family_names(&self) -> Vec<FamilyName> {
        parse_family_chain(&self.families)
    }
}

/// Parse a CSS-like family list into font-kit family names.
///
/// Names are trimmed, unquoted and lowercased; generic keywords map to
/// font-kit's generic families. An empty chain falls back to sans-serif.
pub fn parse_family_chain(chain: &str) -> Vec<FamilyName> {
    let names: Vec<FamilyName> = chain
        .split(',')
        .map(|s| s.trim().trim_matches('"').trim_matches('\'').to_lowercase())
        .filter(|s| !s.is_empty())
        .map(|name| match name.as_str() {
            "serif" => FamilyName::Serif,
            "sans-serif" => FamilyName::SansSerif,
            "monospace" => FamilyName::Monospace,
            "cursive" => FamilyName::Cursive,
            "fantasy" => FamilyName::Fantasy,
            _ => FamilyName::Title(name),
        })
        .collect();

    if names.is_empty() {
        vec![FamilyName::SansSerif]
    } else {
        names
    }
}

/// font-kit properties for one of the four faces.
pub fn properties_for(font_type: FontType) -> Properties {
    let mut properties = Properties::new();
    if font_type.is_bold() {
        properties.weight = Weight::BOLD;
    }
    if font_type.is_italic() {
        properties.style = Style::Italic;
    }
    properties
}

// ── Loaded face ─────────────────────────────────────────────────────

/// A loaded system face plus the raw tables needed for kerning.
pub struct LoadedFace {
    pub font: Font,
    /// Raw font file, when the backend exposes it.
    data: Option<Arc<Vec<u8>>>,
    font_index: u32,
    pub units_per_em: u32,
    /// Font units, positive.
    pub ascent: f32,
    /// Font units, negative.
    pub descent: f32,
}

impl LoadedFace {
    /// Scale from font units to pixels at `size`.
    pub fn scale(&self, size: u32) -> f32 {
        size as f32 / self.units_per_em.max(1) as f32
    }

    pub fn family_name(&self) -> String {
        self.font.family_name()
    }

    /// Pair adjustment from the `kern` table, in font units.
    pub fn pair_kerning(&self, left: char, right: char) -> i16 {
        let Some(data) = self.data.as_deref() else {
            return 0;
        };
        let Ok(face) = ttf_parser::Face::parse(data, self.font_index) else {
            return 0;
        };
        let (Some(l), Some(r)) = (face.glyph_index(left), face.glyph_index(right)) else {
            return 0;
        };
        let Some(kern) = face.tables().kern else {
            return 0;
        };
        kern.subtables
            .into_iter()
            .filter(|st| st.horizontal && !st.variable && !st.has_cross_stream)
            .find_map(|st| st.glyphs_kerning(l, r))
            .unwrap_or(0)
    }
}

/// Select and load the best system face for `font_type`.
pub fn load_face(
    source: &SystemSource,
    spec: &FontSpec,
    font_type: FontType,
) -> Result<LoadedFace, FontError> {
    let handle = source
        .select_best_match(&spec.family_names(), &properties_for(font_type))
        .map_err(|source| FontError::Selection {
            families: spec.families.clone(),
            font_type,
            source,
        })?;
    let font_index = match &handle {
        Handle::Path { font_index, .. } | Handle::Memory { font_index, .. } => *font_index,
    };
    let font = handle.load()?;

    let data = font.copy_font_data();
    if let Some(bytes) = data.as_deref() {
        ttf_parser::Face::parse(bytes, font_index)?;
    }

    let metrics = font.metrics();
    Ok(LoadedFace {
        font,
        data,
        font_index,
        units_per_em: metrics.units_per_em,
        ascent: metrics.ascent,
        descent: metrics.descent,
    })
}

// ===================================================================
// Tests
// ===================================================================
