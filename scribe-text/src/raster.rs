//! Glyph rasterizer seam.
//!
//! The layout engine never talks to a font library directly. Everything it
//! needs from one (bitmaps, advances, pair kerning, vertical font metrics)
//! goes through [`GlyphRasterizer`]. `scribe-fonts` implements it on top of
//! the system fonts; [`FixedRasterizer`] is a deterministic stand-in with
//! em-proportional box glyphs, used for headless layout and tests.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::types::FontType;

/// A single-channel glyph bitmap plus its raw metrics, in pixels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RasterizedGlyph {
    pub width: u32,
    pub height: u32,
    /// Bytes per bitmap row (>= `width`).
    pub pitch: u32,
    /// Horizontal offset from the pen origin to the left ink edge.
    pub bearing_x: i32,
    /// Vertical offset from the baseline up to the top ink edge.
    pub bearing_y: i32,
    /// Horizontal distance to the next pen origin.
    pub advance: i32,
    /// Coverage values, `pitch * height` bytes.
    pub pixels: Vec<u8>,
}

impl RasterizedGlyph {
    /// An advance-only glyph (whitespace) without any ink.
    pub fn empty(advance: i32) -> Self {
        Self {
            advance,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Font rasterization collaborator.
///
/// Calls are synchronous; implementations may memoize internally.
pub trait GlyphRasterizer {
    /// Rasterize one codepoint, or `None` if the font has no glyph for it.
    fn rasterize(&mut self, font_type: FontType, size: u32, codepoint: char)
        -> Option<RasterizedGlyph>;

    /// Signed horizontal adjustment between two consecutive codepoints.
    fn kerning(&mut self, left: char, right: char, size: u32, font_type: FontType) -> i32;

    /// Font ascender at `size`, positive.
    fn ascender(&mut self, size: u32, font_type: FontType) -> i32;

    /// Font descender at `size`, negative.
    fn descender(&mut self, size: u32, font_type: FontType) -> i32;
}

// ── Fixed-metrics rasterizer ────────────────────────────────────────

/// Deterministic rasterizer producing solid box glyphs.
///
/// All metrics are fractions of the requested pixel size (em units), so
/// at size 20 with the defaults every printable character advances by 10px.
#[derive(Clone, Debug)]
pub struct FixedRasterizer {
    pub advance_em: f32,
    pub space_advance_em: f32,
    pub glyph_width_em: f32,
    pub glyph_height_em: f32,
    pub bearing_x_em: f32,
    pub ascender_em: f32,
    pub descender_em: f32,
    kerning: FxHashMap<(char, char), i32>,
    unsupported: FxHashSet<char>,
}

impl Default for FixedRasterizer {
    fn default() -> Self {
        Self {
            advance_em: 0.5,
            space_advance_em: 0.5,
            glyph_width_em: 0.4,
            glyph_height_em: 0.7,
            bearing_x_em: 0.05,
            ascender_em: 0.8,
            descender_em: -0.2,
            kerning: FxHashMap::default(),
            unsupported: FxHashSet::default(),
        }
    }
}

impl FixedRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kerning pair (in pixels, independent of size).
    pub fn with_kerning(mut self, left: char, right: char, value: i32) -> Self {
        self.kerning.insert((left, right), value);
        self
    }

    /// Make `codepoint` unrasterizable.
    pub fn with_unsupported(mut self, codepoint: char) -> Self {
        self.unsupported.insert(codepoint);
        self
    }

    fn px(size: u32, em: f32) -> i32 {
        (size as f32 * em).round() as i32
    }
}

impl GlyphRasterizer for FixedRasterizer {
    fn rasterize(
        &mut self,
        _font_type: FontType,
        size: u32,
        codepoint: char,
    ) -> Option<RasterizedGlyph> {
        if (codepoint as u32) < 32 || self.unsupported.contains(&codepoint) {
            return None;
        }
        if codepoint.is_whitespace() {
            return Some(RasterizedGlyph::empty(Self::px(size, self.space_advance_em)));
        }

        let width = Self::px(size, self.glyph_width_em).max(1) as u32;
        let height = Self::px(size, self.glyph_height_em).max(1) as u32;
        // Distinct fill per codepoint so blits can be told apart.
        let fill = 55 + (codepoint as u32 % 200) as u8;

        Some(RasterizedGlyph {
            width,
            height,
            pitch: width,
            bearing_x: Self::px(size, self.bearing_x_em),
            bearing_y: height as i32,
            advance: Self::px(size, self.advance_em),
            pixels: vec![fill; (width * height) as usize],
        })
    }

    fn kerning(&mut self, left: char, right: char, _size: u32, _font_type: FontType) -> i32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0)
    }

    fn ascender(&mut self, size: u32, _font_type: FontType) -> i32 {
        Self::px(size, self.ascender_em)
    }

    fn descender(&mut self, size: u32, _font_type: FontType) -> i32 {
        Self::px(size, self.descender_em)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_glyph_metrics() {
        let mut r = FixedRasterizer::new();
        let g = r.rasterize(FontType::Regular, 20, 'A').unwrap();
        assert_eq!((g.width, g.height, g.pitch), (8, 14, 8));
        assert_eq!(g.bearing_x, 1);
        assert_eq!(g.bearing_y, 14);
        assert_eq!(g.advance, 10);
        assert_eq!(g.pixels.len(), 8 * 14);
    }

    #[test]
    fn test_fixed_space_is_advance_only() {
        let mut r = FixedRasterizer::new();
        let g = r.rasterize(FontType::Regular, 20, ' ').unwrap();
        assert!(g.is_empty());
        assert_eq!(g.advance, 10);
    }

    #[test]
    fn test_fixed_rejects_controls_and_unsupported() {
        let mut r = FixedRasterizer::new().with_unsupported('Z');
        assert!(r.rasterize(FontType::Regular, 20, '\t').is_none());
        assert!(r.rasterize(FontType::Regular, 20, 'Z').is_none());
    }

    #[test]
    fn test_fixed_vertical_metrics_and_kerning() {
        let mut r = FixedRasterizer::new().with_kerning('A', 'V', -3);
        assert_eq!(r.ascender(20, FontType::Regular), 16);
        assert_eq!(r.descender(20, FontType::Regular), -4);
        assert_eq!(r.kerning('A', 'V', 20, FontType::Bold), -3);
        assert_eq!(r.kerning('V', 'A', 20, FontType::Bold), 0);
    }
}
