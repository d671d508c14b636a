//! Font family: the rasterizer plus the glyph cache it feeds.
//!
//! Every text object laid out with the same family shares its atlas.
//! Text edits borrow the family mutably for the duration of the call.

use crate::atlas::{AtlasConfig, AtlasRegion, GlyphAtlas};
use crate::cache::{GlyphCache, GlyphKey, GlyphMetrics, RegionId};
use crate::error::TextResult;
use crate::raster::GlyphRasterizer;
use crate::types::{FontType, Rect};

pub struct FontFamily {
    rasterizer: Box<dyn GlyphRasterizer>,
    cache: GlyphCache,
}

impl FontFamily {
    pub fn new<R: GlyphRasterizer + 'static>(rasterizer: R, atlas: AtlasConfig) -> Self {
        Self {
            rasterizer: Box::new(rasterizer),
            cache: GlyphCache::new(atlas),
        }
    }

    /// Make sure the glyph exists in the cache; `false` if it could not be
    /// rasterized or placed.
    pub fn create_char(&mut self, font_type: FontType, size: u32, codepoint: char) -> bool {
        self.try_find_or_create(font_type, size, codepoint).is_ok()
    }

    /// Cached glyph, created on first request.
    pub fn find_or_create(
        &mut self,
        font_type: FontType,
        size: u32,
        codepoint: char,
    ) -> Option<&GlyphMetrics> {
        self.try_find_or_create(font_type, size, codepoint).ok()
    }

    pub fn try_find_or_create(
        &mut self,
        font_type: FontType,
        size: u32,
        codepoint: char,
    ) -> TextResult<&GlyphMetrics> {
        let key = GlyphKey::new(font_type, size, codepoint);
        self.cache.find_or_create(self.rasterizer.as_mut(), key)
    }

    /// Metrics to lay a glyph out with, created on first request.
    ///
    /// Unlike [`FontFamily::find_or_create`] this also answers for glyphs
    /// that rasterized but did not fit in the atlas; those have an empty
    /// region and no texture coordinate.
    pub fn layout_metrics(
        &mut self,
        font_type: FontType,
        size: u32,
        codepoint: char,
    ) -> Option<GlyphMetrics> {
        let key = GlyphKey::new(font_type, size, codepoint);
        let placed = self
            .cache
            .find_or_create(self.rasterizer.as_mut(), key)
            .ok()
            .copied();
        placed.or_else(|| self.cache.unplaced(&key).copied())
    }

    /// Cached glyph without creating it.
    pub fn glyph(&self, font_type: FontType, size: u32, codepoint: char) -> Option<&GlyphMetrics> {
        self.cache.get(&GlyphKey::new(font_type, size, codepoint))
    }

    pub fn region(&self, id: RegionId) -> Option<&AtlasRegion> {
        self.cache.region(id)
    }

    pub fn kerning(&mut self, left: char, right: char, size: u32, font_type: FontType) -> i32 {
        self.rasterizer.kerning(left, right, size, font_type)
    }

    pub fn ascender(&mut self, size: u32, font_type: FontType) -> i32 {
        self.rasterizer.ascender(size, font_type)
    }

    pub fn descender(&mut self, size: u32, font_type: FontType) -> i32 {
        self.rasterizer.descender(size, font_type)
    }

    /// Normalized atlas rect of a cached glyph.
    pub fn texture_coordinate(&self, font_type: FontType, size: u32, codepoint: char) -> Option<Rect> {
        let metrics = self.glyph(font_type, size, codepoint)?;
        let region = self.cache.region(metrics.region)?;
        Some(self.cache.atlas().tex_rect(region))
    }

    /// Atlas pixels, `atlas_width * atlas_height` bytes.
    pub fn texture(&self) -> &[u8] {
        self.cache.atlas().texture()
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        self.cache.atlas()
    }

    /// Whether the atlas changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        self.cache.atlas_mut().take_dirty()
    }

    pub fn glyph_count(&self) -> usize {
        self.cache.len()
    }

    /// Atlas generation; characters built under an older one are stale.
    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    /// Forget every glyph. Texts rebuild their characters on their next edit.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::FixedRasterizer;

    #[test]
    fn test_create_char_and_lookup() {
        let mut fonts = FontFamily::new(FixedRasterizer::new(), AtlasConfig::default());
        assert!(fonts.glyph(FontType::Regular, 20, 'A').is_none());
        assert!(fonts.create_char(FontType::Regular, 20, 'A'));
        let m = fonts.glyph(FontType::Regular, 20, 'A').unwrap();
        assert_eq!(m.advance, 10);
        assert_eq!(fonts.glyph_count(), 1);
        assert!(fonts.take_dirty());
    }

    #[test]
    fn test_texture_coordinate() {
        let mut fonts = FontFamily::new(
            FixedRasterizer::new(),
            AtlasConfig {
                width: 100,
                height: 100,
                ..Default::default()
            },
        );
        assert!(fonts.texture_coordinate(FontType::Regular, 20, 'A').is_none());
        fonts.create_char(FontType::Regular, 20, 'A');
        let t = fonts.texture_coordinate(FontType::Regular, 20, 'A').unwrap();
        assert_eq!(t.min_x, 0.0);
        assert!((t.max_x - 0.08).abs() < 1e-6);
        assert!((t.max_y - 0.14).abs() < 1e-6);
        assert_eq!(fonts.texture().len(), 100 * 100);
    }

    #[test]
    fn test_vertical_metrics_forwarded() {
        let mut fonts = FontFamily::new(
            FixedRasterizer::new().with_kerning('T', 'o', -2),
            AtlasConfig::default(),
        );
        assert_eq!(fonts.ascender(20, FontType::Regular), 16);
        assert_eq!(fonts.descender(20, FontType::Regular), -4);
        assert_eq!(fonts.kerning('T', 'o', 20, FontType::Regular), -2);
    }

    #[test]
    fn test_layout_metrics_survive_full_atlas() {
        let mut fonts = FontFamily::new(
            FixedRasterizer::new().with_unsupported('~'),
            AtlasConfig {
                width: 32,
                height: 32,
                ..Default::default()
            },
        );
        // 40x70 at size 100 never fits.
        let m = fonts.layout_metrics(FontType::Regular, 100, 'A').unwrap();
        assert_eq!(m.advance, 50);
        assert!(fonts.glyph(FontType::Regular, 100, 'A').is_none());
        assert!(fonts.texture_coordinate(FontType::Regular, 100, 'A').is_none());
        assert!(fonts.layout_metrics(FontType::Regular, 10, '~').is_none());
    }

    #[test]
    fn test_clear() {
        let mut fonts = FontFamily::new(FixedRasterizer::new(), AtlasConfig::default());
        fonts.create_char(FontType::Regular, 20, 'A');
        let before = fonts.generation();
        fonts.clear();
        assert_ne!(fonts.generation(), before);
        assert_eq!(fonts.glyph_count(), 0);
        assert!(fonts.glyph(FontType::Regular, 20, 'A').is_none());
    }
}
