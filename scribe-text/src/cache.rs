//! Glyph cache: memoizes rasterizer output and atlas placement.
//!
//! The cache is the sole owner of every [`AtlasRegion`]; regions live in
//! an arena and glyph metrics refer to them by [`RegionId`]. Entries are
//! never evicted. Failures are memoized as well, so a glyph that does not
//! fit (or does not exist) is rasterized at most once. A glyph that
//! rasterized but did not fit keeps its metrics (with an empty region) so
//! layout can still advance past it.

use rustc_hash::FxHashMap;

use crate::atlas::{AtlasConfig, AtlasRegion, GlyphAtlas};
use crate::error::{TextError, TextResult};
use crate::raster::GlyphRasterizer;
use crate::types::FontType;

/// Cache key: one glyph per (font type, pixel size, codepoint).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    pub font_type: FontType,
    pub size: u32,
    pub codepoint: char,
}

impl GlyphKey {
    pub fn new(font_type: FontType, size: u32, codepoint: char) -> Self {
        Self {
            font_type,
            size,
            codepoint,
        }
    }
}

/// Index of a region in the cache's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionId(usize);

impl RegionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Pixel metrics of a cached glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub width: u32,
    pub height: u32,
    pub bearing_x: i32,
    pub bearing_y: i32,
    pub advance: i32,
    pub region: RegionId,
}

pub struct GlyphCache {
    atlas: GlyphAtlas,
    regions: Vec<AtlasRegion>,
    glyphs: FxHashMap<GlyphKey, GlyphMetrics>,
    failures: FxHashMap<GlyphKey, TextError>,
    /// Metrics of glyphs rejected with `AtlasFull`.
    unplaced: FxHashMap<GlyphKey, GlyphMetrics>,
    /// Bumped by every `clear`.
    generation: u64,
}

impl GlyphCache {
    pub fn new(config: AtlasConfig) -> Self {
        Self {
            atlas: GlyphAtlas::new(config),
            regions: Vec::new(),
            glyphs: FxHashMap::default(),
            failures: FxHashMap::default(),
            unplaced: FxHashMap::default(),
            generation: 0,
        }
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    pub fn atlas_mut(&mut self) -> &mut GlyphAtlas {
        &mut self.atlas
    }

    /// Number of cached glyphs.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, key: &GlyphKey) -> Option<&GlyphMetrics> {
        self.glyphs.get(key)
    }

    pub fn region(&self, id: RegionId) -> Option<&AtlasRegion> {
        self.regions.get(id.0)
    }

    /// Metrics of a glyph that rasterized but did not fit in the atlas.
    pub fn unplaced(&self, key: &GlyphKey) -> Option<&GlyphMetrics> {
        self.unplaced.get(key)
    }

    /// Changes whenever previously returned regions become invalid.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Return the cached glyph for `key`, creating it on first use.
    pub fn find_or_create(
        &mut self,
        rasterizer: &mut dyn GlyphRasterizer,
        key: GlyphKey,
    ) -> TextResult<&GlyphMetrics> {
        if self.glyphs.contains_key(&key) {
            return Ok(&self.glyphs[&key]);
        }
        if let Some(err) = self.failures.get(&key) {
            return Err(err.clone());
        }

        match self.create(rasterizer, key) {
            Ok(metrics) => {
                self.glyphs.insert(key, metrics);
                Ok(&self.glyphs[&key])
            }
            Err(err) => {
                log::warn!("glyph cache: {err}");
                self.failures.insert(key, err.clone());
                Err(err)
            }
        }
    }

    /// Drop every glyph, region and memoized failure, and reset the atlas.
    pub fn clear(&mut self) {
        self.glyphs.clear();
        self.failures.clear();
        self.unplaced.clear();
        self.regions.clear();
        self.atlas.clear();
        self.generation += 1;
    }

    fn create(&mut self, rasterizer: &mut dyn GlyphRasterizer, key: GlyphKey) -> TextResult<GlyphMetrics> {
        let glyph = rasterizer
            .rasterize(key.font_type, key.size, key.codepoint)
            .ok_or(TextError::UnsupportedCharacter {
                codepoint: key.codepoint,
                size: key.size,
                font_type: key.font_type,
            })?;

        let align_offset = if self.atlas.config().vertical_alignment {
            let ascender = rasterizer.ascender(key.size, key.font_type);
            (ascender - glyph.bearing_y).max(0) as u32
        } else {
            0
        };

        let placed = self.atlas.insert(&glyph, align_offset);
        let id = RegionId(self.regions.len());
        self.regions.push(placed.as_ref().copied().unwrap_or_default());

        let metrics = GlyphMetrics {
            width: glyph.width,
            height: glyph.height,
            bearing_x: glyph.bearing_x,
            bearing_y: glyph.bearing_y,
            advance: glyph.advance,
            region: id,
        };
        match placed {
            Ok(_) => Ok(metrics),
            Err(err) => {
                self.unplaced.insert(key, metrics);
                Err(err)
            }
        }
    }
}
