//! `GlyphRasterizer` backed by system fonts.

use std::num::NonZeroUsize;

use font_kit::canvas::{Canvas, Format, RasterizationOptions};
use font_kit::hinting::HintingOptions;
use font_kit::source::SystemSource;
use lru::LruCache;
use pathfinder_geometry::transform2d::Transform2F;
use rustc_hash::FxHashMap;
use scribe_text::{FontType, GlyphRasterizer, RasterizedGlyph};

use crate::registry::{load_face, FontError, FontSpec, LoadedFace};

/// Grayscale glyph source for the four faces of one family chain.
///
/// The regular face is mandatory; a missing bold or italic face falls back
/// to the closest face that did load.
pub struct SystemRasterizer {
    faces: FxHashMap<FontType, LoadedFace>,
    /// (face, left, right) → adjustment in font units.
    kerning_memo: LruCache<(FontType, char, char), i16>,
}

impl SystemRasterizer {
    pub fn new(spec: &FontSpec) -> Result<Self, FontError> {
        let source = SystemSource::new();
        let mut faces = FxHashMap::default();

        let regular = load_face(&source, spec, FontType::Regular)?;
        log::info!(
            "SystemRasterizer: regular face '{}' ({} units/em)",
            regular.family_name(),
            regular.units_per_em,
        );
        faces.insert(FontType::Regular, regular);

        for font_type in [FontType::Bold, FontType::Italic, FontType::BoldItalic] {
            match load_face(&source, spec, font_type) {
                Ok(face) => {
                    log::info!("SystemRasterizer: {font_type:?} face '{}'", face.family_name());
                    faces.insert(font_type, face);
                }
                Err(err) => log::warn!("SystemRasterizer: {err}; using fallback face"),
            }
        }

        let capacity = NonZeroUsize::new(spec.kerning_cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            faces,
            kerning_memo: LruCache::new(capacity),
        })
    }

    /// Face used for `font_type`, after fallback.
    fn face(&self, font_type: FontType) -> Option<&LoadedFace> {
        let fallbacks: &[FontType] = match font_type {
            FontType::Regular => &[FontType::Regular],
            FontType::Bold => &[FontType::Bold, FontType::Regular],
            FontType::Italic => &[FontType::Italic, FontType::Regular],
            FontType::BoldItalic => &[
                FontType::BoldItalic,
                FontType::Bold,
                FontType::Italic,
                FontType::Regular,
            ],
        };
        fallbacks.iter().find_map(|ft| self.faces.get(ft))
    }

    pub fn family_name(&self, font_type: FontType) -> Option<String> {
        self.face(font_type).map(LoadedFace::family_name)
    }

    fn render(face: &LoadedFace, size: u32, codepoint: char) -> Result<Option<RasterizedGlyph>, FontError> {
        let Some(glyph_id) = face.font.glyph_for_char(codepoint) else {
            return Ok(None);
        };
        let point_size = size as f32;
        let advance = (face.font.advance(glyph_id)?.x() * face.scale(size)).round() as i32;
        if codepoint.is_whitespace() {
            return Ok(Some(RasterizedGlyph::empty(advance)));
        }

        let bounds = face.font.raster_bounds(
            glyph_id,
            point_size,
            Transform2F::default(),
            HintingOptions::None,
            RasterizationOptions::GrayscaleAa,
        )?;
        if bounds.width() <= 0 || bounds.height() <= 0 {
            return Ok(Some(RasterizedGlyph::empty(advance)));
        }

        let mut canvas = Canvas::new(bounds.size(), Format::A8);
        face.font.rasterize_glyph(
            &mut canvas,
            glyph_id,
            point_size,
            Transform2F::from_translation(-bounds.origin().to_f32()),
            HintingOptions::None,
            RasterizationOptions::GrayscaleAa,
        )?;

        Ok(Some(RasterizedGlyph {
            width: bounds.width() as u32,
            height: bounds.height() as u32,
            pitch: canvas.stride as u32,
            bearing_x: bounds.origin_x(),
            bearing_y: -bounds.origin_y(),
            advance,
            pixels: canvas.pixels,
        }))
    }
}

impl GlyphRasterizer for SystemRasterizer {
    fn rasterize(&mut self, font_type: FontType, size: u32, codepoint: char) -> Option<RasterizedGlyph> {
        if (codepoint as u32) < 32 {
            return None;
        }
        let face = self.face(font_type)?;
        match Self::render(face, size, codepoint) {
            Ok(glyph) => glyph,
            Err(err) => {
                log::warn!("SystemRasterizer: {codepoint:?} at {size}px: {err}");
                None
            }
        }
    }

    fn kerning(&mut self, left: char, right: char, size: u32, font_type: FontType) -> i32 {
        let key = (font_type, left, right);
        let units = match self.kerning_memo.get(&key) {
            Some(&units) => units,
            None => {
                let units = self
                    .face(font_type)
                    .map_or(0, |face| face.pair_kerning(left, right));
                self.kerning_memo.put(key, units);
                units
            }
        };
        if units == 0 {
            return 0;
        }
        let scale = self.face(font_type).map_or(0.0, |face| face.scale(size));
        (units as f32 * scale).round() as i32
    }

    fn ascender(&mut self, size: u32, font_type: FontType) -> i32 {
        self.face(font_type)
            .map_or(0, |face| (face.ascent * face.scale(size)).ceil() as i32)
    }

    fn descender(&mut self, size: u32, font_type: FontType) -> i32 {
        self.face(font_type)
            .map_or(0, |face| (face.descent * face.scale(size)).floor() as i32)
    }
}

// ===================================================================
// Tests
// ===================================================================
