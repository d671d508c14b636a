//! Glyph atlas: CPU-side single-channel texture for glyph bitmaps.
//!
//! Uses an append-only shelf packer. A pen cursor moves left to right
//! along the current shelf; when a bitmap does not fit horizontally a new
//! shelf is opened below the tallest glyph seen so far. The pen never
//! rewinds and nothing is ever reclaimed: once the next shelf would cross
//! the bottom edge the atlas reports [`TextError::AtlasFull`].
//!
//! The pixel buffer (`width * height` bytes, one coverage byte per texel)
//! is exported through [`GlyphAtlas::texture`] for upload to the GPU.

use serde::{Deserialize, Serialize};

use crate::error::{TextError, TextResult};
use crate::raster::RasterizedGlyph;
use crate::types::Rect;

/// Atlas dimensions and packing knobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// Gap left after every glyph on a shelf.
    pub horizontal_spacing: u32,
    /// Gap left between two shelves.
    pub vertical_spacing: u32,
    /// Place glyphs baseline-aligned inside their shelf (see [`AtlasRegion::align_offset`]).
    pub vertical_alignment: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            width: 2048,
            height: 2048,
            horizontal_spacing: 1,
            vertical_spacing: 1,
            vertical_alignment: false,
        }
    }
}

/// Top-left texel of a placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PenLocation {
    pub x: u32,
    pub y: u32,
}

/// A glyph's pixel rectangle inside the atlas. Immutable once allocated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AtlasRegion {
    /// Pen location of the reserved cell.
    pub x: u32,
    pub y: u32,
    /// Bitmap dimensions.
    pub width: u32,
    pub height: u32,
    /// Row stride of the source bitmap.
    pub pitch: u32,
    /// Rows reserved above the bitmap so its top bearing lines up with the
    /// font ascender. Zero unless vertical alignment is enabled.
    pub align_offset: u32,
}

impl AtlasRegion {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// CPU-side glyph texture atlas.
pub struct GlyphAtlas {
    config: AtlasConfig,
    /// Coverage data, `width * height` bytes.
    data: Vec<u8>,
    /// Whether data has changed since the last upload.
    dirty: bool,
    pen_x: u32,
    pen_y: u32,
    /// Bottom edge of the tallest placement so far.
    shelf_max_height: u32,
    placed: usize,
}

impl GlyphAtlas {
    pub fn new(config: AtlasConfig) -> Self {
        let pixel_count = config.width as usize * config.height as usize;
        Self {
            config,
            data: vec![0u8; pixel_count],
            dirty: false,
            pen_x: 0,
            pen_y: 0,
            shelf_max_height: 0,
            placed: 0,
        }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// The whole pixel buffer, row-major.
    pub fn texture(&self) -> &[u8] {
        &self.data
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Report and reset the upload flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Number of successful placements.
    pub fn placed_count(&self) -> usize {
        self.placed
    }

    /// Where the next placement on the current shelf would start.
    pub fn pen(&self) -> PenLocation {
        PenLocation {
            x: self.pen_x,
            y: self.pen_y,
        }
    }

    /// Reserve a `width` x `height` cell.
    ///
    /// On failure the allocator state is left untouched.
    pub fn place(&mut self, width: u32, height: u32) -> TextResult<PenLocation> {
        let full = TextError::AtlasFull { width, height };
        if width > self.config.width {
            return Err(full);
        }

        let (mut x, mut y) = (self.pen_x, self.pen_y);
        if x.saturating_add(width) > self.config.width {
            x = 0;
            y = self
                .shelf_max_height
                .saturating_add(self.config.vertical_spacing);
        }

        let shelf_max_height = self.shelf_max_height.max(y.saturating_add(height));
        if shelf_max_height > self.config.height {
            return Err(full);
        }

        self.shelf_max_height = shelf_max_height;
        self.pen_y = y;
        self.pen_x = x
            .saturating_add(width)
            .saturating_add(self.config.horizontal_spacing);
        self.placed += 1;

        log::trace!("atlas: placed {width}x{height} at ({x}, {y})");
        Ok(PenLocation { x, y })
    }

    /// Place a rasterized bitmap and copy its rows into the buffer.
    ///
    /// Bitmaps without ink take no space and yield an empty region.
    pub fn insert(&mut self, glyph: &RasterizedGlyph, align_offset: u32) -> TextResult<AtlasRegion> {
        if glyph.is_empty() {
            return Ok(AtlasRegion::default());
        }

        let pen = self.place(glyph.width, glyph.height + align_offset)?;
        let region = AtlasRegion {
            x: pen.x,
            y: pen.y,
            width: glyph.width,
            height: glyph.height,
            pitch: glyph.pitch.max(glyph.width),
            align_offset,
        };
        self.blit(&region, &glyph.pixels);
        self.dirty = true;
        Ok(region)
    }

    /// Normalized texture coordinates of a region's ink.
    pub fn tex_rect(&self, region: &AtlasRegion) -> Rect {
        if region.is_empty() {
            return Rect::ZERO;
        }
        let inv_w = 1.0 / self.config.width as f32;
        let inv_h = 1.0 / self.config.height as f32;
        let top = region.y + region.align_offset;
        Rect::new(
            region.x as f32 * inv_w,
            top as f32 * inv_h,
            (region.x + region.width) as f32 * inv_w,
            (top + region.height) as f32 * inv_h,
        )
    }

    /// Read a region's bitmap back out of the atlas (tightly packed rows).
    pub fn region_pixels(&self, region: &AtlasRegion) -> Vec<u8> {
        let mut out = Vec::with_capacity((region.width * region.height) as usize);
        let stride = self.config.width as usize;
        for row in 0..region.height {
            let start = (region.y + region.align_offset + row) as usize * stride + region.x as usize;
            if let Some(src) = self.data.get(start..start + region.width as usize) {
                out.extend_from_slice(src);
            }
        }
        out
    }

    /// Drop every glyph and rewind the pen.
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.pen_x = 0;
        self.pen_y = 0;
        self.shelf_max_height = 0;
        self.placed = 0;
        self.dirty = true;
    }

    // ---------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------

    /// Copy bitmap rows into the atlas, honouring the source pitch.
    fn blit(&mut self, region: &AtlasRegion, pixels: &[u8]) {
        let stride = self.config.width as usize;
        let width = region.width as usize;
        let pitch = region.pitch as usize;

        for row in 0..region.height as usize {
            let Some(src) = pixels.get(row * pitch..row * pitch + width) else {
                break;
            };
            let dst_y = (region.y + region.align_offset) as usize + row;
            let dst = dst_y * stride + region.x as usize;
            if let Some(dst) = self.data.get_mut(dst..dst + width) {
                dst.copy_from_slice(src);
            }
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
