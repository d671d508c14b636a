//! Vertex, texture-coordinate, color and index buffers for laid-out text.
//!
//! One quad per visible glyph; whitespace, newlines, tag delimiters and
//! glyphs that failed to rasterize contribute nothing. Quads are emitted
//! top-left, top-right, bottom-left, bottom-right and indexed as two
//! triangles with [`QUAD_INDICES`].
//!
//! With auto-grow enabled the vertex-side buffers hold one quad slot per
//! character, or `grow_size` slots if that is larger, zero-filled past the
//! live quads so small edits do not reallocate.
//! The index buffer only ever covers live quads.

use bytemuck::{Pod, Zeroable};

use crate::character::Character;
use crate::layout::LineMetaData;

/// Triangle indices for one quad.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 1, 3];

/// Interleaved vertex for upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TextVertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
    /// RGBA color, each channel in [0.0, 1.0].
    pub color: [f32; 4],
}

/// Dimmed grayscale used for disabled text.
pub fn disabled_color(color: [f32; 4]) -> [f32; 4] {
    let [r, g, b, a] = color;
    let gray = (0.299 * r + 0.587 * g + 0.114 * b) * 0.6;
    [gray, gray, gray, a]
}

/// Borrowed view of the buffers for one draw call.
#[derive(Clone, Copy, Debug)]
pub struct GeometryDrawData<'a> {
    pub positions: &'a [[f32; 2]],
    pub tex_coords: &'a [[f32; 2]],
    pub colors: &'a [[f32; 4]],
    pub indices: &'a [u32],
    /// Live vertices (padding excluded).
    pub vertex_count: usize,
    /// Draw-time translation (justification).
    pub offset: [f32; 2],
}

impl<'a> GeometryDrawData<'a> {
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn position_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.positions)
    }

    pub fn tex_coord_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.tex_coords)
    }

    pub fn color_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.colors)
    }

    pub fn index_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.indices)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryBuilder {
    positions: Vec<[f32; 2]>,
    tex_coords: Vec<[f32; 2]>,
    colors: Vec<[f32; 4]>,
    indices: Vec<u32>,
    quad_count: usize,
    auto_grow: bool,
    grow_size: usize,
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the vertex buffers for `max(characters, grow_size)` quads while `enabled`.
    pub fn set_auto_grow(&mut self, enabled: bool, grow_size: usize) {
        self.auto_grow = enabled;
        self.grow_size = grow_size;
    }

    pub fn rebuild(
        &mut self,
        characters: &[Character],
        lines: &[LineMetaData],
        default_color: [f32; 4],
        disabled: bool,
    ) {
        self.positions.clear();
        self.tex_coords.clear();
        self.colors.clear();
        self.indices.clear();
        self.quad_count = 0;

        for ch in characters.iter().filter(|c| c.has_geometry()) {
            let Some(line) = lines.get(ch.line_order) else {
                continue;
            };
            let b = ch
                .bounds
                .translate(line.alignment_offset + ch.aligned_kerning, line.baseline);
            let t = ch.tex_coords;

            self.positions.extend_from_slice(&[
                [b.min_x, b.min_y],
                [b.max_x, b.min_y],
                [b.min_x, b.max_y],
                [b.max_x, b.max_y],
            ]);
            self.tex_coords.extend_from_slice(&[
                [t.min_x, t.min_y],
                [t.max_x, t.min_y],
                [t.min_x, t.max_y],
                [t.max_x, t.max_y],
            ]);

            let mut color = ch.color.unwrap_or(default_color);
            if disabled {
                color = disabled_color(color);
            }
            self.colors.extend_from_slice(&[color; 4]);

            let base = (self.quad_count * 4) as u32;
            self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
            self.quad_count += 1;
        }

        let slots = if self.auto_grow {
            characters.len().max(self.grow_size)
        } else {
            self.quad_count
        };
        self.positions.resize(slots * 4, [0.0; 2]);
        self.tex_coords.resize(slots * 4, [0.0; 2]);
        self.colors.resize(slots * 4, [0.0; 4]);
    }

    /// Live quads.
    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    /// Quad slots in the vertex buffers, padding included.
    pub fn slot_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn vertex_data(&self) -> &[[f32; 2]] {
        &self.positions
    }

    pub fn tex_coord_data(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    pub fn color_data(&self) -> &[[f32; 4]] {
        &self.colors
    }

    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }

    pub fn draw_data(&self, offset: [f32; 2]) -> GeometryDrawData<'_> {
        GeometryDrawData {
            positions: &self.positions,
            tex_coords: &self.tex_coords,
            colors: &self.colors,
            indices: &self.indices,
            vertex_count: self.quad_count * 4,
            offset,
        }
    }

    /// Live vertices as interleaved records.
    pub fn interleaved(&self) -> Vec<TextVertex> {
        (0..self.quad_count * 4)
            .map(|i| TextVertex {
                position: self.positions[i],
                tex_coord: self.tex_coords[i],
                color: self.colors[i],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::AtlasConfig;
    use crate::character::CharacterBuilder;
    use crate::font::FontFamily;
    use crate::layout::{horizontal_pass, vertical_pass, LayoutParams};
    use crate::raster::FixedRasterizer;
    use crate::style::ResolvedStyle;
    use crate::types::FontType;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    fn laid_out(text: &str) -> (Vec<Character>, Vec<LineMetaData>) {
        let mut fonts = FontFamily::new(FixedRasterizer::new(), AtlasConfig::default());
        let style = ResolvedStyle::plain(FontType::Regular, 20);
        let mut chars: Vec<Character> = text
            .chars()
            .map(|cp| CharacterBuilder::default().build(&mut fonts, cp, &style, false))
            .collect();
        let words = horizontal_pass(&mut chars, &mut fonts);
        let params = LayoutParams {
            size: 20,
            ..Default::default()
        };
        let lines = vertical_pass(&mut chars, &words, &mut fonts, &params);
        (chars, lines)
    }

    #[test]
    fn test_one_quad_per_visible_glyph() {
        let (chars, lines) = laid_out("ab c\nd");
        let mut geometry = GeometryBuilder::new();
        geometry.rebuild(&chars, &lines, WHITE, false);
        assert_eq!(geometry.quad_count(), 4);
        assert_eq!(geometry.vertex_data().len(), 16);
        assert_eq!(geometry.tex_coord_data().len(), 16);
        assert_eq!(geometry.color_data().len(), 16);
        assert_eq!(geometry.index_data().len(), 24);
        assert_eq!(&geometry.index_data()[6..12], &[4, 5, 6, 6, 5, 7]);
    }

    #[test]
    fn test_positions_follow_baseline_and_kerning() {
        let (chars, lines) = laid_out("AB\nC");
        let mut geometry = GeometryBuilder::new();
        geometry.rebuild(&chars, &lines, WHITE, false);
        let v = geometry.vertex_data();
        // 'A': bounds (1,-14)-(9,0) on baseline 16.
        assert_eq!(v[0], [1.0, 2.0]);
        assert_eq!(v[3], [9.0, 16.0]);
        // 'B' is one advance further.
        assert_eq!(v[4], [11.0, 2.0]);
        // 'C' starts line 2 at x = 0, baseline 36.
        assert_eq!(v[8], [1.0, 22.0]);
    }

    #[test]
    fn test_colors_and_disabled_state() {
        let (mut chars, lines) = laid_out("ab");
        chars[1].color = Some([1.0, 0.0, 0.0, 1.0]);
        let mut geometry = GeometryBuilder::new();
        geometry.rebuild(&chars, &lines, WHITE, false);
        assert_eq!(geometry.color_data()[0], WHITE);
        assert_eq!(geometry.color_data()[4], [1.0, 0.0, 0.0, 1.0]);

        geometry.rebuild(&chars, &lines, WHITE, true);
        let c = geometry.color_data()[0];
        assert!(c[0] < 1.0);
        assert_eq!(c[0], c[1]);
        assert_eq!(c[3], 1.0);
    }

    #[test]
    fn test_auto_grow_pads_and_keeps_floor() {
        let mut geometry = GeometryBuilder::new();
        geometry.set_auto_grow(true, 8);

        let (chars, lines) = laid_out("abc");
        geometry.rebuild(&chars, &lines, WHITE, false);
        assert_eq!(geometry.quad_count(), 3);
        assert_eq!(geometry.slot_count(), 8);
        assert_eq!(geometry.vertex_data().len(), 32);
        assert_eq!(geometry.index_data().len(), 18);
        assert_eq!(geometry.vertex_data()[31], [0.0, 0.0]);

        let (chars, lines) = laid_out("abcdefghij");
        geometry.rebuild(&chars, &lines, WHITE, false);
        assert_eq!(geometry.slot_count(), 10);

        let (chars, lines) = laid_out("a");
        geometry.rebuild(&chars, &lines, WHITE, false);
        assert_eq!(geometry.slot_count(), 8);
        assert_eq!(geometry.index_data().len(), 6);
    }

    #[test]
    fn test_auto_grow_counts_every_character() {
        let mut geometry = GeometryBuilder::new();
        geometry.set_auto_grow(true, 2);

        let (chars, lines) = laid_out("a b c");
        geometry.rebuild(&chars, &lines, WHITE, false);
        assert_eq!(geometry.quad_count(), 3);
        assert_eq!(geometry.slot_count(), 5);
        assert_eq!(geometry.vertex_data().len(), 20);
        assert_eq!(geometry.color_data().len(), 20);
        assert_eq!(geometry.index_data().len(), 18);
        assert!(geometry.index_data().iter().all(|&i| i < 12));
    }

    #[test]
    fn test_draw_data_and_interleaved() {
        let (chars, lines) = laid_out("ab");
        let mut geometry = GeometryBuilder::new();
        geometry.set_auto_grow(true, 4);
        geometry.rebuild(&chars, &lines, WHITE, false);

        let draw = geometry.draw_data([5.0, 0.0]);
        assert_eq!(draw.vertex_count, 8);
        assert_eq!(draw.index_count(), 12);
        assert_eq!(draw.offset, [5.0, 0.0]);
        assert_eq!(draw.position_bytes().len(), 16 * 8);
        assert_eq!(draw.index_bytes().len(), 12 * 4);

        let vertices = geometry.interleaved();
        assert_eq!(vertices.len(), 8);
        assert_eq!(vertices[0].position, geometry.vertex_data()[0]);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 8 * std::mem::size_of::<TextVertex>());
    }
}
