//! Per-character records and the builder that derives them from glyphs.

use crate::cache::GlyphKey;
use crate::font::FontFamily;
use crate::style::ResolvedStyle;
use crate::types::{FontType, Rect};

/// What a character is, as far as layout and geometry care.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharacterKind {
    /// Printable character with (potentially) visible ink.
    Glyph,
    /// Advance-only whitespace.
    Space,
    /// Explicit line break.
    Newline,
    /// Any other codepoint below 32.
    Control,
    /// Part of a `<Name>` or `</>` style delimiter.
    TagDelimiter,
}

impl CharacterKind {
    pub fn classify(codepoint: char, tag_delimiter: bool) -> Self {
        if tag_delimiter {
            CharacterKind::TagDelimiter
        } else if codepoint == '\n' {
            CharacterKind::Newline
        } else if (codepoint as u32) < 32 {
            CharacterKind::Control
        } else if codepoint == ' ' {
            CharacterKind::Space
        } else {
            CharacterKind::Glyph
        }
    }

    /// Kinds that never produce a glyph.
    pub fn is_ignored(self) -> bool {
        matches!(
            self,
            CharacterKind::Newline | CharacterKind::Control | CharacterKind::TagDelimiter
        )
    }
}

/// A positioned character.
#[derive(Clone, Debug, PartialEq)]
pub struct Character {
    pub codepoint: char,
    pub kind: CharacterKind,
    /// Index in the character sequence.
    pub character_order: usize,
    pub word_order: usize,
    pub line_order: usize,
    pub size: u32,
    pub font_type: FontType,
    /// Registered style index, `None` when the text defaults apply.
    pub style: Option<usize>,
    pub color: Option<[f32; 4]>,
    pub ascender: f32,
    /// Negative.
    pub descender: f32,
    pub xadvance: f32,
    pub left_bearing: f32,
    /// Local quad relative to the pen origin on the baseline.
    pub bounds: Rect,
    /// Normalized atlas rect.
    pub tex_coords: Rect,
    /// Tag delimiters, newlines and controls carry no glyph.
    pub ignore: bool,
    /// Pen position along the whole text, kerning included.
    pub kerning: f32,
    /// `kerning` relative to the start of the character's line.
    pub aligned_kerning: f32,
    /// Key of the cached glyph, if it was placed in the atlas.
    pub glyph: Option<GlyphKey>,
    /// Atlas generation the record was built under.
    pub generation: u64,
}

impl Character {
    fn blank(codepoint: char, kind: CharacterKind, style: &ResolvedStyle) -> Self {
        Self {
            codepoint,
            kind,
            character_order: 0,
            word_order: 0,
            line_order: 0,
            size: style.size,
            font_type: style.font_type,
            style: style.style,
            color: style.color,
            ascender: 0.0,
            descender: 0.0,
            xadvance: 0.0,
            left_bearing: 0.0,
            bounds: Rect::ZERO,
            tex_coords: Rect::ZERO,
            ignore: kind.is_ignored(),
            kerning: 0.0,
            aligned_kerning: 0.0,
            glyph: None,
            generation: 0,
        }
    }

    pub fn is_newline(&self) -> bool {
        self.kind == CharacterKind::Newline
    }

    pub fn is_space(&self) -> bool {
        self.kind == CharacterKind::Space
    }

    /// Whether this character emits a quad. Inkless glyphs such as U+00A0
    /// only advance the pen.
    pub fn has_geometry(&self) -> bool {
        self.kind == CharacterKind::Glyph
            && self.glyph.is_some()
            && !self.bounds.is_empty()
            && !self.tex_coords.is_empty()
    }

    /// Whether a rebuild with these inputs would produce the same record.
    pub fn is_built_from(&self, codepoint: char, style: &ResolvedStyle, tag_delimiter: bool) -> bool {
        self.codepoint == codepoint
            && self.kind == CharacterKind::classify(codepoint, tag_delimiter)
            && self.size == style.size
            && self.font_type == style.font_type
            && self.style == style.style
            && self.color == style.color
    }
}

/// Turns (codepoint, style) into a [`Character`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CharacterBuilder {
    /// Margin added around every quad and its texture rect, in pixels.
    pub padding: f32,
    /// Replaces the font's advance for the space character.
    pub default_space_width: Option<f32>,
}

impl CharacterBuilder {
    pub fn build(
        &self,
        fonts: &mut FontFamily,
        codepoint: char,
        style: &ResolvedStyle,
        tag_delimiter: bool,
    ) -> Character {
        let kind = CharacterKind::classify(codepoint, tag_delimiter);
        let mut character = Character::blank(codepoint, kind, style);
        character.ascender = fonts.ascender(style.size, style.font_type) as f32;
        character.descender = fonts.descender(style.size, style.font_type) as f32;
        character.generation = fonts.generation();
        if character.ignore {
            return character;
        }

        // Unsupported codepoints stay empty.
        let Some(metrics) = fonts.layout_metrics(style.font_type, style.size, codepoint) else {
            return character;
        };

        let advance = match (kind, self.default_space_width) {
            (CharacterKind::Space, Some(width)) => width,
            _ => metrics.advance as f32,
        };
        let bearing_x = metrics.bearing_x as f32;
        let bearing_y = metrics.bearing_y as f32;
        character.xadvance = advance;
        character.left_bearing = bearing_x;

        // A glyph the atlas rejected still advances the pen, without a quad.
        if fonts.glyph(style.font_type, style.size, codepoint).is_none() {
            return character;
        }

        let mut bounds = Rect::new(
            bearing_x,
            -bearing_y,
            bearing_x + metrics.width as f32,
            metrics.height as f32 - bearing_y,
        );
        if bounds.width() <= 0.0 {
            bounds.max_x = bounds.min_x + advance;
        }
        if bounds.height() <= 0.0 {
            bounds.max_y += 1.0;
        }

        let mut tex_coords = fonts
            .texture_coordinate(style.font_type, style.size, codepoint)
            .unwrap_or_default();
        if self.padding > 0.0 {
            bounds = bounds.expand(self.padding, self.padding);
            if !tex_coords.is_empty() {
                // Texel padding stays inside the spacing gutter of the cell.
                let atlas = fonts.atlas();
                let config = atlas.config();
                let pad_x = self.padding.min(config.horizontal_spacing as f32);
                let pad_y = self.padding.min(config.vertical_spacing as f32);
                tex_coords = tex_coords
                    .expand(pad_x / atlas.width() as f32, pad_y / atlas.height() as f32)
                    .intersect(&Rect::new(0.0, 0.0, 1.0, 1.0));
            }
        }

        character.bounds = bounds;
        character.tex_coords = tex_coords;
        character.glyph = Some(GlyphKey::new(style.font_type, style.size, codepoint));
        character
    }
}
