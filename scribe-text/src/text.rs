//! Text owner: edits, settings, queries for one block of text.
//!
//! Every mutation runs the whole pipeline before returning:
//!
//! ```text
//! edit ──► parse_runs ──► CharacterBuilder (new/changed characters only)
//!                               │
//!                               ▼
//!          horizontal_pass ──► vertical_pass ──► BoundsCache ──► GeometryBuilder
//! ```
//!
//! Layout always covers the entire sequence: pen positions and line
//! membership depend on neighbouring characters, so patching a single
//! line would leave the baselines of the following lines stale.

use std::ops::Range;

use crate::bounds::BoundsCache;
use crate::character::{Character, CharacterBuilder};
use crate::config::{sanitize_line_height, TextConfig};
use crate::error::{TextError, TextResult};
use crate::font::FontFamily;
use crate::geometry::{GeometryBuilder, GeometryDrawData, TextVertex};
use crate::layout::{apply_alignment, horizontal_pass, vertical_pass, LayoutParams, LineMetaData, WordMetaData};
use crate::parser::parse_runs;
use crate::style::{ResolvedStyle, TextStyle};
use crate::types::{FontType, Justify, Rect};

pub struct Text {
    config: TextConfig,
    /// Width of the owning widget box, if known.
    box_width: Option<f32>,
    disabled: bool,
    /// Raw codepoints, tags included.
    source: Vec<char>,
    styles: Vec<TextStyle>,
    characters: Vec<Character>,
    words: Vec<WordMetaData>,
    lines: Vec<LineMetaData>,
    bounds: BoundsCache,
    geometry: GeometryBuilder,
}

impl Default for Text {
    fn default() -> Self {
        Self::new(TextConfig::default())
    }
}

impl Text {
    pub fn new(mut config: TextConfig) -> Self {
        config.line_height_percentage = sanitize_line_height(config.line_height_percentage);
        let mut geometry = GeometryBuilder::new();
        geometry.set_auto_grow(config.auto_grow_vertices, config.auto_grow_size);
        Self {
            config,
            box_width: None,
            disabled: false,
            source: Vec::new(),
            styles: Vec::new(),
            characters: Vec::new(),
            words: Vec::new(),
            lines: Vec::new(),
            bounds: BoundsCache::new(),
            geometry,
        }
    }

    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Edits
    // ---------------------------------------------------------------

    pub fn set_text(&mut self, fonts: &mut FontFamily, text: &str) {
        self.source = text.chars().collect();
        self.rebuild(fonts, Vec::new());
    }

    pub fn append_text(&mut self, fonts: &mut FontFamily, text: &str) {
        let previous = self.take_characters();
        self.source.extend(text.chars());
        self.rebuild(fonts, previous);
    }

    /// Insert `codepoint` before `index` (`index == len` appends).
    pub fn add_char(&mut self, fonts: &mut FontFamily, index: usize, codepoint: char) -> TextResult<()> {
        let len = self.source.len();
        if index > len {
            return Err(TextError::InvalidIndex { index, len });
        }
        let mut previous = self.take_characters();
        previous.insert(index, None);
        self.source.insert(index, codepoint);
        self.rebuild(fonts, previous);
        Ok(())
    }

    pub fn remove_char(&mut self, fonts: &mut FontFamily, index: usize) -> TextResult<char> {
        let len = self.source.len();
        if index >= len {
            return Err(TextError::InvalidIndex { index, len });
        }
        let mut previous = self.take_characters();
        previous.remove(index);
        let removed = self.source.remove(index);
        self.rebuild(fonts, previous);
        Ok(removed)
    }

    pub fn remove_chars(&mut self, fonts: &mut FontFamily, range: Range<usize>) -> TextResult<()> {
        let len = self.source.len();
        if range.start > range.end || range.end > len {
            return Err(TextError::InvalidIndex {
                index: range.end.max(range.start),
                len,
            });
        }
        let mut previous = self.take_characters();
        previous.drain(range.clone());
        self.source.drain(range);
        self.rebuild(fonts, previous);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.source.clear();
        self.characters.clear();
        self.words.clear();
        self.lines.clear();
        self.bounds.recompute(&self.lines);
        self.regenerate_geometry();
    }

    // ---------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------

    pub fn set_auto_wrap_text(&mut self, fonts: &mut FontFamily, enabled: bool) {
        self.config.auto_wrap = enabled;
        self.relayout(fonts);
    }

    pub fn set_custom_wrap_width(&mut self, fonts: &mut FontFamily, width: Option<f32>) {
        self.config.custom_wrap_width = width;
        self.relayout(fonts);
    }

    /// Width of the owning box, used for justification and as the default
    /// wrap width.
    pub fn set_box_width(&mut self, fonts: &mut FontFamily, width: f32) {
        self.box_width = Some(width);
        self.relayout(fonts);
    }

    pub fn set_text_justify(&mut self, justify: Justify) {
        self.config.justify = justify;
        apply_alignment(&mut self.lines, justify);
        self.bounds.recompute(&self.lines);
        self.regenerate_geometry();
    }

    pub fn set_line_height_percentage(&mut self, fonts: &mut FontFamily, percentage: f32) {
        self.config.line_height_percentage = sanitize_line_height(percentage);
        self.relayout(fonts);
    }

    pub fn set_ascender_descender_power_of_two(&mut self, fonts: &mut FontFamily, enabled: bool) {
        self.config.ascender_descender_power_of_two = enabled;
        self.relayout(fonts);
    }

    pub fn set_auto_grow_vertices_size(&mut self, enabled: bool, size: usize) {
        self.config.auto_grow_vertices = enabled;
        self.config.auto_grow_size = size;
        self.geometry.set_auto_grow(enabled, size);
        self.regenerate_geometry();
    }

    pub fn set_default_space_width(&mut self, fonts: &mut FontFamily, width: Option<f32>) {
        self.config.default_space_width = width;
        self.rebuild(fonts, Vec::new());
    }

    pub fn set_padding(&mut self, fonts: &mut FontFamily, padding: f32) {
        self.config.padding = padding;
        self.rebuild(fonts, Vec::new());
    }

    /// Face and size used outside styled runs.
    pub fn set_font(&mut self, fonts: &mut FontFamily, font_type: FontType, size: u32) {
        self.config.font_type = font_type;
        self.config.size = size;
        let previous = self.take_characters();
        self.rebuild(fonts, previous);
    }

    pub fn set_default_color(&mut self, color: [f32; 4]) {
        self.config.color = color;
        self.regenerate_geometry();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.regenerate_geometry();
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Register a style, replacing any style with the same name.
    pub fn add_text_style(&mut self, fonts: &mut FontFamily, style: TextStyle) {
        match self.styles.iter_mut().find(|s| s.name == style.name) {
            Some(existing) => *existing = style,
            None => self.styles.push(style),
        }
        let previous = self.take_characters();
        self.rebuild(fonts, previous);
    }

    /// Unregister a style; its runs fall back to literal tags.
    pub fn remove_text_style(&mut self, fonts: &mut FontFamily, name: &str) -> bool {
        let Some(index) = self.styles.iter().position(|s| s.name == name) else {
            return false;
        };
        self.styles.remove(index);
        let previous = self.take_characters();
        self.rebuild(fonts, previous);
        true
    }

    pub fn styles(&self) -> &[TextStyle] {
        &self.styles
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// The text; with `filtered`, spaces, newlines and ignored characters
    /// are left out.
    pub fn text(&self, filtered: bool) -> String {
        if filtered {
            self.characters
                .iter()
                .filter(|c| !Self::filtered_out(c))
                .map(|c| c.codepoint)
                .collect()
        } else {
            self.source.iter().collect()
        }
    }

    /// Number of characters in [`Text::text`] with the same filter.
    pub fn text_size(&self, filtered: bool) -> usize {
        if filtered {
            self.characters.iter().filter(|c| !Self::filtered_out(c)).count()
        } else {
            self.source.len()
        }
    }

    fn filtered_out(c: &Character) -> bool {
        c.ignore || c.is_space()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_data(&self, index: usize) -> Option<&LineMetaData> {
        self.lines.get(index)
    }

    pub fn line_bounds(&self, index: usize) -> Option<Rect> {
        self.bounds.line(index)
    }

    pub fn character_data(&self, index: usize) -> Option<&Character> {
        self.characters.get(index)
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn words(&self) -> &[WordMetaData] {
        &self.words
    }

    pub fn lines(&self) -> &[LineMetaData] {
        &self.lines
    }

    /// Aggregate bounds of every line.
    pub fn bounds(&self) -> Rect {
        self.bounds.total()
    }

    /// Effective wrap width.
    pub fn wrap_width(&self) -> f32 {
        self.config
            .custom_wrap_width
            .or(self.box_width)
            .unwrap_or(f32::INFINITY)
    }

    /// Draw-time horizontal shift within the owning box.
    pub fn justify_offset(&self) -> f32 {
        self.box_width
            .map_or(0.0, |w| self.bounds.justify_offset(w, self.config.justify))
    }

    // ---------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------

    pub fn vertex_data(&self) -> &[[f32; 2]] {
        self.geometry.vertex_data()
    }

    pub fn tex_coord_data(&self) -> &[[f32; 2]] {
        self.geometry.tex_coord_data()
    }

    pub fn color_data(&self) -> &[[f32; 4]] {
        self.geometry.color_data()
    }

    pub fn index_data(&self) -> &[u32] {
        self.geometry.index_data()
    }

    pub fn geometry_draw_data(&self) -> GeometryDrawData<'_> {
        self.geometry.draw_data([self.justify_offset(), 0.0])
    }

    pub fn interleaved_vertices(&self) -> Vec<TextVertex> {
        self.geometry.interleaved()
    }

    // ---------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------

    fn take_characters(&mut self) -> Vec<Option<Character>> {
        std::mem::take(&mut self.characters)
            .into_iter()
            .map(Some)
            .collect()
    }

    fn resolve_style(&self, index: Option<usize>) -> ResolvedStyle {
        match index.and_then(|i| self.styles.get(i).map(|s| (i, s))) {
            Some((i, style)) => ResolvedStyle {
                font_type: style.font_type,
                size: style.size,
                color: style.color,
                style: Some(i),
            },
            None => ResolvedStyle::plain(self.config.font_type, self.config.size),
        }
    }

    /// Re-tag and rebuild characters, reusing `previous[i]` when it was
    /// built from the same inputs against the current atlas.
    fn rebuild(&mut self, fonts: &mut FontFamily, mut previous: Vec<Option<Character>>) {
        let tags = parse_runs(&self.source, &self.styles);
        let builder = CharacterBuilder {
            padding: self.config.padding,
            default_space_width: self.config.default_space_width,
        };

        let generation = fonts.generation();
        let mut reused = 0usize;
        let mut characters = Vec::with_capacity(self.source.len());
        for (i, &codepoint) in self.source.iter().enumerate() {
            let style = self.resolve_style(tags.styles[i]);
            let ignore = tags.ignore[i];
            let cached = previous
                .get_mut(i)
                .and_then(Option::take)
                .filter(|c| c.generation == generation && c.is_built_from(codepoint, &style, ignore));

            let mut character = match cached {
                Some(c) => {
                    reused += 1;
                    c
                }
                None => builder.build(fonts, codepoint, &style, ignore),
            };
            character.character_order = i;
            characters.push(character);
        }

        log::trace!(
            "text: built {} characters, reused {reused}",
            characters.len() - reused
        );
        self.characters = characters;
        self.relayout(fonts);
    }

    fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            auto_wrap: self.config.auto_wrap,
            wrap_width: self.wrap_width(),
            line_height_percentage: self.config.line_height_percentage,
            power_of_two: self.config.ascender_descender_power_of_two,
            justify: self.config.justify,
            font_type: self.config.font_type,
            size: self.config.size,
        }
    }

    fn relayout(&mut self, fonts: &mut FontFamily) {
        self.words = horizontal_pass(&mut self.characters, fonts);
        let params = self.layout_params();
        self.lines = vertical_pass(&mut self.characters, &self.words, fonts, &params);
        self.bounds.recompute(&self.lines);
        self.regenerate_geometry();

        log::debug!(
            "text: laid out {} characters in {} words, {} lines",
            self.characters.len(),
            self.words.len(),
            self.lines.len()
        );
    }

    fn regenerate_geometry(&mut self) {
        self.geometry
            .rebuild(&self.characters, &self.lines, self.config.color, self.disabled);
    }
}

// ===================================================================
// Tests
// ===================================================================
