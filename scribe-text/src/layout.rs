//! Two-pass line layout.
//!
//! ```text
//! characters ──► horizontal_pass ──► pen positions + WordMetaData
//!                                          │
//!                vertical_pass ◄───────────┘
//!                      │
//!                      ▼
//!        line membership, baselines, LineMetaData
//! ```
//!
//! The horizontal pass ignores line breaks entirely: it walks the whole
//! text with a single pen, so a character's `kerning` is its absolute pen
//! position. The vertical pass then cuts that strip into lines and rebases
//! every line so its first character sits at x = 0 (`aligned_kerning`).

use crate::character::Character;
use crate::font::FontFamily;
use crate::types::{FontType, Justify};

/// A word as seen by the wrapper.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordMetaData {
    pub index: usize,
    /// Advance of the word, closing space included.
    pub width: f32,
    /// Width of every preceding word plus half of this one.
    pub horizontal_offset: f32,
}

/// A terminated line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetaData {
    pub index: usize,
    pub width: f32,
    pub ascender: f32,
    /// Negative.
    pub descender: f32,
    /// Distance from the top of the text to this line's baseline.
    pub baseline: f32,
    /// Justification of the line within the widest line.
    pub alignment_offset: f32,
}

impl LineMetaData {
    pub fn height(&self) -> f32 {
        self.ascender - self.descender
    }
}

/// Knobs consumed by the vertical pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    pub auto_wrap: bool,
    pub wrap_width: f32,
    pub line_height_percentage: f32,
    pub power_of_two: bool,
    pub justify: Justify,
    /// Font used for lines that contain no measurable character.
    pub font_type: FontType,
    pub size: u32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            auto_wrap: false,
            wrap_width: f32::INFINITY,
            line_height_percentage: 1.0,
            power_of_two: false,
            justify: Justify::Left,
            font_type: FontType::Regular,
            size: 16,
        }
    }
}

// ── Pass 1 ──────────────────────────────────────────────────────────

/// Position every character along one pen line and split it into words.
pub fn horizontal_pass(characters: &mut [Character], fonts: &mut FontFamily) -> Vec<WordMetaData> {
    let mut words = Vec::new();
    let mut cursor = 0.0f32;
    let mut previous_word_width = 0.0f32;
    let mut previous: Option<(char, FontType, u32)> = None;
    let last = characters.len().saturating_sub(1);

    for (i, ch) in characters.iter_mut().enumerate() {
        ch.word_order = words.len();

        if ch.is_newline() {
            ch.kerning = cursor;
            previous = None;
        } else if ch.ignore {
            ch.kerning = cursor;
        } else {
            if let Some((left, font_type, size)) = previous {
                if font_type == ch.font_type && size == ch.size {
                    cursor += fonts.kerning(left, ch.codepoint, ch.size, ch.font_type) as f32;
                }
            }
            ch.kerning = cursor;
            cursor += ch.xadvance;
            previous = Some((ch.codepoint, ch.font_type, ch.size));
        }

        if ch.is_space() || ch.is_newline() || i == last {
            let width = cursor - previous_word_width;
            words.push(WordMetaData {
                index: words.len(),
                width,
                horizontal_offset: previous_word_width + width / 2.0,
            });
            previous_word_width = cursor;
        }
    }

    words
}

// ── Pass 2 ──────────────────────────────────────────────────────────

/// Running state of the line being assembled.
struct LineAssembler {
    lines: Vec<LineMetaData>,
    baseline: f32,
    previous_descender: f32,
    start: usize,
    ascender: f32,
    descender: f32,
    measured: bool,
    kerning_offset: Option<f32>,
    right_edge: Option<f32>,
}

impl LineAssembler {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            baseline: 0.0,
            previous_descender: 0.0,
            start: 0,
            ascender: 0.0,
            descender: 0.0,
            measured: false,
            kerning_offset: None,
            right_edge: None,
        }
    }

    fn is_open(&self) -> bool {
        self.kerning_offset.is_some()
    }

    fn push(&mut self, ch: &mut Character) {
        if self.kerning_offset.is_none() {
            self.kerning_offset = Some(ch.kerning);
        }
        ch.line_order = self.lines.len();

        if !ch.ignore || ch.is_newline() {
            self.ascender = self.ascender.max(ch.ascender);
            self.descender = self.descender.min(ch.descender);
            self.measured = true;
        }
        // Trailing spaces do not count toward the line width.
        if !ch.ignore && !ch.is_space() {
            let edge = ch.kerning + ch.xadvance;
            self.right_edge = Some(self.right_edge.map_or(edge, |r| r.max(edge)));
        }
    }

    /// Terminate the line made of `characters[self.start..end]`.
    fn close(
        &mut self,
        characters: &mut [Character],
        end: usize,
        fallback: (f32, f32),
        params: &LayoutParams,
    ) {
        let (mut ascender, mut descender) = if self.measured {
            (self.ascender, self.descender)
        } else {
            fallback
        };
        if params.power_of_two {
            ascender = (ascender / 2.0).ceil() * 2.0;
            descender = (descender / 2.0).floor() * 2.0;
        }

        if self.lines.is_empty() {
            self.baseline += ascender;
        } else {
            self.baseline += ascender * params.line_height_percentage - self.previous_descender;
        }

        let offset = self.kerning_offset.unwrap_or(0.0);
        for ch in &mut characters[self.start..end] {
            ch.aligned_kerning = ch.kerning - offset;
        }

        self.lines.push(LineMetaData {
            index: self.lines.len(),
            width: self.right_edge.map_or(0.0, |r| (r - offset).max(0.0)),
            ascender,
            descender,
            baseline: self.baseline,
            alignment_offset: 0.0,
        });

        self.previous_descender = descender;
        self.start = end;
        self.ascender = 0.0;
        self.descender = 0.0;
        self.measured = false;
        self.kerning_offset = None;
        self.right_edge = None;
    }
}

/// Assign characters to lines and compute per-line vertical metrics.
pub fn vertical_pass(
    characters: &mut [Character],
    words: &[WordMetaData],
    fonts: &mut FontFamily,
    params: &LayoutParams,
) -> Vec<LineMetaData> {
    let fallback = (
        fonts.ascender(params.size, params.font_type) as f32,
        fonts.descender(params.size, params.font_type) as f32,
    );
    let mut assembler = LineAssembler::new();
    let mut current_word: Option<usize> = None;
    let len = characters.len();

    for i in 0..len {
        let word = characters[i].word_order;
        if current_word != Some(word) {
            current_word = Some(word);
            if params.auto_wrap && assembler.is_open() {
                let line_offset = assembler.kerning_offset.unwrap_or(0.0);
                let overflows = words
                    .get(word)
                    .is_some_and(|w| w.horizontal_offset - line_offset > params.wrap_width);
                if overflows {
                    assembler.close(characters, i, fallback, params);
                }
            }
        }

        assembler.push(&mut characters[i]);
        if characters[i].is_newline() || i + 1 == len {
            assembler.close(characters, i + 1, fallback, params);
        }
    }

    if let Some(last) = characters.last() {
        if last.is_newline() {
            assembler.close(characters, len, (last.ascender, last.descender), params);
        }
    }

    let mut lines = assembler.lines;
    apply_alignment(&mut lines, params.justify);
    lines
}

/// Justify each line within the widest one.
pub fn apply_alignment(lines: &mut [LineMetaData], justify: Justify) {
    let widest = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
    for line in lines {
        line.alignment_offset = match justify {
            Justify::Left => 0.0,
            Justify::Center => (widest - line.width) / 2.0,
            Justify::Right => widest - line.width,
        };
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::AtlasConfig;
    use crate::character::CharacterBuilder;
    use crate::raster::FixedRasterizer;
    use crate::style::ResolvedStyle;

    fn fonts() -> FontFamily {
        FontFamily::new(
            FixedRasterizer::new().with_kerning('A', 'V', -3),
            AtlasConfig::default(),
        )
    }

    fn build(fonts: &mut FontFamily, text: &str) -> Vec<Character> {
        let style = ResolvedStyle::plain(FontType::Regular, 20);
        text.chars()
            .enumerate()
            .map(|(i, cp)| {
                let mut c = CharacterBuilder::default().build(fonts, cp, &style, false);
                c.character_order = i;
                c
            })
            .collect()
    }

    fn params() -> LayoutParams {
        LayoutParams {
            size: 20,
            ..Default::default()
        }
    }

    fn run(text: &str, params: &LayoutParams) -> (Vec<Character>, Vec<WordMetaData>, Vec<LineMetaData>) {
        let mut fonts = fonts();
        let mut chars = build(&mut fonts, text);
        let words = horizontal_pass(&mut chars, &mut fonts);
        let lines = vertical_pass(&mut chars, &words, &mut fonts, params);
        (chars, words, lines)
    }

    #[test]
    fn test_pen_positions_and_kerning() {
        let (chars, _, _) = run("AVA", &params());
        assert_eq!(chars[0].kerning, 0.0);
        // 10 advance - 3 kerning.
        assert_eq!(chars[1].kerning, 7.0);
        assert_eq!(chars[2].kerning, 17.0);
    }

    #[test]
    fn test_words_close_at_spaces() {
        let (chars, words, _) = run("ab cd", &params());
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].width, 30.0);
        assert_eq!(words[0].horizontal_offset, 15.0);
        assert_eq!(words[1].width, 20.0);
        assert_eq!(words[1].horizontal_offset, 40.0);
        assert_eq!(chars[2].word_order, 0);
        assert_eq!(chars[3].word_order, 1);
    }

    #[test]
    fn test_single_line_metrics() {
        let (chars, _, lines) = run("abc", &params());
        assert_eq!(lines.len(), 1);
        let line = lines[0];
        assert_eq!(line.width, 30.0);
        assert_eq!(line.ascender, 16.0);
        assert_eq!(line.descender, -4.0);
        assert_eq!(line.baseline, 16.0);
        assert_eq!(line.height(), 20.0);
        assert!(chars.iter().all(|c| c.line_order == 0));
    }

    #[test]
    fn test_newline_splits_and_rebases() {
        let (chars, _, lines) = run("AB\nCD", &params());
        assert_eq!(lines.len(), 2);
        let orders: Vec<usize> = chars.iter().map(|c| c.line_order).collect();
        assert_eq!(orders, vec![0, 0, 0, 1, 1]);
        assert_eq!(chars[3].kerning, 20.0);
        assert_eq!(chars[3].aligned_kerning, 0.0);
        assert_eq!(chars[4].aligned_kerning, 10.0);
        assert_eq!(lines[1].baseline, 16.0 + 16.0 + 4.0);
    }

    #[test]
    fn test_trailing_newline_adds_empty_line() {
        let (_, _, lines) = run("AB\n", &params());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].width, 0.0);
        assert_eq!(lines[1].ascender, 16.0);
        assert!(lines[1].baseline > lines[0].baseline);
    }

    #[test]
    fn test_blank_lines_keep_height() {
        let (_, _, lines) = run("a\n\nb", &params());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].height(), 20.0);
        assert_eq!(lines[2].baseline, 16.0 + 20.0 + 20.0);
    }

    #[test]
    fn test_line_height_percentage() {
        let p = LayoutParams {
            line_height_percentage: 1.5,
            ..params()
        };
        let (_, _, lines) = run("a\nb", &p);
        assert_eq!(lines[1].baseline, 16.0 + 24.0 + 4.0);
    }

    #[test]
    fn test_power_of_two_rounds_to_even() {
        let mut rasterizer = FixedRasterizer::new();
        rasterizer.ascender_em = 0.85;
        rasterizer.descender_em = -0.15;
        let mut fonts = FontFamily::new(rasterizer, AtlasConfig::default());
        // 0.85 * 20 = 17, -0.15 * 20 = -3.
        let mut chars = build(&mut fonts, "a");
        let words = horizontal_pass(&mut chars, &mut fonts);
        let p = LayoutParams {
            power_of_two: true,
            ..params()
        };
        let lines = vertical_pass(&mut chars, &words, &mut fonts, &p);
        assert_eq!(lines[0].ascender, 18.0);
        assert_eq!(lines[0].descender, -4.0);
    }

    #[test]
    fn test_auto_wrap_breaks_at_word() {
        let p = LayoutParams {
            auto_wrap: true,
            wrap_width: 50.0,
            ..params()
        };
        let (chars, _, lines) = run("AAAA BBBB", &p);
        assert_eq!(lines.len(), 2);
        assert_eq!(chars[4].line_order, 0);
        assert_eq!(chars[5].line_order, 1);
        assert_eq!(chars[5].aligned_kerning, 0.0);
        assert_eq!(lines[1].width, 40.0);
    }

    #[test]
    fn test_wrapped_right_edges_line_up() {
        let p = LayoutParams {
            auto_wrap: true,
            wrap_width: 50.0,
            justify: Justify::Right,
            ..params()
        };
        let (chars, _, lines) = run("AAAA BBBB", &p);
        assert_eq!(lines[0].width, 40.0);
        assert_eq!(lines[1].width, 40.0);
        let right = |i: usize| {
            let ch = &chars[i];
            lines[ch.line_order].alignment_offset + ch.aligned_kerning + ch.xadvance
        };
        assert_eq!(right(3), right(8));
    }

    #[test]
    fn test_wrap_disabled_keeps_one_line() {
        let (_, _, lines) = run("AAAA BBBB", &params());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].width, 90.0);
    }

    #[test]
    fn test_long_word_not_split() {
        let p = LayoutParams {
            auto_wrap: true,
            wrap_width: 20.0,
            ..params()
        };
        let (_, _, lines) = run("ABCDEFGH", &p);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_alignment_offsets() {
        let p = LayoutParams {
            justify: Justify::Right,
            ..params()
        };
        let (_, _, lines) = run("abcd\nab", &p);
        assert_eq!(lines[0].alignment_offset, 0.0);
        assert_eq!(lines[1].alignment_offset, 20.0);

        let mut lines = lines;
        apply_alignment(&mut lines, Justify::Center);
        assert_eq!(lines[1].alignment_offset, 10.0);
    }

    #[test]
    fn test_empty_text() {
        let (_, words, lines) = run("", &params());
        assert!(words.is_empty());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_baselines_increase() {
        let (_, _, lines) = run("a\nb\n\nc\n", &params());
        for pair in lines.windows(2) {
            assert!(pair[1].baseline > pair[0].baseline);
        }
    }
}
