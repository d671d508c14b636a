use thiserror::Error;

use crate::types::FontType;

/// Failures surfaced by the atlas, the glyph cache and text edits.
///
/// None of these are fatal for a layout: a glyph that fails degrades to an
/// empty quad and the rest of the text is still laid out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("Glyph atlas full: no room for a {width}x{height} bitmap")]
    AtlasFull { width: u32, height: u32 },
    #[error("No glyph for {codepoint:?} ({font_type:?}, {size}px)")]
    UnsupportedCharacter {
        codepoint: char,
        size: u32,
        font_type: FontType,
    },
    #[error("Index {index} out of range (len {len})")]
    InvalidIndex { index: usize, len: usize },
}

pub type TextResult<T> = Result<T, TextError>;
