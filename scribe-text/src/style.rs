//! Inline text styles.
//!
//! A style is referenced from text by wrapping a run in `<Name>` ... `</>`.

use serde::{Deserialize, Serialize};

use crate::types::FontType;

/// Closing tag shared by every style.
pub const END_TAG: &str = "</>";

/// A named style that can be applied to runs of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub name: String,
    pub font_type: FontType,
    /// Pixel size.
    pub size: u32,
    /// RGBA override, each channel in [0.0, 1.0].
    pub color: Option<[f32; 4]>,
}

impl TextStyle {
    pub fn new(name: impl Into<String>, font_type: FontType, size: u32) -> Self {
        Self {
            name: name.into(),
            font_type,
            size,
            color: None,
        }
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = Some(color);
        self
    }

    pub fn start_tag(&self) -> String {
        format!("<{}>", self.name)
    }
}

/// The style actually in effect for one character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub font_type: FontType,
    pub size: u32,
    pub color: Option<[f32; 4]>,
    /// Index of the registered style, `None` for the text's defaults.
    pub style: Option<usize>,
}

impl ResolvedStyle {
    pub fn plain(font_type: FontType, size: u32) -> Self {
        Self {
            font_type,
            size,
            color: None,
            style: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        let style = TextStyle::new("Title", FontType::Bold, 32).with_color([1.0, 0.0, 0.0, 1.0]);
        assert_eq!(style.start_tag(), "<Title>");
        assert_eq!(END_TAG, "</>");
        assert_eq!(style.color, Some([1.0, 0.0, 0.0, 1.0]));
    }
}
