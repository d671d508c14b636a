//! Inline style tag scanning.
//!
//! Each registered style is scanned on its own, in registration order.
//! For every `<Name>` the nearest following `</>` closes the run. Delimiter
//! characters stay in the sequence (so indices never shift) but are flagged
//! `ignore`. Enclosed characters take the style unless an earlier-registered
//! style already claimed them. Tags without a closing `</>` are left as
//! literal text. Nested or overlapping tags are not resolved beyond that.

use crate::style::{TextStyle, END_TAG};

/// Per-character tagging result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunTags {
    /// Registered style index applied to each character.
    pub styles: Vec<Option<usize>>,
    /// Set for characters that belong to a tag delimiter.
    pub ignore: Vec<bool>,
}

impl RunTags {
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

pub fn parse_runs(text: &[char], styles: &[TextStyle]) -> RunTags {
    let mut tags = RunTags {
        styles: vec![None; text.len()],
        ignore: vec![false; text.len()],
    };
    let end: Vec<char> = END_TAG.chars().collect();

    for (style_index, style) in styles.iter().enumerate() {
        let start: Vec<char> = style.start_tag().chars().collect();
        let mut cursor = 0;

        while let Some(open) = find(text, &start, cursor) {
            let content = open + start.len();
            let Some(close) = find(text, &end, content) else {
                break;
            };

            tags.ignore[open..content].fill(true);
            tags.ignore[close..close + end.len()].fill(true);
            for slot in &mut tags.styles[content..close] {
                if slot.is_none() {
                    *slot = Some(style_index);
                }
            }
            cursor = close + end.len();
        }
    }

    tags
}

fn find(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}
