//! Small value types shared by every stage of the pipeline.

use serde::{Deserialize, Serialize};

// ── Font type ───────────────────────────────────────────────────────

/// Face variant within a font family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontType {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl Default for FontType {
    fn default() -> Self {
        Self::Regular
    }
}

impl FontType {
    /// Every variant, in declaration order.
    pub const ALL: [FontType; 4] = [
        FontType::Regular,
        FontType::Bold,
        FontType::Italic,
        FontType::BoldItalic,
    ];

    pub fn is_bold(self) -> bool {
        matches!(self, FontType::Bold | FontType::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontType::Italic | FontType::BoldItalic)
    }
}

// ── Justification ───────────────────────────────────────────────────

/// Horizontal justification of a text run inside its owning box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Justify {
    Left,
    Center,
    Right,
}

impl Default for Justify {
    fn default() -> Self {
        Self::Left
    }
}

// ── Rect ────────────────────────────────────────────────────────────

/// Axis-aligned rectangle, y grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    };

    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// True when the rect covers no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(
            self.min_x + dx,
            self.min_y + dy,
            self.max_x + dx,
            self.max_y + dy,
        )
    }

    /// Grow every edge outwards (`dx` horizontally, `dy` vertically).
    pub fn expand(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(
            self.min_x - dx,
            self.min_y - dy,
            self.max_x + dx,
            self.max_y + dy,
        )
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Overlap of the two rects; empty (not negative) when they are disjoint.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        Rect::new(
            min_x,
            min_y,
            self.max_x.min(other.max_x).max(min_x),
            self.max_y.min(other.max_y).max(min_y),
        )
    }
}
