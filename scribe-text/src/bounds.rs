//! Line and aggregate bounds, and draw-time justification.

use crate::layout::LineMetaData;
use crate::types::{Justify, Rect};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundsCache {
    lines: Vec<Rect>,
    total: Rect,
}

impl BoundsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recompute(&mut self, lines: &[LineMetaData]) {
        self.lines.clear();
        self.lines.extend(lines.iter().map(|line| {
            Rect::new(
                line.alignment_offset,
                line.baseline - line.ascender,
                line.alignment_offset + line.width,
                line.baseline - line.descender,
            )
        }));
        self.total = self
            .lines
            .iter()
            .copied()
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or(Rect::ZERO);
    }

    pub fn line(&self, index: usize) -> Option<Rect> {
        self.lines.get(index).copied()
    }

    /// Union of every line.
    pub fn total(&self) -> Rect {
        self.total
    }

    /// Horizontal shift that places the text inside a box of `box_width`.
    ///
    /// Text wider than the box is always left-anchored, whatever the
    /// requested justification, so it never overflows to the left.
    pub fn justify_offset(&self, box_width: f32, justify: Justify) -> f32 {
        let width = self.total.width();
        let left = -self.total.min_x;
        if width > box_width {
            return left;
        }
        match justify {
            Justify::Left => left,
            Justify::Center => left + (box_width - width) / 2.0,
            Justify::Right => left + box_width - width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(index: usize, width: f32, baseline: f32, offset: f32) -> LineMetaData {
        LineMetaData {
            index,
            width,
            ascender: 16.0,
            descender: -4.0,
            baseline,
            alignment_offset: offset,
        }
    }

    #[test]
    fn test_line_and_total_bounds() {
        let mut cache = BoundsCache::new();
        cache.recompute(&[line(0, 40.0, 16.0, 0.0), line(1, 20.0, 36.0, 10.0)]);
        assert_eq!(cache.line(0), Some(Rect::new(0.0, 0.0, 40.0, 20.0)));
        assert_eq!(cache.line(1), Some(Rect::new(10.0, 20.0, 30.0, 40.0)));
        assert_eq!(cache.line(2), None);
        assert_eq!(cache.total(), Rect::new(0.0, 0.0, 40.0, 40.0));
    }

    #[test]
    fn test_empty_is_zero() {
        let mut cache = BoundsCache::new();
        cache.recompute(&[]);
        assert_eq!(cache.total(), Rect::ZERO);
        assert_eq!(cache.justify_offset(100.0, Justify::Right), 100.0);
    }

    #[test]
    fn test_justify_offsets() {
        let mut cache = BoundsCache::new();
        cache.recompute(&[line(0, 40.0, 16.0, 0.0)]);
        assert_eq!(cache.justify_offset(100.0, Justify::Left), 0.0);
        assert_eq!(cache.justify_offset(100.0, Justify::Center), 30.0);
        assert_eq!(cache.justify_offset(100.0, Justify::Right), 60.0);
    }

    #[test]
    fn test_overflow_forces_left() {
        let mut cache = BoundsCache::new();
        cache.recompute(&[line(0, 140.0, 16.0, 0.0)]);
        assert_eq!(cache.justify_offset(100.0, Justify::Right), 0.0);
        assert_eq!(cache.justify_offset(100.0, Justify::Center), 0.0);
    }
}
