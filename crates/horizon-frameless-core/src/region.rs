//! Rectangle region algebra.
//!
//! A [`Region`] is a set of pairwise-disjoint rectangles. It supports the
//! handful of operations hit-testing needs: start from a rectangle, punch
//! holes into it, and test points for membership.
//!
//! # Example
//!
//! ```
//! use horizon_frameless_core::{Point, Rect, Region};
//!
//! let mut title_bar = Region::from_rect(Rect::new(0.0, 0.0, 800.0, 40.0));
//! title_bar -= Rect::new(700.0, 0.0, 100.0, 40.0);
//!
//! assert!(title_bar.contains(Point::new(100.0, 20.0)));
//! assert!(!title_bar.contains(Point::new(750.0, 20.0)));
//! ```

use std::ops::SubAssign;

use crate::types::{Point, Rect};

/// A set of disjoint rectangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// Create an empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a region covering a single rectangle.
    ///
    /// Invalid (empty or negative) rectangles produce an empty region.
    pub fn from_rect(rect: Rect) -> Self {
        let rects = if rect.is_valid() { vec![rect] } else { Vec::new() };
        Self { rects }
    }

    /// Whether the region covers no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The disjoint rectangles making up this region.
    #[inline]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Whether the point lies inside any rectangle of the region.
    pub fn contains(&self, point: Point) -> bool {
        self.rects.iter().any(|rect| rect.contains(point))
    }

    /// Total covered area.
    pub fn area(&self) -> f32 {
        self.rects.iter().map(Rect::area).sum()
    }

    /// Smallest rectangle enclosing the whole region.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let (first, rest) = self.rects.split_first()?;
        Some(rest.iter().fold(*first, |acc, rect| acc.union(rect)))
    }

    /// Remove `hole` from the region.
    ///
    /// Every rectangle overlapping the hole is split into at most four
    /// pieces: full-width bands above and below the hole, and side pieces
    /// spanning the hole's rows.
    pub fn subtract(&mut self, hole: Rect) {
        if !hole.is_valid() || self.rects.is_empty() {
            return;
        }

        let mut pieces = Vec::with_capacity(self.rects.len() + 3);
        for rect in &self.rects {
            let Some(overlap) = rect.intersect(&hole) else {
                pieces.push(*rect);
                continue;
            };

            if overlap.top() > rect.top() {
                pieces.push(Rect::new(
                    rect.left(),
                    rect.top(),
                    rect.width(),
                    overlap.top() - rect.top(),
                ));
            }
            if overlap.bottom() < rect.bottom() {
                pieces.push(Rect::new(
                    rect.left(),
                    overlap.bottom(),
                    rect.width(),
                    rect.bottom() - overlap.bottom(),
                ));
            }
            if overlap.left() > rect.left() {
                pieces.push(Rect::new(
                    rect.left(),
                    overlap.top(),
                    overlap.left() - rect.left(),
                    overlap.height(),
                ));
            }
            if overlap.right() < rect.right() {
                pieces.push(Rect::new(
                    overlap.right(),
                    overlap.top(),
                    rect.right() - overlap.right(),
                    overlap.height(),
                ));
            }
        }
        self.rects = pieces;
    }

    /// Builder-style [`subtract`](Self::subtract).
    pub fn subtracted(mut self, hole: Rect) -> Self {
        self.subtract(hole);
        self
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

impl SubAssign<Rect> for Region {
    fn sub_assign(&mut self, hole: Rect) {
        self.subtract(hole);
    }
}
