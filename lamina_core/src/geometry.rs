// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles for screen-space damage.
//!
//! Content-space geometry (the viewport) uses [`kurbo::Rect`]. Damage and
//! draw rectangles live on the pixel grid, so they get their own
//! [`IntRect`] with the edge semantics the platform damage tracker expects:
//! a rectangle with a non-positive width or height is empty, and empty
//! rectangles never intersect anything.

use core::fmt;

use kurbo::Rect;

/// An axis-aligned rectangle on the integer pixel grid.
///
/// Stored as origin plus size. [`IntRect::ZERO`] doubles as the
/// "invalidate everything" sentinel when handed back to the platform.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width (empty when `<= 0`).
    pub width: i32,
    /// Height (empty when `<= 0`).
    pub height: i32,
}

impl IntRect {
    /// The zero rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates a rectangle from origin and size.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Grows the rectangle by `d` on every side.
    ///
    /// Edges clamp at the `i32` limits instead of wrapping.
    #[inline]
    #[must_use]
    pub const fn inflate(self, d: i32) -> Self {
        let grow = d.saturating_mul(2);
        Self::new(
            self.x.saturating_sub(d),
            self.y.saturating_sub(d),
            self.width.saturating_add(grow),
            self.height.saturating_add(grow),
        )
    }

    /// Moves the rectangle by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Returns a copy with the given width.
    #[inline]
    #[must_use]
    pub const fn with_width(self, width: i32) -> Self {
        Self::new(self.x, self.y, width, self.height)
    }

    /// Returns a copy with the given height.
    #[inline]
    #[must_use]
    pub const fn with_height(self, height: i32) -> Self {
        Self::new(self.x, self.y, self.width, height)
    }

    /// Returns `true` if both rectangles are non-empty and share at least one
    /// pixel.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns the overlapping area, or [`IntRect::ZERO`] if the rectangles
    /// do not intersect.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        if !self.intersects(other) {
            return Self::ZERO;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Self::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    /// Returns the bounding box of both rectangles.
    ///
    /// Empty operands are ignored, so the union of an empty rectangle with
    /// `r` is `r` rather than a box stretched to the origin.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

}

impl fmt::Debug for IntRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IntRect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Returns `true` if two content-space rectangles share a non-empty area.
///
/// Touching edges do not count, and a rectangle with no area overlaps
/// nothing.
#[must_use]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    let a_empty = a.x0 >= a.x1 || a.y0 >= a.y1;
    let b_empty = b.x0 >= b.x1 || b.y0 >= b.y1;
    !a_empty && !b_empty && a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rects() {
        assert!(IntRect::ZERO.is_empty());
        assert!(IntRect::new(5, 5, 0, 10).is_empty());
        assert!(IntRect::new(5, 5, 10, -1).is_empty());
        assert!(!IntRect::new(-5, -5, 1, 1).is_empty());
    }

    #[test]
    fn inflate_grows_every_side() {
        let r = IntRect::new(10, 20, 30, 40).inflate(8);
        assert_eq!(r, IntRect::new(2, 12, 46, 56));
    }

    #[test]
    fn union_ignores_empty_operands() {
        let r = IntRect::new(100, 100, 10, 10);
        assert_eq!(r.union(IntRect::ZERO), r);
        assert_eq!(IntRect::ZERO.union(r), r);
        assert_eq!(
            r.union(IntRect::new(0, 0, 5, 5)),
            IntRect::new(0, 0, 110, 110)
        );
    }

    #[test]
    fn intersect_and_intersects() {
        let a = IntRect::new(0, 0, 100, 100);
        let b = IntRect::new(50, 60, 100, 100);
        assert!(a.intersects(b));
        assert_eq!(a.intersect(b), IntRect::new(50, 60, 50, 40));

        // Touching edges share no pixel.
        let c = IntRect::new(100, 0, 10, 10);
        assert!(!a.intersects(c));
        assert_eq!(a.intersect(c), IntRect::ZERO);

        // Empty rects never intersect.
        assert!(!a.intersects(IntRect::new(10, 10, 0, 0)));
    }

    #[test]
    fn content_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(overlaps(a, Rect::new(50.0, 50.0, 150.0, 150.0)));
        assert!(!overlaps(a, Rect::new(100.0, 0.0, 200.0, 100.0)));
        assert!(!overlaps(a, Rect::ZERO));
        assert!(!overlaps(Rect::ZERO, Rect::ZERO));
    }

    #[test]
    fn extents_near_i32_limits_clamp() {
        let wide = IntRect::new(0, 0, i32::MAX - 4, 10);
        assert_eq!(wide.right(), i32::MAX - 4, "edge below the limit is exact");
        assert_eq!(
            wide.inflate(8),
            IntRect::new(-8, -8, i32::MAX, 26),
            "inflated width clamps at i32::MAX"
        );
        assert_eq!(
            IntRect::new(i32::MIN + 2, 0, 1, 1).inflate(8).x,
            i32::MIN,
            "inflated origin clamps at i32::MIN"
        );
        assert_eq!(
            IntRect::new(i32::MAX - 1, 0, 10, 10).translate(5, 0).x,
            i32::MAX,
            "translation clamps"
        );

        let huge = IntRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        let far = IntRect::new(i32::MAX - 10, 0, 100, 100);
        assert_eq!(
            huge.union(far),
            IntRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX),
            "union width clamps at i32::MAX"
        );
        let screen = IntRect::new(0, 0, 800, 600);
        assert_eq!(
            screen.intersect(IntRect::new(-8, -8, i32::MAX, i32::MAX)),
            screen,
            "huge rect clips to the smaller one"
        );
    }
}
