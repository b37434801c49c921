// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-frame dirty-region bookkeeping.
//!
//! Layers report changed screen areas through [`DirtyRegion::add`] while a
//! frame is being drawn. The region is a single bounding rectangle. Every
//! report is outset by [`DIRTY_MARGIN`] first to cover anti-aliasing and
//! rounding. The region is cleared once per frame, before reports for that
//! frame arrive.
//!
//! # Invalidation
//!
//! When a frame asks for another draw, [`DirtyRegion::invalidation`] turns
//! the accumulated region into the [`Invalidation`] handed to the platform:
//!
//! - An empty region means content changed somewhere that was not tracked,
//!   so the whole view is invalidated.
//! - Otherwise the region is outset by one more pixel and clipped to the draw
//!   rectangle. If nothing is left (the change is entirely off-screen), the
//!   whole view is invalidated so the area is still redrawn eventually.

use crate::geometry::IntRect;

/// Outset applied to every reported dirty rectangle.
pub const DIRTY_MARGIN: i32 = 8;

/// Union of every dirty rectangle reported since the last reset.
///
/// The empty state is distinct from a zero-sized rectangle at the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyRegion {
    bounds: Option<IntRect>,
}

impl DirtyRegion {
    /// Creates an empty region.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { bounds: None }
    }

    /// Adds a changed rectangle. Empty rectangles are ignored.
    pub fn add(&mut self, rect: IntRect) {
        if rect.is_empty() {
            return;
        }
        let inflated = rect.inflate(DIRTY_MARGIN);
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.union(inflated),
            None => inflated,
        });
    }

    /// Clears the region.
    #[inline]
    pub fn reset(&mut self) {
        self.bounds = None;
    }

    /// Returns `true` if nothing has been reported since the last reset.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Returns the accumulated bounds, if any.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Option<IntRect> {
        self.bounds
    }

    /// Computes the invalidation for a frame that requested another draw.
    ///
    /// See the [module docs](self) for the rules.
    #[must_use]
    pub fn invalidation(&self, draw_rect: IntRect) -> Invalidation {
        let Some(bounds) = self.bounds else {
            return Invalidation::FullScreen;
        };
        let clipped = bounds.inflate(1).intersect(draw_rect);
        if clipped.is_empty() {
            Invalidation::FullScreen
        } else {
            Invalidation::Rect(clipped)
        }
    }
}

/// Area the platform must redraw after a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Invalidation {
    /// The frame did not ask for another draw; leave the platform's damage
    /// untouched.
    #[default]
    None,
    /// Everything must be redrawn.
    FullScreen,
    /// Only this screen rectangle must be redrawn.
    Rect(IntRect),
}

impl Invalidation {
    /// Encodes the invalidation as the rectangle the platform expects.
    ///
    /// [`FullScreen`](Self::FullScreen) becomes the zero-rectangle sentinel.
    /// [`None`](Self::None) yields `None` so the caller keeps its previous
    /// value.
    #[must_use]
    pub const fn to_damage_rect(self) -> Option<IntRect> {
        match self {
            Self::None => None,
            Self::FullScreen => Some(IntRect::ZERO),
            Self::Rect(r) => Some(r),
        }
    }

    /// Returns `true` for [`FullScreen`](Self::FullScreen).
    #[inline]
    #[must_use]
    pub const fn is_full_screen(self) -> bool {
        matches!(self, Self::FullScreen)
    }
}
