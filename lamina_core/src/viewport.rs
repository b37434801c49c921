// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport, scale, and scroll-state tracking.
//!
//! [`ViewportTracker`] owns the view's current [`Viewport`] and derives two
//! pieces of scroll state from successive updates:
//!
//! - [`ScrollDirection`] — which way the content moved last, from the sign of
//!   the top/left deltas.
//! - *viewport scrolling* — set when the new viewport differs from the old
//!   one but still overlaps it. That pattern comes from short programmatic
//!   scrolls and jumps rather than a user drag. A repeated, identical
//!   viewport clears it.
//!
//! Continuous drag state ([`ScrollingFlag`]) is not derived at all: the input
//! thread sets it directly.
//!
//! [`visible_texture_capacity`] converts a viewport into the number of tile
//! textures needed to cover it, which becomes the tile manager's global
//! texture ceiling.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Rect;

use crate::geometry::overlaps;

/// Pixel dimensions of one tile texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileSize {
    /// Tile width in pixels.
    pub width: u32,
    /// Tile height in pixels.
    pub height: u32,
}

impl TileSize {
    /// The 256×256 tiles used by default.
    pub const DEFAULT: Self = Self {
        width: 256,
        height: 256,
    };
}

impl Default for TileSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Visible content rectangle and the scale it is drawn at.
///
/// The pair is stored and compared as one value so readers never see a
/// rectangle from one update with the scale from another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Visible area in content coordinates.
    pub rect: Rect,
    /// Content-to-screen scale factor.
    pub scale: f64,
}

impl Viewport {
    /// The empty viewport a fresh view starts with.
    pub const EMPTY: Self = Self {
        rect: Rect::ZERO,
        scale: 1.0,
    };
}

impl Default for Viewport {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Vertical component of the last scroll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Vertical {
    /// Content moved towards larger `y` (or did not move vertically).
    #[default]
    Down,
    /// Content moved towards smaller `y`.
    Up,
}

/// Horizontal component of the last scroll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Horizontal {
    /// Content moved towards smaller `x` (or did not move horizontally).
    Left,
    /// Content moved towards larger `x`.
    #[default]
    Right,
}

/// Direction of the most recent viewport change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScrollDirection {
    /// Vertical component.
    pub vertical: Vertical,
    /// Horizontal component.
    pub horizontal: Horizontal,
}

impl ScrollDirection {
    /// Derives the direction of travel from `old` to `new`.
    ///
    /// A zero delta counts as down on the vertical axis and as left on the
    /// horizontal axis.
    #[must_use]
    pub fn between(old: Rect, new: Rect) -> Self {
        let vertical = if old.y0 - new.y0 <= 0.0 {
            Vertical::Down
        } else {
            Vertical::Up
        };
        let horizontal = if old.x0 - new.x0 >= 0.0 {
            Horizontal::Left
        } else {
            Horizontal::Right
        };
        Self {
            vertical,
            horizontal,
        }
    }

    /// Returns `true` if the last vertical movement was downwards.
    #[inline]
    #[must_use]
    pub fn going_down(self) -> bool {
        self.vertical == Vertical::Down
    }

    /// Returns `true` if the last horizontal movement was leftwards.
    #[inline]
    #[must_use]
    pub fn going_left(self) -> bool {
        self.horizontal == Horizontal::Left
    }
}

/// Shared "user is dragging" flag.
///
/// Cloning yields another handle to the same flag, so an input thread can
/// keep one and flip it without locking the view. The render thread reads it
/// once at the start of each frame.
#[derive(Clone, Debug, Default)]
pub struct ScrollingFlag(Arc<AtomicBool>);

impl ScrollingFlag {
    /// Sets whether a continuous scroll is in progress.
    #[inline]
    pub fn set(&self, scrolling: bool) {
        self.0.store(scrolling, Ordering::Release);
    }

    /// Returns whether a continuous scroll is in progress.
    #[inline]
    #[must_use]
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Returns how many tile textures are needed to cover `rect` at `scale`.
///
/// Per axis this is `ceil((extent - 1) * scale / tile_extent) + 1`, which
/// rounds up so that partially covered edge tiles are counted. The product is
/// multiplied by `per_tile_multiplier` (typically 4 on capable GPUs, 2
/// otherwise) to leave room for prefetch and double buffering. Degenerate
/// inputs yield zero rather than failing.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "tile counts are small non-negative integers; `as` saturates NaN and overflow"
)]
pub fn visible_texture_capacity(
    rect: Rect,
    scale: f64,
    tile_size: TileSize,
    per_tile_multiplier: u32,
) -> usize {
    let tiles_x = ((rect.width() - 1.0) * scale / f64::from(tile_size.width)).ceil() + 1.0;
    let tiles_y = ((rect.height() - 1.0) * scale / f64::from(tile_size.height)).ceil() + 1.0;
    let tiles = tiles_x.max(0.0) * tiles_y.max(0.0) * f64::from(per_tile_multiplier);
    tiles as usize
}

/// Tracks the view's viewport and the scroll state derived from it.
#[derive(Debug, Default)]
pub struct ViewportTracker {
    viewport: Viewport,
    direction: ScrollDirection,
    viewport_scrolling: bool,
    scrolling: ScrollingFlag,
}

impl ViewportTracker {
    /// Creates a tracker with an empty viewport at scale 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new viewport.
    ///
    /// Returns `false` (and only clears the viewport-scrolling flag) when
    /// `(rect, scale)` equals the stored pair. Otherwise updates the scroll
    /// direction and viewport-scrolling flag, stores the pair, and returns
    /// `true`.
    pub fn set_viewport(&mut self, rect: Rect, scale: f64) -> bool {
        let next = Viewport { rect, scale };
        if next == self.viewport {
            self.viewport_scrolling = false;
            return false;
        }

        let previous = self.viewport.rect;
        self.direction = ScrollDirection::between(previous, rect);
        self.viewport_scrolling = previous != rect && overlaps(previous, rect);
        self.viewport = next;

        log::trace!(
            "new viewport {:.2} - {:.2} {:.2} - {:.2} (w: {:.2} h: {:.2} scale: {:.2})",
            rect.x0,
            rect.y0,
            rect.x1,
            rect.y1,
            rect.width(),
            rect.height(),
            scale,
        );
        true
    }

    /// Returns the current viewport.
    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Returns the direction of the most recent viewport change.
    #[inline]
    #[must_use]
    pub fn scroll_direction(&self) -> ScrollDirection {
        self.direction
    }

    /// Returns `true` while the user is dragging.
    #[inline]
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.scrolling.get()
    }

    /// Sets whether the user is dragging.
    #[inline]
    pub fn set_scrolling(&self, scrolling: bool) {
        self.scrolling.set(scrolling);
    }

    /// Returns a handle to the dragging flag for another thread.
    #[must_use]
    pub fn scrolling_flag(&self) -> ScrollingFlag {
        self.scrolling.clone()
    }

    /// Returns `true` if the last update was a short programmatic scroll.
    #[inline]
    #[must_use]
    pub fn is_viewport_scrolling(&self) -> bool {
        self.viewport_scrolling
    }
}
