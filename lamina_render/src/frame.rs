// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inputs and outputs of one [`ViewState::draw_frame`](crate::ViewState::draw_frame) call.

use kurbo::Rect;
use lamina_core::dirty::Invalidation;
use lamina_core::geometry::IntRect;
use lamina_core::mode::RenderingMode;
use lamina_core::status::DrawStatus;
use lamina_core::time::HostTime;

/// Geometry and flags the platform supplies for a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameRequest {
    /// Screen rectangle the view is drawn into.
    pub draw_rect: IntRect,
    /// Visible area in content coordinates.
    pub visible_rect: Rect,
    /// Rectangle of the whole web view in window coordinates.
    pub web_view_rect: IntRect,
    /// Height of the title bar overlapping the view.
    pub title_bar_height: i32,
    /// Screen clip for the frame.
    pub screen_clip: IntRect,
    /// Content-to-screen scale.
    pub scale: f64,
    /// `false` for a priming pass that updates state without presenting.
    pub should_draw: bool,
}

impl FrameRequest {
    /// Creates a presented request where the view fills `draw_rect`.
    ///
    /// The web view rectangle and screen clip default to `draw_rect`, with no
    /// title bar.
    #[must_use]
    pub fn new(draw_rect: IntRect, visible_rect: Rect, scale: f64) -> Self {
        Self {
            draw_rect,
            visible_rect,
            web_view_rect: draw_rect,
            title_bar_height: 0,
            screen_clip: draw_rect,
            scale,
            should_draw: true,
        }
    }

    /// Returns a copy marked as a priming pass.
    #[must_use]
    pub fn priming(self) -> Self {
        Self {
            should_draw: false,
            ..self
        }
    }
}

/// Result of a completed frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Status bits for the platform. [`DrawStatus::DRAW`] asks for another
    /// frame.
    pub status: DrawStatus,
    /// What the platform must redraw. [`Invalidation::None`] unless
    /// [`DrawStatus::DRAW`] is set.
    pub invalidation: Invalidation,
    /// Whether the active surface collection was swapped.
    pub collections_swapped: bool,
    /// Whether the newly active collection runs animations.
    pub new_collection_has_animations: bool,
    /// Rendering mode in effect after the frame.
    pub mode: RenderingMode,
    /// Logical draw time of the frame.
    pub timestamp: HostTime,
}
