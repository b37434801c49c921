// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts for the engine pieces a [`ViewState`](crate::ViewState) drives.
//!
//! The orchestrator decides *when* each of these runs and *how much* texture
//! budget to hand out. What they paint, how they upload, and which tiles they
//! evict is up to them. Each trait is the minimal surface the draw sequence
//! needs:
//!
//! - [`TileManager`] — tiled texture pool, with the [`ShaderProgram`] and
//!   [`TransferQueue`] GPU resources it owns.
//! - [`SurfaceCollectionManager`] — double-buffered layer snapshots; draws
//!   the layers and reports [`TextureDemand`].
//! - [`ImageManager`] — non-tile image textures.
//! - [`VideoTextureManager`] — video layer textures.
//! - [`GpuContext`] — the handful of raw context calls made directly.
//!
//! Collaborators that repaint content during a frame report the screen area
//! they touched into the [`DirtyRegion`] they are handed; the orchestrator
//! turns the accumulated region into the frame's invalidation.
//!
//! Everything here is called from the rendering thread only.

use kurbo::Rect;
use lamina_core::dirty::DirtyRegion;
use lamina_core::geometry::IntRect;
use lamina_core::mode::TextureDemand;
use lamina_core::status::DrawStatus;
use lamina_core::time::HostTime;
use lamina_core::viewport::TileSize;

use crate::frame::FrameRequest;

/// Identifies a scrollable layer inside the active surface collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub i32);

/// Screen offset produced by the shader's running view animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AnimationDelta {
    /// Horizontal offset in pixels.
    pub x: i32,
    /// Vertical offset in pixels.
    pub y: i32,
}

/// Flat RGBA color used for overlay clears.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red, 0.0–1.0.
    pub r: f32,
    /// Green, 0.0–1.0.
    pub g: f32,
    /// Blue, 0.0–1.0.
    pub b: f32,
    /// Alpha, 0.0–1.0.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Shader program shared by all tile and layer draws.
pub trait ShaderProgram {
    /// Returns `true` if GPU objects must be (re)created, either on first use
    /// or after the context was lost.
    fn needs_init(&self) -> bool;

    /// Creates GPU objects. Called only when [`needs_init`](Self::needs_init)
    /// is `true`.
    fn init_resources(&mut self);

    /// Loads per-frame projection and clip state for `request`.
    fn setup_drawing(&mut self, request: &FrameRequest);

    /// Advances the view animation and returns the resulting offset.
    fn calculate_animation_delta(&mut self) -> AnimationDelta;
}

/// Staging area that decoded tile bitmaps pass through on their way to GPU
/// textures.
pub trait TransferQueue {
    /// Returns `true` if GPU objects must be (re)created.
    fn needs_init(&self) -> bool;

    /// Creates GPU objects sized for `tile_size` tiles.
    fn init_resources(&mut self, tile_size: TileSize);

    /// Blits every pending tile from staging into its texture.
    fn update_dirty_tiles(&mut self);
}

/// Pool of tile and layer textures.
pub trait TileManager {
    /// Returns the fixed tile dimensions.
    fn tile_size(&self) -> TileSize;

    /// Sets the global texture ceiling for tiles.
    fn set_max_texture_count(&mut self, count: usize);

    /// Requests a ceiling on layer textures and returns the ceiling actually
    /// in effect, which may be lower.
    fn set_max_layer_texture_count(&mut self, count: usize) -> usize;

    /// Reclaims and assigns textures for this frame.
    fn gather_textures(&mut self);

    /// Returns the shader program.
    fn shader(&mut self) -> &mut dyn ShaderProgram;

    /// Returns the tile transfer queue.
    fn transfer_queue(&mut self) -> &mut dyn TransferQueue;

    /// Toggles per-tile debug decorations.
    fn set_show_visual_indicator(&mut self, show: bool);

    /// Advances the monotonically increasing draw counter.
    fn increment_draw_count(&mut self);

    /// Marks a profiler frame boundary for a presented frame.
    fn profiler_next_frame(&mut self, viewport: Rect, scale: f64);
}

/// Parameters for one [`SurfaceCollectionManager::draw`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollectionDrawRequest {
    /// Logical draw time of the frame.
    pub timestamp: HostTime,
    /// Screen rectangle being drawn.
    pub draw_rect: IntRect,
    /// Visible content rectangle.
    pub viewport: Rect,
    /// Content scale.
    pub scale: f64,
    /// Prefer a lower-latency, possibly coarser collection swap.
    pub fast_swap: bool,
    /// Whether the frame is presented.
    pub should_draw: bool,
}

/// What a [`SurfaceCollectionManager::draw`] call reports back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollectionDrawOutcome {
    /// Status bits the collection wants returned to the platform.
    pub status: DrawStatus,
    /// Whether the pending collection became the active one.
    pub collections_swapped: bool,
    /// Whether the newly active collection runs animations.
    pub new_collection_has_animations: bool,
    /// Texture demand of the active collection.
    pub demand: TextureDemand,
}

/// Double-buffered layer snapshots.
pub trait SurfaceCollectionManager {
    /// Content root a new collection is built from.
    type Root;

    /// Queues a collection built from `root` (or clears content for `None`).
    ///
    /// Returns `true` when the queue is full and the caller should hold off
    /// further updates.
    fn update_with_collection(&mut self, root: Option<Self::Root>, after_first_layout: bool)
    -> bool;

    /// Moves a scrollable layer to `(x, y)`.
    fn update_scrollable_layer(&mut self, layer_id: LayerId, x: i32, y: i32);

    /// Draws the active collection, reporting repainted screen areas into
    /// `dirty`.
    fn draw(
        &mut self,
        request: &CollectionDrawRequest,
        dirty: &mut DirtyRegion,
    ) -> CollectionDrawOutcome;
}

/// Image textures that are not part of the tile grid.
pub trait ImageManager {
    /// Uploads pending image textures, reporting the screen areas of images
    /// that changed into `dirty`. Returns `true` if some remain.
    fn prepare_textures(&mut self, dirty: &mut DirtyRegion) -> bool;

    /// Returns the number of textures held for images.
    fn texture_count(&self) -> usize;
}

/// Textures backing video layers.
pub trait VideoTextureManager {
    /// Releases textures no live video layer references.
    fn delete_unused_textures(&mut self);
}

/// Raw calls on the graphics context.
pub trait GpuContext {
    /// Sets the viewport origin and size in window coordinates.
    fn set_viewport(&mut self, rect: IntRect);

    /// Unbinds any array buffer left bound by transient geometry.
    fn unbind_array_buffer(&mut self);

    /// Fills `rect` with `color` using a scissored clear.
    fn clear_rect(&mut self, rect: IntRect, color: Color);
}
