// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view compositing state and the frame draw sequence.
//!
//! A [`ViewState`] lives as long as its view. Between frames the platform
//! feeds it new content roots, scroll offsets, viewports, and the dragging
//! flag. Each vsync the platform calls [`ViewState::draw_frame`], which runs
//! this sequence against the collaborators borrowed through [`FrameEnv`]:
//!
//! ```text
//!  draw count / profiler ─► reset dirty ─► upload tiles + images
//!        ─► gather textures ─► setup (shader, GPU viewport, capacity)
//!        ─► draw surfaces ─► select mode ─► cleanup ─► invalidation
//!        ─► overlay
//! ```
//!
//! The returned [`FrameOutcome`] tells the platform whether to schedule
//! another frame and which screen area to redraw. A frame either completes
//! or, when the content scale turns out corrupted after upload, stops
//! according to [`ScaleCorruptionPolicy`].

use kurbo::Rect;
use lamina_core::dirty::{DirtyRegion, Invalidation};
use lamina_core::geometry::IntRect;
use lamina_core::mode::{ModeSelector, RenderingMode, layer_texture_ceiling};
use lamina_core::status::DrawStatus;
use lamina_core::time::{Clock, HostTime};
use lamina_core::trace::{
    FrameBeginEvent, FrameSummaryBuilder, InvalidationEvent, ModeChangeEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, Tracer,
};
use lamina_core::viewport::{
    ScrollDirection, ScrollingFlag, Viewport, ViewportTracker, visible_texture_capacity,
};

use crate::collaborators::{
    CollectionDrawRequest, GpuContext, ImageManager, LayerId, SurfaceCollectionManager,
    TileManager, VideoTextureManager,
};
use crate::config::{ScaleCheck, ScaleCheckStage, ScaleCorruptionPolicy, ViewConfig, check_scale};
use crate::error::FrameError;
use crate::frame::{FrameOutcome, FrameRequest};
use crate::overlay::PerformanceOverlay;

/// Collaborators borrowed for the duration of one frame.
pub struct FrameEnv<'a> {
    /// Tile texture pool.
    pub tiles: &'a mut dyn TileManager,
    /// Image texture manager.
    pub images: &'a mut dyn ImageManager,
    /// Video texture manager.
    pub videos: &'a mut dyn VideoTextureManager,
    /// Graphics context of the rendering thread.
    pub gpu: &'a mut dyn GpuContext,
    /// Source of frame timestamps.
    pub clock: &'a dyn Clock,
    /// Destination for frame trace events.
    pub tracer: Tracer<'a>,
}

impl core::fmt::Debug for FrameEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameEnv").finish_non_exhaustive()
    }
}

/// Compositing state owned by one view.
#[derive(Debug)]
pub struct ViewState<S: SurfaceCollectionManager> {
    config: ViewConfig,
    viewport: ViewportTracker,
    dirty: DirtyRegion,
    modes: ModeSelector,
    overlay: PerformanceOverlay,
    surfaces: S,
    frame_index: u64,
}

impl<S: SurfaceCollectionManager> ViewState<S> {
    /// Creates the state for a new view drawing through `surfaces`.
    pub fn new(config: ViewConfig, surfaces: S) -> Self {
        Self {
            config,
            viewport: ViewportTracker::new(),
            dirty: DirtyRegion::new(),
            modes: ModeSelector::new(),
            overlay: PerformanceOverlay::new(config.overlay),
            surfaces,
            frame_index: 0,
        }
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Returns the surface collection manager.
    #[inline]
    #[must_use]
    pub fn surfaces(&self) -> &S {
        &self.surfaces
    }

    /// Returns the surface collection manager mutably.
    #[inline]
    pub fn surfaces_mut(&mut self) -> &mut S {
        &mut self.surfaces
    }

    /// Returns the performance overlay.
    #[inline]
    #[must_use]
    pub fn overlay(&self) -> &PerformanceOverlay {
        &self.overlay
    }

    /// Returns the active rendering mode.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> RenderingMode {
        self.modes.mode()
    }

    /// Returns the current viewport.
    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    /// Returns the direction of the last viewport change.
    #[inline]
    #[must_use]
    pub fn scroll_direction(&self) -> ScrollDirection {
        self.viewport.scroll_direction()
    }

    /// Returns `true` while the user is dragging.
    #[inline]
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.viewport.is_scrolling()
    }

    /// Returns `true` if the last viewport change was a short jump.
    #[inline]
    #[must_use]
    pub fn is_viewport_scrolling(&self) -> bool {
        self.viewport.is_viewport_scrolling()
    }

    /// Sets whether the user is dragging.
    pub fn set_scrolling(&self, scrolling: bool) {
        self.viewport.set_scrolling(scrolling);
    }

    /// Returns a handle the input thread can use to set the dragging flag.
    #[must_use]
    pub fn scrolling_flag(&self) -> ScrollingFlag {
        self.viewport.scrolling_flag()
    }

    /// Returns the dirty area accumulated since the last frame started.
    #[inline]
    #[must_use]
    pub fn dirty_region(&self) -> &DirtyRegion {
        &self.dirty
    }

    /// Returns the number of [`draw_frame`](Self::draw_frame) calls so far.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }

    /// Replaces the content root.
    ///
    /// Clearing the content (`None`) or delivering a picture after the first
    /// layout returns the view to [`RenderingMode::AllTextures`]. Also turns
    /// the visual indicator and frame measurements on or off.
    ///
    /// Returns `true` when the surface collection queue is full and the
    /// caller should hold off further updates.
    pub fn set_base_layer(
        &mut self,
        root: Option<S::Root>,
        show_indicator: bool,
        after_first_layout: bool,
        tiles: &mut dyn TileManager,
    ) -> bool {
        if root.is_none() || after_first_layout {
            self.modes.reset();
        }
        let queue_full = self.surfaces.update_with_collection(root, after_first_layout);
        self.overlay.set_enabled(show_indicator);
        tiles.set_show_visual_indicator(show_indicator);
        queue_full
    }

    /// Moves a scrollable layer.
    pub fn scroll_layer(&mut self, layer_id: LayerId, x: i32, y: i32) {
        self.surfaces.update_scrollable_layer(layer_id, x, y);
    }

    /// Records a new viewport and pushes the matching texture ceiling to
    /// `tiles`.
    ///
    /// The ceiling is pushed on every call, including when the viewport is
    /// unchanged. Returns `true` if the viewport changed.
    pub fn set_viewport(&mut self, rect: Rect, scale: f64, tiles: &mut dyn TileManager) -> bool {
        let capacity = visible_texture_capacity(
            rect,
            scale,
            tiles.tile_size(),
            self.config.textures_per_tile(),
        );
        tiles.set_max_texture_count(capacity);
        self.viewport.set_viewport(rect, scale)
    }

    /// Adds a changed screen area to the dirty region.
    pub fn add_dirty_area(&mut self, rect: IntRect) {
        self.dirty.add(rect);
    }

    /// Prepares GPU state for drawing `request` and returns the frame's
    /// logical draw time.
    ///
    /// Recreates the shader and transfer queue resources if they were never
    /// created or the context was lost, offsets the GPU viewport by the
    /// running view animation, and records the request's viewport.
    pub fn setup_drawing(&mut self, request: &FrameRequest, env: &mut FrameEnv<'_>) -> HostTime {
        let tile_size = env.tiles.tile_size();

        let shader = env.tiles.shader();
        if shader.needs_init() {
            log::debug!("reinit shader");
            shader.init_resources();
        }
        let queue = env.tiles.transfer_queue();
        if queue.needs_init() {
            log::debug!("reinit transfer queue");
            queue.init_resources(tile_size);
        }

        let shader = env.tiles.shader();
        shader.setup_drawing(request);
        let delta = shader.calculate_animation_delta();

        let draw_rect = request.draw_rect;
        env.gpu.set_viewport(IntRect::new(
            draw_rect.x + delta.x,
            draw_rect.y - delta.y,
            draw_rect.width,
            draw_rect.height,
        ));

        let now = env.clock.now();
        self.set_viewport(request.visible_rect, request.scale, env.tiles);
        now
    }

    /// Draws one frame.
    ///
    /// See the [module docs](self) for the sequence. A frame with
    /// `should_draw == false` runs the same sequence (so the platform can
    /// prime textures and mode state) but skips the profiler boundary and
    /// the overlay.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ScaleCorrupted`] if the scale is out of range
    /// after upload and the policy is [`ScaleCorruptionPolicy::DropFrame`].
    /// Under [`ScaleCorruptionPolicy::Abort`] the process aborts instead.
    pub fn draw_frame(
        &mut self,
        request: &FrameRequest,
        env: &mut FrameEnv<'_>,
    ) -> Result<FrameOutcome, FrameError> {
        let frame_index = self.frame_index;
        self.frame_index += 1;
        let scale = request.scale;

        if request.should_draw {
            env.tiles.profiler_next_frame(request.visible_rect, scale);
        }
        env.tiles.increment_draw_count();

        let started = env.clock.now();
        env.tracer.frame_begin(&FrameBeginEvent {
            frame_index,
            now: started,
            scale,
            presenting: request.should_draw,
        });
        let mut summary = FrameSummaryBuilder::new(frame_index, started);

        log::trace!(
            "draw frame {frame_index}: rect {:?}, viewport {:?}, web view {:?}, clip {:?}, \
             scale {scale}",
            request.draw_rect,
            request.visible_rect,
            request.web_view_rect,
            request.screen_clip,
        );

        self.dirty.reset();

        if check_scale(scale, ScaleCheckStage::BeforeUpload, self.config.scale_range)
            == ScaleCheck::Warn
        {
            log::warn!("scale seems corrupted before update: {scale:e}");
        }

        // Upload: blit staged tiles, then pending images.
        begin_phase(env, &mut summary, frame_index, PhaseKind::Upload);
        env.tiles.transfer_queue().update_dirty_tiles();
        let mut status = DrawStatus::empty();
        if env.images.prepare_textures(&mut self.dirty) {
            status |= DrawStatus::DRAW;
        }
        end_phase(env, &mut summary, frame_index, PhaseKind::Upload);

        if check_scale(scale, ScaleCheckStage::AfterUpload, self.config.scale_range)
            == ScaleCheck::Fatal
        {
            return Err(self.scale_corrupted(scale));
        }

        begin_phase(env, &mut summary, frame_index, PhaseKind::Gather);
        env.tiles.gather_textures();
        end_phase(env, &mut summary, frame_index, PhaseKind::Gather);

        let timestamp = self.setup_drawing(request, env);
        summary.set_timestamp(timestamp);

        begin_phase(env, &mut summary, frame_index, PhaseKind::Composite);
        let fast_swap =
            self.is_scrolling() || self.mode() == RenderingMode::SingleSurfaceRendering;
        let drawn = self.surfaces.draw(
            &CollectionDrawRequest {
                timestamp,
                draw_rect: request.draw_rect,
                viewport: request.visible_rect,
                scale,
                fast_swap,
                should_draw: request.should_draw,
            },
            &mut self.dirty,
        );
        status |= drawn.status;
        end_phase(env, &mut summary, frame_index, PhaseKind::Composite);

        // Select: image textures compete with full and clipped layers.
        begin_phase(env, &mut summary, frame_index, PhaseKind::Select);
        let image_textures = env.images.texture_count();
        let demand = drawn.demand.with_image_textures(image_textures);
        log::trace!(
            "{image_textures} textures for images, {} full, {} clipped",
            demand.full,
            demand.clipped,
        );
        let budget = env
            .tiles
            .set_max_layer_texture_count(layer_texture_ceiling(&demand));
        let transition = self.modes.update(&demand, budget);
        if transition.requires_base_invalidation() {
            status |= DrawStatus::DRAW | DrawStatus::INVOKE;
        }
        if transition.changed() {
            env.tracer.mode_change(&ModeChangeEvent {
                frame_index,
                from: transition.previous,
                to: transition.mode,
                demand,
                budget: transition.effective_budget,
                base_invalidated: transition.requires_base_invalidation(),
            });
        }
        end_phase(env, &mut summary, frame_index, PhaseKind::Select);

        env.gpu.unbind_array_buffer();
        env.videos.delete_unused_textures();

        let invalidation = if status.contains(DrawStatus::DRAW) {
            let invalidation = self.dirty.invalidation(request.draw_rect);
            log::trace!("invalidation {invalidation:?}");
            env.tracer.invalidation(&InvalidationEvent {
                frame_index,
                invalidation,
            });
            invalidation
        } else {
            Invalidation::None
        };

        if request.should_draw {
            self.overlay.show_frame_info(
                request.draw_rect,
                drawn.collections_swapped,
                timestamp,
                env.gpu,
            );
        }

        let mode = self.mode();
        env.tracer
            .frame_summary(&summary.finish(mode, status, drawn.collections_swapped));

        Ok(FrameOutcome {
            status,
            invalidation,
            collections_swapped: drawn.collections_swapped,
            new_collection_has_animations: drawn.new_collection_has_animations,
            mode,
            timestamp,
        })
    }

    fn scale_corrupted(&self, scale: f64) -> FrameError {
        log::error!("scale seems corrupted after update: {scale:e}");
        match self.config.scale_corruption {
            ScaleCorruptionPolicy::Abort => std::process::abort(),
            ScaleCorruptionPolicy::DropFrame => FrameError::ScaleCorrupted { scale },
        }
    }
}

fn begin_phase(
    env: &mut FrameEnv<'_>,
    summary: &mut FrameSummaryBuilder,
    frame_index: u64,
    phase: PhaseKind,
) {
    let timestamp = env.clock.now();
    summary.phase_begin(phase, timestamp);
    env.tracer.phase_begin(&PhaseBeginEvent {
        frame_index,
        phase,
        timestamp,
    });
}

fn end_phase(
    env: &mut FrameEnv<'_>,
    summary: &mut FrameSummaryBuilder,
    frame_index: u64,
    phase: PhaseKind,
) {
    let timestamp = env.clock.now();
    summary.phase_end(phase, timestamp);
    env.tracer.phase_end(&PhaseEndEvent {
        frame_index,
        phase,
        timestamp,
    });
}
