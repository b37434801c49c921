// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory collaborators for unit tests.
//!
//! Every fake appends a short tag to a shared journal when called, so tests
//! can assert on the order of calls across collaborators.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::Rect;
use lamina_core::dirty::DirtyRegion;
use lamina_core::geometry::IntRect;
use lamina_core::time::{Clock, HostTime};
use lamina_core::trace::Tracer;
use lamina_core::viewport::TileSize;

use crate::collaborators::{
    AnimationDelta, CollectionDrawOutcome, CollectionDrawRequest, Color, GpuContext,
    ImageManager, LayerId, ShaderProgram, SurfaceCollectionManager, TileManager, TransferQueue,
    VideoTextureManager,
};
use crate::frame::FrameRequest;
use crate::view_state::FrameEnv;

pub(crate) type Journal = Rc<RefCell<Vec<&'static str>>>;

fn log(journal: &Journal, call: &'static str) {
    journal.borrow_mut().push(call);
}

#[derive(Debug)]
pub(crate) struct FakeShader {
    journal: Journal,
    pub(crate) needs_init: bool,
    pub(crate) inits: usize,
    pub(crate) delta: AnimationDelta,
    pub(crate) last_request: Option<FrameRequest>,
}

impl ShaderProgram for FakeShader {
    fn needs_init(&self) -> bool {
        self.needs_init
    }

    fn init_resources(&mut self) {
        log(&self.journal, "shader.init");
        self.needs_init = false;
        self.inits += 1;
    }

    fn setup_drawing(&mut self, request: &FrameRequest) {
        log(&self.journal, "shader.setup_drawing");
        self.last_request = Some(*request);
    }

    fn calculate_animation_delta(&mut self) -> AnimationDelta {
        log(&self.journal, "shader.animation_delta");
        self.delta
    }
}

#[derive(Debug)]
pub(crate) struct FakeTransferQueue {
    journal: Journal,
    pub(crate) needs_init: bool,
    pub(crate) init_sizes: Vec<TileSize>,
}

impl TransferQueue for FakeTransferQueue {
    fn needs_init(&self) -> bool {
        self.needs_init
    }

    fn init_resources(&mut self, tile_size: TileSize) {
        log(&self.journal, "queue.init");
        self.needs_init = false;
        self.init_sizes.push(tile_size);
    }

    fn update_dirty_tiles(&mut self) {
        log(&self.journal, "queue.update_dirty_tiles");
    }
}

#[derive(Debug)]
pub(crate) struct FakeTiles {
    journal: Journal,
    pub(crate) tile_size: TileSize,
    pub(crate) shader: FakeShader,
    pub(crate) queue: FakeTransferQueue,
    pub(crate) max_texture_counts: Vec<usize>,
    pub(crate) layer_requests: Vec<usize>,
    /// Ceiling the pool can actually grant for layers.
    pub(crate) layer_cap: Option<usize>,
    pub(crate) draw_count: u32,
    pub(crate) profiler_frames: Vec<(Rect, f64)>,
    pub(crate) show_indicator: bool,
}

impl TileManager for FakeTiles {
    fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    fn set_max_texture_count(&mut self, count: usize) {
        log(&self.journal, "tiles.set_max_texture_count");
        self.max_texture_counts.push(count);
    }

    fn set_max_layer_texture_count(&mut self, count: usize) -> usize {
        log(&self.journal, "tiles.set_max_layer_texture_count");
        self.layer_requests.push(count);
        self.layer_cap.map_or(count, |cap| count.min(cap))
    }

    fn gather_textures(&mut self) {
        log(&self.journal, "tiles.gather_textures");
    }

    fn shader(&mut self) -> &mut dyn ShaderProgram {
        &mut self.shader
    }

    fn transfer_queue(&mut self) -> &mut dyn TransferQueue {
        &mut self.queue
    }

    fn set_show_visual_indicator(&mut self, show: bool) {
        log(&self.journal, "tiles.set_show_visual_indicator");
        self.show_indicator = show;
    }

    fn increment_draw_count(&mut self) {
        log(&self.journal, "tiles.increment_draw_count");
        self.draw_count += 1;
    }

    fn profiler_next_frame(&mut self, viewport: Rect, scale: f64) {
        log(&self.journal, "tiles.profiler_next_frame");
        self.profiler_frames.push((viewport, scale));
    }
}

#[derive(Debug)]
pub(crate) struct FakeSurfaces {
    journal: Journal,
    pub(crate) outcome: CollectionDrawOutcome,
    /// Screen area reported as repainted on every draw.
    pub(crate) repaint: Option<IntRect>,
    pub(crate) requests: Vec<CollectionDrawRequest>,
    pub(crate) roots: Vec<(Option<u32>, bool)>,
    pub(crate) queue_full: bool,
    pub(crate) scrolls: Vec<(LayerId, i32, i32)>,
}

impl SurfaceCollectionManager for FakeSurfaces {
    type Root = u32;

    fn update_with_collection(&mut self, root: Option<u32>, after_first_layout: bool) -> bool {
        log(&self.journal, "surfaces.update");
        self.roots.push((root, after_first_layout));
        self.queue_full
    }

    fn update_scrollable_layer(&mut self, layer_id: LayerId, x: i32, y: i32) {
        log(&self.journal, "surfaces.scroll");
        self.scrolls.push((layer_id, x, y));
    }

    fn draw(
        &mut self,
        request: &CollectionDrawRequest,
        dirty: &mut DirtyRegion,
    ) -> CollectionDrawOutcome {
        log(&self.journal, "surfaces.draw");
        self.requests.push(*request);
        if let Some(rect) = self.repaint {
            dirty.add(rect);
        }
        self.outcome
    }
}

#[derive(Debug)]
pub(crate) struct FakeImages {
    journal: Journal,
    pub(crate) pending: bool,
    pub(crate) count: usize,
    pub(crate) repaint: Option<IntRect>,
}

impl ImageManager for FakeImages {
    fn prepare_textures(&mut self, dirty: &mut DirtyRegion) -> bool {
        log(&self.journal, "images.prepare");
        if let Some(rect) = self.repaint {
            dirty.add(rect);
        }
        self.pending
    }

    fn texture_count(&self) -> usize {
        log(&self.journal, "images.count");
        self.count
    }
}

#[derive(Debug)]
pub(crate) struct FakeVideos {
    journal: Journal,
    pub(crate) cleanups: usize,
}

impl VideoTextureManager for FakeVideos {
    fn delete_unused_textures(&mut self) {
        log(&self.journal, "videos.delete_unused");
        self.cleanups += 1;
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeGpu {
    journal: Journal,
    pub(crate) viewports: Vec<IntRect>,
    pub(crate) unbinds: usize,
    pub(crate) clears: Vec<(IntRect, Color)>,
}

impl GpuContext for FakeGpu {
    fn set_viewport(&mut self, rect: IntRect) {
        log(&self.journal, "gpu.set_viewport");
        self.viewports.push(rect);
    }

    fn unbind_array_buffer(&mut self) {
        log(&self.journal, "gpu.unbind_array_buffer");
        self.unbinds += 1;
    }

    fn clear_rect(&mut self, rect: IntRect, color: Color) {
        self.clears.push((rect, color));
    }
}

/// Clock that advances by a fixed step on every read.
#[derive(Debug)]
pub(crate) struct ScriptedClock {
    next: Cell<u64>,
    step: u64,
}

impl ScriptedClock {
    pub(crate) fn stepping(step: u64) -> Self {
        Self {
            next: Cell::new(0),
            step,
        }
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> HostTime {
        let now = self.next.get();
        self.next.set(now + self.step);
        HostTime(now)
    }
}

/// The per-frame collaborators a test drives a view with, sharing a journal.
#[derive(Debug)]
pub(crate) struct Harness {
    pub(crate) journal: Journal,
    pub(crate) tiles: FakeTiles,
    pub(crate) images: FakeImages,
    pub(crate) videos: FakeVideos,
    pub(crate) gpu: FakeGpu,
    pub(crate) clock: ScriptedClock,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let journal = Journal::default();
        Self {
            tiles: FakeTiles {
                journal: journal.clone(),
                tile_size: TileSize::DEFAULT,
                shader: FakeShader {
                    journal: journal.clone(),
                    needs_init: true,
                    inits: 0,
                    delta: AnimationDelta::default(),
                    last_request: None,
                },
                queue: FakeTransferQueue {
                    journal: journal.clone(),
                    needs_init: true,
                    init_sizes: Vec::new(),
                },
                max_texture_counts: Vec::new(),
                layer_requests: Vec::new(),
                layer_cap: None,
                draw_count: 0,
                profiler_frames: Vec::new(),
                show_indicator: false,
            },
            images: FakeImages {
                journal: journal.clone(),
                pending: false,
                count: 0,
                repaint: None,
            },
            videos: FakeVideos {
                journal: journal.clone(),
                cleanups: 0,
            },
            gpu: FakeGpu {
                journal: journal.clone(),
                ..FakeGpu::default()
            },
            clock: ScriptedClock::stepping(1_000_000),
            journal,
        }
    }

    /// Returns a surface collection manager logging into the same journal.
    pub(crate) fn surfaces(&self) -> FakeSurfaces {
        FakeSurfaces {
            journal: self.journal.clone(),
            outcome: CollectionDrawOutcome::default(),
            repaint: None,
            requests: Vec::new(),
            roots: Vec::new(),
            queue_full: false,
            scrolls: Vec::new(),
        }
    }

    pub(crate) fn env(&mut self) -> FrameEnv<'_> {
        self.env_traced(Tracer::none())
    }

    pub(crate) fn env_traced<'a>(&'a mut self, tracer: Tracer<'a>) -> FrameEnv<'a> {
        FrameEnv {
            tiles: &mut self.tiles,
            images: &mut self.images,
            videos: &mut self.videos,
            gpu: &mut self.gpu,
            clock: &self.clock,
            tracer,
        }
    }

    /// Drains and returns the journal.
    pub(crate) fn take_calls(&self) -> Vec<&'static str> {
        std::mem::take(&mut *self.journal.borrow_mut())
    }
}
