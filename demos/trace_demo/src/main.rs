// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop that exercises the draw sequence and diagnostics.
//!
//! Drives a [`ViewState`] through 60 frames of a page scrolling down while
//! its layer texture demand climbs past what the tile pool can grant and
//! then falls back. Events go to both a
//! [`PrettyPrintSink`](lamina_debug::pretty::PrettyPrintSink) on stdout and a
//! [`ChromeTraceSink`](lamina_debug::chrome::ChromeTraceSink), which is
//! written to `trace.json` at the end.

use std::cell::Cell;
use std::fs::File;
use std::io::BufWriter;

use kurbo::Rect;
use lamina_core::dirty::DirtyRegion;
use lamina_core::geometry::IntRect;
use lamina_core::mode::TextureDemand;
use lamina_core::status::DrawStatus;
use lamina_core::time::{Clock, HostTime};
use lamina_core::trace::{
    FrameBeginEvent, FrameSummary, InvalidationEvent, ModeChangeEvent, PhaseBeginEvent,
    PhaseEndEvent, TraceSink, Tracer,
};
use lamina_core::viewport::TileSize;
use lamina_render::collaborators::{
    AnimationDelta, CollectionDrawOutcome, CollectionDrawRequest, Color, GpuContext,
    ImageManager, LayerId, ShaderProgram, SurfaceCollectionManager, TileManager, TransferQueue,
    VideoTextureManager,
};
use lamina_render::{FrameEnv, FrameRequest, ViewConfig, ViewState};

use lamina_debug::chrome::ChromeTraceSink;
use lamina_debug::pretty::PrettyPrintSink;

const FRAME_COUNT: u64 = 60;
/// Layer textures the simulated pool can hand out.
const LAYER_TEXTURE_CAP: usize = 24;
const SCREEN: IntRect = IntRect::new(0, 0, 1280, 720);

fn main() {
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut chrome = ChromeTraceSink::new();

    let mut tiles = SimTiles::default();
    let mut images = SimImages { pending: 4 };
    let mut videos = SimVideos;
    let mut gpu = SimGpu;
    let clock = SimClock::default();

    let mut state = ViewState::new(ViewConfig::high_end(), SimSurfaces::default());
    state.set_base_layer(Some(0), true, false, &mut tiles);

    for frame in 0..FRAME_COUNT {
        // Demand ramps up over the first half and back down over the second.
        let ramp = if frame < FRAME_COUNT / 2 {
            frame
        } else {
            FRAME_COUNT - frame
        };
        let full = usize::try_from(ramp).unwrap_or(usize::MAX);
        let surfaces = state.surfaces_mut();
        surfaces.demand = TextureDemand {
            fixed: 1,
            scrollable: full / 2,
            clipped: full / 2,
            full,
        };
        surfaces.frame = frame;

        if frame == 20 {
            state.scroll_layer(LayerId(3), 0, 120);
        }
        state.set_scrolling((10..20).contains(&frame));

        let top = frame as f64 * 8.0;
        let request = FrameRequest::new(
            SCREEN,
            Rect::new(0.0, top, f64::from(SCREEN.width), top + f64::from(SCREEN.height)),
            1.0,
        );

        let mut tee = Tee {
            a: &mut pretty,
            b: &mut chrome,
        };
        let mut env = FrameEnv {
            tiles: &mut tiles,
            images: &mut images,
            videos: &mut videos,
            gpu: &mut gpu,
            clock: &clock,
            tracer: Tracer::new(&mut tee),
        };
        let outcome = state
            .draw_frame(&request, &mut env)
            .expect("scale stays in range");
        if outcome.status.contains(DrawStatus::INVOKE) {
            println!("frame {frame}: mode is now {}", outcome.mode);
        }
    }

    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    chrome
        .write(&mut writer)
        .expect("failed to write Chrome trace");

    println!(
        "Wrote {path} ({} frames, tile texture ceiling {})",
        tiles.draw_count, tiles.max_textures,
    );
}

/// Forwards every event to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl std::fmt::Debug for Tee<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tee").finish_non_exhaustive()
    }
}

impl TraceSink for Tee<'_> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.a.on_frame_begin(e);
        self.b.on_frame_begin(e);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.a.on_phase_begin(e);
        self.b.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.a.on_phase_end(e);
        self.b.on_phase_end(e);
    }

    fn on_mode_change(&mut self, e: &ModeChangeEvent) {
        self.a.on_mode_change(e);
        self.b.on_mode_change(e);
    }

    fn on_invalidation(&mut self, e: &InvalidationEvent) {
        self.a.on_invalidation(e);
        self.b.on_invalidation(e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.a.on_frame_summary(s);
        self.b.on_frame_summary(s);
    }
}

// ---------------------------------------------------------------------------
// Simulated engine
// ---------------------------------------------------------------------------

/// Advances 250µs per read, starting at 1s.
#[derive(Debug)]
struct SimClock {
    now: Cell<u64>,
}

impl Default for SimClock {
    fn default() -> Self {
        Self {
            now: Cell::new(1_000_000_000),
        }
    }
}

impl Clock for SimClock {
    fn now(&self) -> HostTime {
        let now = self.now.get();
        self.now.set(now + 250_000);
        HostTime(now)
    }
}

#[derive(Debug, Default)]
struct SimShader {
    ready: bool,
}

impl ShaderProgram for SimShader {
    fn needs_init(&self) -> bool {
        !self.ready
    }

    fn init_resources(&mut self) {
        self.ready = true;
    }

    fn setup_drawing(&mut self, _request: &FrameRequest) {}

    fn calculate_animation_delta(&mut self) -> AnimationDelta {
        AnimationDelta::default()
    }
}

#[derive(Debug, Default)]
struct SimTransferQueue {
    ready: bool,
}

impl TransferQueue for SimTransferQueue {
    fn needs_init(&self) -> bool {
        !self.ready
    }

    fn init_resources(&mut self, _tile_size: TileSize) {
        self.ready = true;
    }

    fn update_dirty_tiles(&mut self) {}
}

#[derive(Debug, Default)]
struct SimTiles {
    shader: SimShader,
    queue: SimTransferQueue,
    max_textures: usize,
    draw_count: u64,
}

impl TileManager for SimTiles {
    fn tile_size(&self) -> TileSize {
        TileSize::DEFAULT
    }

    fn set_max_texture_count(&mut self, count: usize) {
        self.max_textures = count;
    }

    fn set_max_layer_texture_count(&mut self, count: usize) -> usize {
        count.min(LAYER_TEXTURE_CAP)
    }

    fn gather_textures(&mut self) {}

    fn shader(&mut self) -> &mut dyn ShaderProgram {
        &mut self.shader
    }

    fn transfer_queue(&mut self) -> &mut dyn TransferQueue {
        &mut self.queue
    }

    fn set_show_visual_indicator(&mut self, _show: bool) {}

    fn increment_draw_count(&mut self) {
        self.draw_count += 1;
    }

    fn profiler_next_frame(&mut self, _viewport: Rect, _scale: f64) {}
}

#[derive(Debug, Default)]
struct SimSurfaces {
    frame: u64,
    demand: TextureDemand,
}

impl SurfaceCollectionManager for SimSurfaces {
    type Root = u32;

    fn update_with_collection(&mut self, _root: Option<u32>, _after_first_layout: bool) -> bool {
        false
    }

    fn update_scrollable_layer(&mut self, _layer_id: LayerId, _x: i32, _y: i32) {}

    fn draw(
        &mut self,
        _request: &CollectionDrawRequest,
        dirty: &mut DirtyRegion,
    ) -> CollectionDrawOutcome {
        // A new collection lands every third frame and repaints a banner.
        let swapped = self.frame % 3 == 0;
        if swapped {
            dirty.add(IntRect::new(40, 200, 600, 80));
        }
        CollectionDrawOutcome {
            status: if swapped {
                DrawStatus::DRAW
            } else {
                DrawStatus::empty()
            },
            collections_swapped: swapped,
            new_collection_has_animations: false,
            demand: self.demand,
        }
    }
}

#[derive(Debug)]
struct SimImages {
    pending: u32,
}

impl ImageManager for SimImages {
    fn prepare_textures(&mut self, dirty: &mut DirtyRegion) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        dirty.add(IntRect::new(900, 100, 256, 256));
        self.pending > 0
    }

    fn texture_count(&self) -> usize {
        2
    }
}

#[derive(Debug)]
struct SimVideos;

impl VideoTextureManager for SimVideos {
    fn delete_unused_textures(&mut self) {}
}

#[derive(Debug)]
struct SimGpu;

impl GpuContext for SimGpu {
    fn set_viewport(&mut self, _rect: IntRect) {}

    fn unbind_array_buffer(&mut self) {}

    fn clear_rect(&mut self, _rect: IntRect, _color: Color) {}
}
