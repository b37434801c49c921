// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view compositing state for a tiled, GPU-accelerated renderer.
//!
//! `lamina_core` holds the parts of the compositor that decide *how much* to
//! draw and *how*, independent of any GPU context. It is `no_std` compatible
//! (with `alloc`) so every decision can be unit-tested without a device.
//!
//! # Architecture
//!
//! Each frame, the orchestrator in `lamina_render` threads state through these
//! modules:
//!
//! ```text
//!   set_viewport ──► ViewportTracker ──► visible_texture_capacity
//!                                              │
//!   add_dirty_area ──► DirtyRegion             ▼
//!                          │           TileManager ceiling
//!                          │
//!   draw ──► TextureDemand ──► ModeSelector ──► ModeTransition
//!                          │
//!                          ▼
//!                    Invalidation ──► caller's damage tracker
//! ```
//!
//! **[`viewport`]** — Current viewport and scale, scroll direction, and the
//! derived "short programmatic scroll" flag.
//!
//! **[`dirty`]** — Accumulated cross-frame dirty rectangle and the post-draw
//! invalidation rule (including the full-screen sentinel).
//!
//! **[`mode`]** — Texture demand, the ordered [`RenderingMode`](mode::RenderingMode)
//! enumeration, and the hysteresis state machine that picks one under a
//! texture budget.
//!
//! **[`status`]** — Draw-status flags returned to the platform.
//!
//! **[`geometry`]** — Integer rectangles for screen-space damage.
//!
//! **[`time`]** — Monotonic host time and the [`Clock`](time::Clock) seam.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame instrumentation, with a zero-overhead [`Tracer`](trace::Tracer).
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod dirty;
pub mod geometry;
pub mod mode;
pub mod status;
pub mod time;
pub mod trace;
pub mod viewport;
