// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame draw orchestration for lamina.
//!
//! This crate owns the per-view compositing state of a tiled GPU renderer
//! and drives one composited frame at a time:
//!
//! - [`ViewState`] — the orchestrator. It tracks viewport and dirty state,
//!   sequences resource setup, tile upload, texture gathering, and surface
//!   drawing, re-evaluates the rendering mode under the texture budget, and
//!   computes what the platform must redraw next.
//! - [`collaborators`] — traits for the engine pieces the orchestrator
//!   drives but does not implement (tile manager, surface collections,
//!   image and video texture managers, the GPU context).
//! - [`PerformanceOverlay`] — optional frame-rate and swap-rate strips drawn
//!   over the frame.
//! - [`ViewConfig`] — tuning knobs and the policy for a corrupted scale.
//!
//! All GPU work happens on the thread that calls
//! [`ViewState::draw_frame`]; `&mut self` on every drawing entry point keeps
//! it exclusive for the duration of a frame.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Forwards frame events to the
//!   [`Tracer`](lamina_core::trace::Tracer) passed in [`FrameEnv`].

pub mod clock;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod frame;
pub mod overlay;
pub mod view_state;

pub use clock::SystemClock;
pub use config::{OverlayConfig, ScaleCorruptionPolicy, ScaleRange, ViewConfig};
pub use error::FrameError;
pub use frame::{FrameOutcome, FrameRequest};
pub use overlay::PerformanceOverlay;
pub use view_state::{FrameEnv, ViewState};

#[cfg(test)]
mod fakes;
