// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame draw sequence.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! frame orchestrator calls at each stage. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects phase timestamps during a frame and
//! produces a [`FrameSummary`] at the end.

use crate::dirty::Invalidation;
use crate::mode::{RenderingMode, TextureDemand};
use crate::status::DrawStatus;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which stage of the draw sequence is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Blitting decoded tiles and uploading pending images.
    Upload,
    /// Tile texture reclamation and assignment.
    Gather,
    /// Surface collection drawing.
    Composite,
    /// Rendering-mode re-evaluation.
    Select,
}

impl PhaseKind {
    /// All phases in execution order.
    pub const ALL: [Self; 4] = [Self::Upload, Self::Gather, Self::Composite, Self::Select];

    /// Returns a short, stable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Gather => "gather",
            Self::Composite => "composite",
            Self::Select => "select",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Upload => 0,
            Self::Gather => 1,
            Self::Composite => 2,
            Self::Select => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a frame starts.
#[derive(Clone, Copy, Debug)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host time when the frame started.
    pub now: HostTime,
    /// Content scale requested for the frame.
    pub scale: f64,
    /// Whether the frame will be presented (`false` for priming passes).
    pub presenting: bool,
}

/// Marks the beginning of a draw phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Host time at the start of the phase.
    pub timestamp: HostTime,
}

/// Marks the end of a draw phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Host time at the end of the phase.
    pub timestamp: HostTime,
}

/// Emitted when the rendered mode changes.
#[derive(Clone, Copy, Debug)]
pub struct ModeChangeEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Mode before the change.
    pub from: RenderingMode,
    /// Mode after the change.
    pub to: RenderingMode,
    /// Demand that drove the decision (image textures included).
    pub demand: TextureDemand,
    /// Budget the demand was tested against.
    pub budget: usize,
    /// Whether the base surface was invalidated.
    pub base_invalidated: bool,
}

/// Emitted when a frame hands an invalidation back to the platform.
#[derive(Clone, Copy, Debug)]
pub struct InvalidationEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// What must be redrawn.
    pub invalidation: Invalidation,
}

/// Per-frame summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Logical draw time of the frame.
    pub timestamp: HostTime,
    /// Rendering mode after the frame.
    pub mode: RenderingMode,
    /// Status returned to the platform.
    pub status: DrawStatus,
    /// Whether the active surface collection was swapped.
    pub collections_swapped: bool,
    /// Upload phase duration in nanoseconds (0 if not measured).
    pub upload_nanos: u64,
    /// Gather phase duration in nanoseconds (0 if not measured).
    pub gather_nanos: u64,
    /// Composite phase duration in nanoseconds (0 if not measured).
    pub composite_nanos: u64,
    /// Select phase duration in nanoseconds (0 if not measured).
    pub select_nanos: u64,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame orchestrator.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame starts.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called at the beginning of a draw phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a draw phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called when the rendered mode changes.
    fn on_mode_change(&mut self, e: &ModeChangeEvent) {
        _ = e;
    }

    /// Called when a frame produces an invalidation.
    fn on_invalidation(&mut self, e: &InvalidationEvent) {
        _ = e;
    }

    /// Called with the per-frame summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Default for Tracer<'_> {
    fn default() -> Self {
        Self::none()
    }
}

macro_rules! dispatch {
    ($self:ident, $method:ident, $e:ident) => {{
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = $e;
        }
    }};
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        dispatch!(self, on_frame_begin, e);
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        dispatch!(self, on_phase_begin, e);
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        dispatch!(self, on_phase_end, e);
    }

    /// Emits a [`ModeChangeEvent`].
    #[inline]
    pub fn mode_change(&mut self, e: &ModeChangeEvent) {
        dispatch!(self, on_mode_change, e);
    }

    /// Emits an [`InvalidationEvent`].
    #[inline]
    pub fn invalidation(&mut self, e: &InvalidationEvent) {
        dispatch!(self, on_invalidation, e);
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        dispatch!(self, on_frame_summary, s);
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps during a frame and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    frame_index: u64,
    timestamp: HostTime,
    phase_starts: [Option<HostTime>; 4],
    phase_ends: [Option<HostTime>; 4],
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given frame.
    #[must_use]
    pub fn new(frame_index: u64, timestamp: HostTime) -> Self {
        Self {
            frame_index,
            timestamp,
            phase_starts: [None; 4],
            phase_ends: [None; 4],
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_starts[phase.index()] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_ends[phase.index()] = Some(t);
    }

    /// Replaces the frame's logical draw time.
    ///
    /// The draw time is only known once setup has run, partway through the
    /// frame.
    pub fn set_timestamp(&mut self, timestamp: HostTime) {
        self.timestamp = timestamp;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(
        self,
        mode: RenderingMode,
        status: DrawStatus,
        collections_swapped: bool,
    ) -> FrameSummary {
        FrameSummary {
            frame_index: self.frame_index,
            timestamp: self.timestamp,
            mode,
            status,
            collections_swapped,
            upload_nanos: self.phase_duration(PhaseKind::Upload),
            gather_nanos: self.phase_duration(PhaseKind::Gather),
            composite_nanos: self.phase_duration(PhaseKind::Composite),
            select_nanos: self.phase_duration(PhaseKind::Select),
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> u64 {
        let idx = phase.index();
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).nanos(),
            _ => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> FrameBeginEvent {
        FrameBeginEvent {
            frame_index: 42,
            now: HostTime(1_000_000),
            scale: 1.5,
            presenting: true,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_frame_begin(&sample_begin());
        sink.on_mode_change(&ModeChangeEvent {
            frame_index: 0,
            from: RenderingMode::AllTextures,
            to: RenderingMode::SingleSurfaceRendering,
            demand: TextureDemand::default(),
            budget: 0,
            base_invalidated: true,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame_begin(&sample_begin());
        tracer.invalidation(&InvalidationEvent {
            frame_index: 42,
            invalidation: Invalidation::FullScreen,
        });
    }

    #[test]
    fn summary_builder_computes_durations() {
        let mut builder = FrameSummaryBuilder::new(42, HostTime(0));
        builder.set_timestamp(HostTime(1_000_000));

        builder.phase_begin(PhaseKind::Upload, HostTime(1_000_000));
        builder.phase_end(PhaseKind::Upload, HostTime(1_000_100));
        builder.phase_begin(PhaseKind::Gather, HostTime(1_000_100));
        builder.phase_end(PhaseKind::Gather, HostTime(1_000_500));
        builder.phase_begin(PhaseKind::Composite, HostTime(1_000_500));
        builder.phase_end(PhaseKind::Composite, HostTime(1_002_000));
        builder.phase_begin(PhaseKind::Select, HostTime(1_002_000));
        builder.phase_end(PhaseKind::Select, HostTime(1_002_050));

        let summary = builder.finish(RenderingMode::ClippedTextures, DrawStatus::DRAW, true);
        assert_eq!(summary.upload_nanos, 100);
        assert_eq!(summary.gather_nanos, 400);
        assert_eq!(summary.composite_nanos, 1500);
        assert_eq!(summary.select_nanos, 50);
        assert_eq!(summary.frame_index, 42);
        assert_eq!(summary.timestamp, HostTime(1_000_000));
        assert_eq!(summary.mode, RenderingMode::ClippedTextures);
        assert!(summary.collections_swapped);
    }

    #[test]
    fn summary_builder_missing_phases_are_zero() {
        let builder = FrameSummaryBuilder::new(1, HostTime(5));
        let summary = builder.finish(RenderingMode::AllTextures, DrawStatus::empty(), false);
        assert_eq!(summary.upload_nanos, 0);
        assert_eq!(summary.gather_nanos, 0);
        assert_eq!(summary.composite_nanos, 0);
        assert_eq!(summary.select_nanos, 0);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
                self.frames.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { frames: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.frame_begin(&sample_begin());
        drop(tracer);
        assert_eq!(sink.frames, &[42]);
    }
}
