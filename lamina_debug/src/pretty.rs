// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in microseconds.

use std::io::Write;

use lamina_core::dirty::Invalidation;
use lamina_core::time::HostTime;
use lamina_core::trace::{
    FrameBeginEvent, FrameSummary, InvalidationEvent, ModeChangeEvent, PhaseBeginEvent,
    PhaseEndEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn us(nanos: u64) -> f64 {
    nanos as f64 / 1000.0
}

fn host_us(t: HostTime) -> f64 {
    us(t.nanos())
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] frame={} now={:.1}µs scale={} {}",
            e.frame_index,
            host_us(e.now),
            e.scale,
            if e.presenting { "present" } else { "prime" },
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.as_str(),
            host_us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.as_str(),
            host_us(e.timestamp),
        );
    }

    fn on_mode_change(&mut self, e: &ModeChangeEvent) {
        let d = e.demand;
        let _ = writeln!(
            self.writer,
            "[mode] frame={} {} -> {} fixed={} scrollable={} clipped={} full={} budget={}{}",
            e.frame_index,
            e.from,
            e.to,
            d.fixed,
            d.scrollable,
            d.clipped,
            d.full,
            e.budget,
            if e.base_invalidated { " inval-base" } else { "" },
        );
    }

    fn on_invalidation(&mut self, e: &InvalidationEvent) {
        let _ = match e.invalidation {
            Invalidation::None => writeln!(self.writer, "[inval] frame={} none", e.frame_index),
            Invalidation::FullScreen => {
                writeln!(self.writer, "[inval] frame={} full-screen", e.frame_index)
            }
            Invalidation::Rect(r) => writeln!(
                self.writer,
                "[inval] frame={} rect=({}, {}, {}, {})",
                e.frame_index, r.x, r.y, r.width, r.height,
            ),
        };
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} mode={} status={:#04b} swapped={} upload={:.1}µs \
             gather={:.1}µs composite={:.1}µs select={:.1}µs",
            s.frame_index,
            s.mode,
            s.status.bits(),
            s.collections_swapped,
            us(s.upload_nanos),
            us(s.gather_nanos),
            us(s.composite_nanos),
            us(s.select_nanos),
        );
    }
}
