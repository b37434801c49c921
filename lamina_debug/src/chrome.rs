// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format export.
//!
//! [`ChromeTraceSink`] collects frame events as they happen and
//! [`ChromeTraceSink::write`] emits them as [Chrome Trace Event Format][format]
//! JSON. Phases become duration slices, mode changes and invalidations become
//! instant events, and frame summaries carry per-phase timings in `args`.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use lamina_core::dirty::Invalidation;
use lamina_core::trace::{
    FrameBeginEvent, FrameSummary, InvalidationEvent, ModeChangeEvent, PhaseBeginEvent,
    PhaseEndEvent, TraceSink,
};

/// A [`TraceSink`] that buffers events as Chrome trace JSON objects.
#[derive(Debug, Default)]
pub struct ChromeTraceSink {
    events: Vec<Value>,
}

impl ChromeTraceSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the buffered trace event objects.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Writes the buffered events as a complete JSON array.
    ///
    /// The output is suitable for loading into `chrome://tracing` or
    /// [Perfetto](https://ui.perfetto.dev/).
    pub fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }
}

fn nanos_to_us(nanos: u64) -> f64 {
    nanos as f64 / 1000.0
}

impl TraceSink for ChromeTraceSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.events.push(json!({
            "ph": "i",
            "name": "FrameBegin",
            "cat": "Frame",
            "ts": nanos_to_us(e.now.nanos()),
            "pid": 0,
            "tid": 0,
            "s": "g",
            "args": {
                "frame_index": e.frame_index,
                "scale": e.scale,
                "presenting": e.presenting,
            }
        }));
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.events.push(json!({
            "ph": "B",
            "name": e.phase.as_str(),
            "cat": "Frame",
            "ts": nanos_to_us(e.timestamp.nanos()),
            "pid": 0,
            "tid": 0,
            "args": {
                "frame_index": e.frame_index,
            }
        }));
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.events.push(json!({
            "ph": "E",
            "name": e.phase.as_str(),
            "cat": "Frame",
            "ts": nanos_to_us(e.timestamp.nanos()),
            "pid": 0,
            "tid": 0,
            "args": {
                "frame_index": e.frame_index,
            }
        }));
    }

    fn on_mode_change(&mut self, e: &ModeChangeEvent) {
        self.events.push(json!({
            "ph": "i",
            "name": "ModeChange",
            "cat": "Mode",
            "ts": self.last_ts(),
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "frame_index": e.frame_index,
                "from": e.from.as_str(),
                "to": e.to.as_str(),
                "fixed": e.demand.fixed,
                "scrollable": e.demand.scrollable,
                "clipped": e.demand.clipped,
                "full": e.demand.full,
                "budget": e.budget,
                "base_invalidated": e.base_invalidated,
            }
        }));
    }

    fn on_invalidation(&mut self, e: &InvalidationEvent) {
        let rect = match e.invalidation {
            Invalidation::Rect(r) => json!([r.x, r.y, r.width, r.height]),
            Invalidation::None | Invalidation::FullScreen => Value::Null,
        };
        self.events.push(json!({
            "ph": "i",
            "name": "Invalidation",
            "cat": "Frame",
            "ts": self.last_ts(),
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "frame_index": e.frame_index,
                "full_screen": e.invalidation.is_full_screen(),
                "rect": rect,
            }
        }));
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.events.push(json!({
            "ph": "i",
            "name": "FrameSummary",
            "cat": "Summary",
            "ts": nanos_to_us(s.timestamp.nanos()),
            "pid": 0,
            "tid": 0,
            "s": "g",
            "args": {
                "frame_index": s.frame_index,
                "mode": s.mode.as_str(),
                "status": s.status.bits(),
                "collections_swapped": s.collections_swapped,
                "upload_us": nanos_to_us(s.upload_nanos),
                "gather_us": nanos_to_us(s.gather_nanos),
                "composite_us": nanos_to_us(s.composite_nanos),
                "select_us": nanos_to_us(s.select_nanos),
            }
        }));
    }
}

impl ChromeTraceSink {
    /// Events without their own timestamp are placed at the latest one seen.
    fn last_ts(&self) -> f64 {
        self.events
            .iter()
            .rev()
            .find_map(|e| e["ts"].as_f64())
            .unwrap_or(0.0)
    }
}
