// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-rate and swap-rate indicator.
//!
//! When enabled, [`PerformanceOverlay`] paints two strips along the top of
//! the frame using scissored clears:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │████████████ red: fps / max_fps           │  indicator_height
//! │██████ green: (swap counter + 1) / modulus│  indicator_height
//! │                                          │
//! ```
//!
//! The green bar advances once per surface collection swap and wraps, so a
//! bar that keeps moving means content keeps updating. While enabled the
//! overlay also records every frame delay and dumps the history to the log
//! at `debug` level when it fills up or when the overlay is turned off.
//!
//! The overlay never feeds anything back into the frame sequence.

use lamina_core::geometry::IntRect;
use lamina_core::time::{Duration, HostTime};

use crate::collaborators::{Color, GpuContext};
use crate::config::OverlayConfig;

/// Diagnostic strips drawn over presented frames.
#[derive(Debug)]
pub struct PerformanceOverlay {
    config: OverlayConfig,
    enabled: bool,
    prev_draw_time: Option<HostTime>,
    swap_counter: u32,
    delays: Vec<Duration>,
    total_measured: u64,
}

impl PerformanceOverlay {
    /// Creates a disabled overlay.
    #[must_use]
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            enabled: false,
            prev_draw_time: None,
            swap_counter: 0,
            delays: Vec::new(),
            total_measured: 0,
        }
    }

    /// Turns the overlay on or off.
    ///
    /// Turning it off dumps any recorded frame delays first.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled && !enabled {
            self.dump_measures();
        }
        self.enabled = enabled;
    }

    /// Returns `true` if the overlay is drawn.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the rotating swap counter.
    #[inline]
    #[must_use]
    pub fn swap_counter(&self) -> u32 {
        self.swap_counter
    }

    /// Returns frame delays recorded since the last dump.
    #[inline]
    #[must_use]
    pub fn recorded_delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Returns how many delays have been dumped so far.
    #[inline]
    #[must_use]
    pub fn total_dumped(&self) -> u64 {
        self.total_measured
    }

    /// Writes recorded frame delays to the log and clears them.
    pub fn dump_measures(&mut self) {
        for (i, delay) in (self.total_measured..).zip(&self.delays) {
            log::debug!("{i} delay: {:.0} ms", delay.as_millis_f64());
        }
        self.total_measured += self.delays.len() as u64;
        self.delays.clear();
    }

    /// Records the frame drawn at `now` and paints the strips over `rect`.
    ///
    /// Does nothing while disabled.
    pub fn show_frame_info(
        &mut self,
        rect: IntRect,
        collections_swapped: bool,
        now: HostTime,
        gpu: &mut dyn GpuContext,
    ) {
        if !self.enabled {
            return;
        }

        let delta = self
            .prev_draw_time
            .map(|prev| now.saturating_duration_since(prev));
        self.prev_draw_time = Some(now);

        if let Some(delta) = delta {
            self.delays.push(delta);
            if self.delays.len() >= self.config.max_measures {
                self.dump_measures();
            }
        }

        let height = self.config.indicator_height;
        let fps_strip = rect.with_height(height);
        let fps_ratio = delta.map_or(0.0, |d| fps_ratio(d, self.config.max_fps));
        gpu.clear_rect(fps_strip, Color::WHITE);
        gpu.clear_rect(
            fps_strip.with_width(scaled_width(fps_strip.width, fps_ratio)),
            Color::RED,
        );

        let modulus = self.config.swap_counter_modulus.max(1);
        if collections_swapped {
            self.swap_counter = (self.swap_counter + 1) % modulus;
        }

        let swap_strip = fps_strip.translate(0, height);
        let swap_ratio = f64::from(self.swap_counter + 1) / f64::from(modulus);
        gpu.clear_rect(swap_strip, Color::WHITE);
        gpu.clear_rect(
            swap_strip.with_width(scaled_width(swap_strip.width, swap_ratio)),
            Color::GREEN,
        );
    }
}

/// Instantaneous frame rate as a fraction of `max_fps`, capped at 1.
fn fps_ratio(delta: Duration, max_fps: u32) -> f64 {
    let secs = delta.as_secs_f64();
    if secs <= 0.0 || max_fps == 0 {
        return 1.0;
    }
    ((1.0 / secs) / f64::from(max_fps)).min(1.0)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "ratio is within 0..=1, so the result fits the strip width"
)]
fn scaled_width(width: i32, ratio: f64) -> i32 {
    (f64::from(width) * ratio) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeGpu;

    const FRAME: IntRect = IntRect::new(0, 0, 600, 400);

    fn overlay() -> PerformanceOverlay {
        let mut overlay = PerformanceOverlay::new(OverlayConfig::DEFAULT);
        overlay.set_enabled(true);
        overlay
    }

    #[test]
    fn disabled_overlay_draws_nothing() {
        let mut overlay = PerformanceOverlay::new(OverlayConfig::DEFAULT);
        let mut gpu = FakeGpu::default();
        overlay.show_frame_info(FRAME, true, HostTime(0), &mut gpu);
        assert!(gpu.clears.is_empty());
        assert_eq!(overlay.swap_counter(), 0);
    }

    #[test]
    fn draws_two_strips() {
        let mut overlay = overlay();
        let mut gpu = FakeGpu::default();
        overlay.show_frame_info(FRAME, false, HostTime(0), &mut gpu);
        overlay.show_frame_info(
            FRAME,
            false,
            HostTime(0) + Duration::from_millis(33),
            &mut gpu,
        );

        let last: Vec<_> = gpu.clears[4..].to_vec();
        assert_eq!(last[0], (IntRect::new(0, 0, 600, 10), Color::WHITE));
        // 1 / 0.033 s ≈ 30.3 fps, about half of 60.
        assert_eq!(last[1].1, Color::RED);
        assert_eq!(last[1].0.height, 10);
        assert!((300..=305).contains(&last[1].0.width), "{:?}", last[1]);
        assert_eq!(last[2], (IntRect::new(0, 10, 600, 10), Color::WHITE));
        assert_eq!(last[3], (IntRect::new(0, 10, 60, 10), Color::GREEN));
    }

    #[test]
    fn first_frame_has_empty_fps_bar() {
        let mut overlay = overlay();
        let mut gpu = FakeGpu::default();
        overlay.show_frame_info(FRAME, false, HostTime(500), &mut gpu);
        assert_eq!(gpu.clears[1], (IntRect::new(0, 0, 0, 10), Color::RED));
        assert!(overlay.recorded_delays().is_empty());
    }

    #[test]
    fn fps_bar_is_capped_at_strip_width() {
        let mut overlay = overlay();
        let mut gpu = FakeGpu::default();
        overlay.show_frame_info(FRAME, false, HostTime(1_000), &mut gpu);
        overlay.show_frame_info(FRAME, false, HostTime(1_000), &mut gpu);
        assert_eq!(gpu.clears[5], (IntRect::new(0, 0, 600, 10), Color::RED));
    }

    #[test]
    fn swap_counter_wraps() {
        let mut overlay = overlay();
        let mut gpu = FakeGpu::default();
        for i in 0..10 {
            overlay.show_frame_info(FRAME, true, HostTime(i), &mut gpu);
        }
        assert_eq!(overlay.swap_counter(), 0);
        overlay.show_frame_info(FRAME, true, HostTime(10), &mut gpu);
        assert_eq!(overlay.swap_counter(), 1);
        overlay.show_frame_info(FRAME, false, HostTime(11), &mut gpu);
        assert_eq!(overlay.swap_counter(), 1);
        let green = gpu.clears.last().unwrap();
        assert_eq!(green.0.width, 120);
    }

    #[test]
    fn history_is_dumped_when_full_or_disabled() {
        let config = OverlayConfig {
            max_measures: 3,
            ..OverlayConfig::DEFAULT
        };
        let mut overlay = PerformanceOverlay::new(config);
        overlay.set_enabled(true);
        let mut gpu = FakeGpu::default();
        for i in 0..4 {
            overlay.show_frame_info(FRAME, false, HostTime(i * 16_000_000), &mut gpu);
        }
        // Three deltas filled the history and triggered a dump.
        assert!(overlay.recorded_delays().is_empty());
        assert_eq!(overlay.total_dumped(), 3);

        overlay.show_frame_info(FRAME, false, HostTime(64_000_000), &mut gpu);
        assert_eq!(overlay.recorded_delays(), &[Duration::from_millis(16)]);

        overlay.set_enabled(false);
        assert!(overlay.recorded_delays().is_empty());
        assert_eq!(overlay.total_dumped(), 4);
    }
}
