// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view configuration.
//!
//! [`ViewConfig`] is a plain `Copy` value fixed at construction. The
//! [`high_end`](ViewConfig::high_end) and [`low_end`](ViewConfig::low_end)
//! presets differ only in how many tile textures are reserved per visible
//! tile.

/// Content scales outside this range are treated as suspect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRange {
    /// Smallest plausible scale.
    pub min: f64,
    /// Largest plausible scale.
    pub max: f64,
}

impl ScaleRange {
    /// The default plausible range, `0.1..=10.0`.
    pub const DEFAULT: Self = Self {
        min: 0.1,
        max: 10.0,
    };

    /// Returns `true` unless `scale` is below `min` or above `max`.
    ///
    /// NaN compares false against both bounds, so it is not flagged.
    #[inline]
    #[must_use]
    pub fn contains(&self, scale: f64) -> bool {
        let below = scale < self.min;
        let above = scale > self.max;
        !below && !above
    }
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What to do when the scale is found corrupted after tile upload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScaleCorruptionPolicy {
    /// Log and abort the process.
    #[default]
    Abort,
    /// Log, skip the rest of the frame, and return
    /// [`FrameError::ScaleCorrupted`](crate::FrameError::ScaleCorrupted).
    DropFrame,
}

/// Point in the draw sequence at which a scale is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScaleCheckStage {
    /// Before tiles and images are uploaded.
    BeforeUpload,
    /// After tiles and images are uploaded.
    AfterUpload,
}

/// Verdict of [`check_scale`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScaleCheck {
    /// Scale is plausible.
    Ok,
    /// Scale is suspect; log and carry on.
    Warn,
    /// Scale is suspect after upload; state is corrupted.
    Fatal,
}

/// Classifies `scale` at `stage`.
///
/// Only an out-of-range scale seen after upload is fatal. The same value
/// seen before upload is a warning.
#[must_use]
pub fn check_scale(scale: f64, stage: ScaleCheckStage, range: ScaleRange) -> ScaleCheck {
    if range.contains(scale) {
        return ScaleCheck::Ok;
    }
    match stage {
        ScaleCheckStage::BeforeUpload => ScaleCheck::Warn,
        ScaleCheckStage::AfterUpload => ScaleCheck::Fatal,
    }
}

/// Tuning for the [`PerformanceOverlay`](crate::PerformanceOverlay).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Height of each indicator strip in pixels.
    pub indicator_height: i32,
    /// Frame rate that fills the fps strip.
    pub max_fps: u32,
    /// Number of swaps after which the swap strip wraps.
    pub swap_counter_modulus: u32,
    /// Frame delays held before the history is dumped to the log.
    pub max_measures: usize,
}

impl OverlayConfig {
    /// Default overlay tuning.
    pub const DEFAULT: Self = Self {
        indicator_height: 10,
        max_fps: 60,
        swap_counter_modulus: 10,
        max_measures: 2000,
    };
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration for a [`ViewState`](crate::ViewState).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfig {
    /// Whether the GPU can afford four textures per visible tile rather than
    /// two.
    pub high_end_gfx: bool,
    /// Plausible content scales.
    pub scale_range: ScaleRange,
    /// Reaction to a scale corrupted mid-frame.
    pub scale_corruption: ScaleCorruptionPolicy,
    /// Overlay tuning.
    pub overlay: OverlayConfig,
}

impl ViewConfig {
    /// Configuration for capable GPUs.
    #[must_use]
    pub const fn high_end() -> Self {
        Self {
            high_end_gfx: true,
            ..Self::low_end()
        }
    }

    /// Configuration for constrained GPUs.
    #[must_use]
    pub const fn low_end() -> Self {
        Self {
            high_end_gfx: false,
            scale_range: ScaleRange::DEFAULT,
            scale_corruption: ScaleCorruptionPolicy::Abort,
            overlay: OverlayConfig::DEFAULT,
        }
    }

    /// Returns the number of textures reserved per visible tile.
    #[inline]
    #[must_use]
    pub const fn textures_per_tile(&self) -> u32 {
        if self.high_end_gfx { 4 } else { 2 }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::low_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_in_tile_multiplier() {
        assert_eq!(ViewConfig::high_end().textures_per_tile(), 4);
        assert_eq!(ViewConfig::low_end().textures_per_tile(), 2);
        assert_eq!(ViewConfig::default(), ViewConfig::low_end());
        assert_eq!(
            ViewConfig::high_end().scale_corruption,
            ScaleCorruptionPolicy::Abort
        );
    }

    #[test]
    fn scale_range_is_inclusive() {
        let range = ScaleRange::DEFAULT;
        assert!(range.contains(0.1));
        assert!(range.contains(10.0));
        assert!(range.contains(1.0));
        assert!(!range.contains(0.05));
        assert!(!range.contains(10.5));
    }

    #[test]
    fn nan_scale_is_not_flagged() {
        let range = ScaleRange::DEFAULT;
        assert!(range.contains(f64::NAN), "NaN fails both bound comparisons");
        assert_eq!(
            check_scale(f64::NAN, ScaleCheckStage::AfterUpload, range),
            ScaleCheck::Ok
        );
    }

    #[test]
    fn out_of_range_is_fatal_only_after_upload() {
        let range = ScaleRange::DEFAULT;
        assert_eq!(
            check_scale(1.0, ScaleCheckStage::AfterUpload, range),
            ScaleCheck::Ok
        );
        assert_eq!(
            check_scale(25.0, ScaleCheckStage::BeforeUpload, range),
            ScaleCheck::Warn
        );
        assert_eq!(
            check_scale(25.0, ScaleCheckStage::AfterUpload, range),
            ScaleCheck::Fatal
        );
        assert_eq!(
            check_scale(0.0, ScaleCheckStage::BeforeUpload, range),
            ScaleCheck::Warn
        );
    }
}
