// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame errors.

use thiserror::Error;

/// Reasons a frame could not be completed.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum FrameError {
    /// The content scale was out of range after tile upload, which points at
    /// state corrupted by a concurrent layout. Only returned under
    /// [`ScaleCorruptionPolicy::DropFrame`](crate::ScaleCorruptionPolicy::DropFrame).
    #[error("scale corrupted after tile upload: {scale:e}")]
    ScaleCorrupted {
        /// The offending scale.
        scale: f64,
    },
}
