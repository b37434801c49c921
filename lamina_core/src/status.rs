// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-status flags returned to the platform after each frame.
//!
//! The values match the platform's draw-functor protocol: `0` means the
//! frame is complete, [`DrawStatus::DRAW`] asks for another frame, and
//! [`DrawStatus::INVOKE`] asks for the draw functor to be invoked again even
//! if nothing on screen changed.

bitflags::bitflags! {
    /// Status bits accumulated during a frame.
    #[derive(Default)]
    pub struct DrawStatus: u32 {
        /// Content is still changing; schedule another draw.
        const DRAW = 0b01;
        /// Re-run the draw functor so the rendering mode can settle.
        const INVOKE = 0b10;
    }
}

impl DrawStatus {
    /// Returns `true` if another draw was requested.
    #[inline]
    #[must_use]
    pub fn needs_redraw(self) -> bool {
        self.contains(Self::DRAW)
    }
}
