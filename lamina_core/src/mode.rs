// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture budgeting and rendering-mode selection.
//!
//! Layers compete with tiles for a fixed pool of GPU texture memory. Each
//! frame the surface collection reports a [`TextureDemand`], an estimate of
//! how many textures each rendering strategy would need. The
//! [`ModeSelector`] then picks the richest [`RenderingMode`] that fits the
//! budget.
//!
//! # Budget
//!
//! [`layer_texture_ceiling`] asks for twice the full-fidelity demand plus one
//! texture of slack. The tile manager may grant less; the *granted* value is
//! the budget used for selection.
//!
//! # Hysteresis
//!
//! Once the view has collapsed to [`RenderingMode::SingleSurfaceRendering`],
//! the budget is halved before testing. Climbing back out therefore needs
//! about twice the textures that caused the collapse, so a demand sitting
//! right at the boundary does not flip the mode every frame.
//!
//! # Transition rule
//!
//! [`select_mode`] is a pure function of the current mode, the demand, and
//! the budget:
//!
//! 1. Start from `SingleSurfaceRendering` and test `fixed`, `scrollable`,
//!    `clipped`, `full` in that order. Each count strictly below the budget
//!    upgrades the candidate to the matching richer mode.
//! 2. With no budget and no full demand there is nothing to render, so the
//!    candidate is `AllTextures`.
//! 3. The base surface must be invalidated when the candidate improves on
//!    the current mode without fully recovering to `AllTextures`, or when it
//!    degrades past `ClippedTextures`.
//! 4. `ScrollableAndFixedLayers` and `FixedLayers` have no renderer yet and
//!    collapse to `SingleSurfaceRendering`.

use core::fmt;

/// Estimated GPU textures needed by each rendering strategy.
///
/// By construction `full >= clipped >= scrollable >= fixed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureDemand {
    /// Textures for fixed-position layers only.
    pub fixed: usize,
    /// Textures for scrollable and fixed layers.
    pub scrollable: usize,
    /// Textures for every layer, clipped to the visible area.
    pub clipped: usize,
    /// Textures for every layer at full size.
    pub full: usize,
}

impl TextureDemand {
    /// Adds textures every strategy that draws images must reserve.
    ///
    /// Image textures are needed whatever the layer mode, so they count
    /// against the `full` and `clipped` totals.
    #[must_use]
    pub const fn with_image_textures(self, images: usize) -> Self {
        Self {
            full: self.full + images,
            clipped: self.clipped + images,
            ..self
        }
    }
}

/// Layer rendering strategy, ordered from richest to coarsest.
///
/// `a < b` means `a` renders with more fidelity (and more textures) than `b`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderingMode {
    /// Every layer gets its own full-size textures.
    #[default]
    AllTextures,
    /// Every layer gets textures clipped to the visible area.
    ClippedTextures,
    /// Only scrollable and fixed layers get textures.
    ScrollableAndFixedLayers,
    /// Only fixed layers get textures.
    FixedLayers,
    /// Everything is flattened into the base surface.
    SingleSurfaceRendering,
}

impl RenderingMode {
    /// All modes, richest first.
    pub const ALL: [Self; 5] = [
        Self::AllTextures,
        Self::ClippedTextures,
        Self::ScrollableAndFixedLayers,
        Self::FixedLayers,
        Self::SingleSurfaceRendering,
    ];

    /// Returns a short, stable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllTextures => "all-textures",
            Self::ClippedTextures => "clipped-textures",
            Self::ScrollableAndFixedLayers => "scrollable-and-fixed",
            Self::FixedLayers => "fixed-layers",
            Self::SingleSurfaceRendering => "single-surface",
        }
    }

    /// Maps a mode to the one actually rendered.
    ///
    /// Modes coarser than `ClippedTextures` are rendered as
    /// `SingleSurfaceRendering`.
    #[must_use]
    pub const fn rendered(self) -> Self {
        match self {
            Self::AllTextures => Self::AllTextures,
            Self::ClippedTextures => Self::ClippedTextures,
            Self::ScrollableAndFixedLayers | Self::FixedLayers | Self::SingleSurfaceRendering => {
                Self::SingleSurfaceRendering
            }
        }
    }
}

impl fmt::Display for RenderingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layer-texture ceiling to request from the tile manager for `demand`.
///
/// Zero when nothing needs full-fidelity textures, else `2 * full + 1`.
#[inline]
#[must_use]
pub const fn layer_texture_ceiling(demand: &TextureDemand) -> usize {
    if demand.full == 0 {
        0
    } else {
        2 * demand.full + 1
    }
}

/// Result of one [`select_mode`] evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModeTransition {
    /// Mode before this frame.
    pub previous: RenderingMode,
    /// Mode the demand fits, before collapsing unimplemented modes.
    pub candidate: RenderingMode,
    /// Mode to render with from now on.
    pub mode: RenderingMode,
    /// Whether the candidate crossed a boundary that needs the base surface
    /// redrawn.
    pub inval_base: bool,
    /// Budget the demand was tested against (after hysteresis).
    pub effective_budget: usize,
}

impl ModeTransition {
    /// Returns `true` if the rendered mode changed.
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.mode != self.previous
    }

    /// Returns `true` if the mode changed in a way that requires redrawing
    /// the base surface.
    #[inline]
    #[must_use]
    pub fn requires_base_invalidation(&self) -> bool {
        self.changed() && self.inval_base
    }
}

/// Picks the rendering mode for `demand` under `budget`.
///
/// `budget` is the layer-texture ceiling actually granted by the tile
/// manager. See the [module docs](self) for the rule.
#[must_use]
pub fn select_mode(current: RenderingMode, demand: &TextureDemand, budget: usize) -> ModeTransition {
    let budget = if current == RenderingMode::SingleSurfaceRendering {
        budget / 2
    } else {
        budget
    };

    let mut candidate = RenderingMode::SingleSurfaceRendering;
    if demand.fixed < budget {
        candidate = RenderingMode::FixedLayers;
    }
    if demand.scrollable < budget {
        candidate = RenderingMode::ScrollableAndFixedLayers;
    }
    if demand.clipped < budget {
        candidate = RenderingMode::ClippedTextures;
    }
    if demand.full < budget {
        candidate = RenderingMode::AllTextures;
    }
    if budget == 0 && demand.full == 0 {
        candidate = RenderingMode::AllTextures;
    }

    let improving = candidate < current && candidate != RenderingMode::AllTextures;
    let degrading = candidate > current && candidate != RenderingMode::ClippedTextures;

    ModeTransition {
        previous: current,
        candidate,
        mode: candidate.rendered(),
        inval_base: improving || degrading,
        effective_budget: budget,
    }
}

/// Sticky rendering-mode state carried across frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeSelector {
    mode: RenderingMode,
}

impl ModeSelector {
    /// Creates a selector in [`RenderingMode::AllTextures`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: RenderingMode::AllTextures,
        }
    }

    /// Returns the active mode.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> RenderingMode {
        self.mode
    }

    /// Returns to [`RenderingMode::AllTextures`] without evaluating demand.
    ///
    /// Used when the content root is replaced and old demand no longer
    /// applies.
    pub fn reset(&mut self) {
        self.mode = RenderingMode::AllTextures;
    }

    /// Evaluates `demand` under `budget`, commits the new mode, and returns
    /// the transition.
    pub fn update(&mut self, demand: &TextureDemand, budget: usize) -> ModeTransition {
        let transition = select_mode(self.mode, demand, budget);
        if transition.candidate != transition.previous {
            log::debug!(
                "change from mode {} to {} -- textures needed: fixed: {}, scrollable: {}, \
                 clipped: {}, full: {}, max textures: {}",
                transition.previous,
                transition.candidate,
                demand.fixed,
                demand.scrollable,
                demand.clipped,
                demand.full,
                transition.effective_budget,
            );
        }
        self.mode = transition.mode;
        transition
    }
}
