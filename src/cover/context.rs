//! Per-evaluation geometry constants
//!
//! A [`GeometryContext`] is built once per cover pass from the scene grid,
//! the cover configuration and the host's capabilities. It is immutable and
//! may be shared by every attacker/target pair evaluated in the same pass.

use crate::core::config::{
    CoverConfig, CoverPolicy, GridlessDistanceMode, GridlessTokenShape, HostFeatures,
    ProneCoverPolicy, SizeHeights,
};
use crate::core::types::TokenShape;
use crate::cover::constants::{FALLBACK_GRID_SIZE, MAX_INSET_FRACTION};
use crate::cover::occupant::Occupant;
use crate::grid::SceneGrid;

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryContext {
    pub grid: SceneGrid,
    /// Pixels per distance unit
    pub pixels_per_unit: f64,
    pub half_cell: f64,
    pub inset_attacker: f64,
    pub inset_target: f64,
    pub inset_occluder: f64,
    pub gridless_token_shape: GridlessTokenShape,
    pub distance_mode: GridlessDistanceMode,
    pub heights: SizeHeights,
    pub policy: CoverPolicy,
    pub host: HostFeatures,
}

impl GeometryContext {
    /// Derive the context for one pass. Never fails: unusable grid sizes
    /// fall back to a default cell size.
    pub fn build(grid: SceneGrid, config: &CoverConfig, host: HostFeatures) -> Self {
        let mut grid = grid;
        if !grid.size.is_finite() || grid.size <= 0.0 {
            tracing::warn!(
                "Grid size {} unusable, falling back to {}",
                grid.size,
                FALLBACK_GRID_SIZE
            );
            grid.size = FALLBACK_GRID_SIZE;
        }

        let max_inset = grid.size * MAX_INSET_FRACTION;
        let clamp_inset = |v: f64| if v.is_finite() { v.clamp(0.0, max_inset) } else { 0.0 };

        Self {
            grid,
            pixels_per_unit: grid.pixels_per_unit(),
            half_cell: grid.size / 2.0,
            inset_attacker: clamp_inset(config.inset_attacker),
            inset_target: clamp_inset(config.inset_target),
            inset_occluder: clamp_inset(config.inset_occluder),
            gridless_token_shape: config.gridless_token_shape,
            distance_mode: config.gridless_distance_mode,
            heights: config.creature_heights,
            policy: config.policy,
            host,
        }
    }

    /// Whether the occupant is sampled and occluded as a circle
    pub fn is_circle(&self, occupant: &Occupant) -> bool {
        self.grid.is_gridless()
            && (self.gridless_token_shape == GridlessTokenShape::Circle
                || occupant.shape == TokenShape::Ellipse)
    }

    /// Vertical extent of an occupant in distance units.
    ///
    /// Uses the measured line-of-sight height when the host provides one,
    /// otherwise the size-category default, then applies the prone policy.
    /// Rounded up to two decimals; never negative.
    pub fn occupant_height(&self, occupant: &Occupant) -> f64 {
        let measured = if self.host.measured_heights {
            occupant.los_height.filter(|h| h.is_finite())
        } else {
            None
        };

        let prone = occupant.status.prone;
        let height = match measured {
            Some(top) => {
                let h = top - occupant.elevation;
                if prone && self.policy.prone != ProneCoverPolicy::Off {
                    h * 0.5
                } else {
                    h
                }
            }
            None => match (prone, self.policy.prone) {
                (true, ProneCoverPolicy::HalfHeight) => self.heights.get(occupant.size) * 0.5,
                (true, ProneCoverPolicy::SizeDown) => self.heights.get(occupant.size.smaller()),
                _ => self.heights.get(occupant.size),
            },
        };

        ((height * 100.0).ceil() / 100.0).max(0.0)
    }
}
