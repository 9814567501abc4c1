//! Token-to-token distance measurement
//!
//! Distances are measured between the foot and head points of both
//! occupants (their centers at the bottom and top of their height) and the
//! shortest pair wins. Square grids count diagonals as one cell, hex grids
//! use hex distance, and gridless scenes measure straight lines adjusted by
//! the configured [`GridlessDistanceMode`].

use glam::DVec2;

use crate::core::config::GridlessDistanceMode;
use crate::cover::context::GeometryContext;
use crate::cover::occupant::Occupant;

/// Shortest distance between two occupants in scene distance units,
/// rounded to one decimal and never negative. `None` when either occupant
/// has no usable position.
pub fn measure_distance(ctx: &GeometryContext, source: &Occupant, target: &Occupant) -> Option<f64> {
    if !source.has_position() || !target.has_position() {
        return None;
    }

    let grid = &ctx.grid;
    let source_center = source.center(grid);
    let target_center = target.center(grid);
    let source_levels = [source.elevation, source.elevation + ctx.occupant_height(source)];
    let target_levels = [target.elevation, target.elevation + ctx.occupant_height(target)];

    let mut shortest = f64::INFINITY;
    for s in source_levels {
        for t in target_levels {
            let d = path_distance(ctx, source_center, s, target_center, t);
            shortest = shortest.min(d);
        }
    }

    if grid.is_gridless() {
        let ppu = ctx.pixels_per_unit;
        let source_radius = source.external_radius(grid) / ppu;
        let target_radius = target.external_radius(grid) / ppu;
        shortest -= match ctx.distance_mode {
            GridlessDistanceMode::EdgeEdge => source_radius + target_radius,
            GridlessDistanceMode::EdgeToCenter => source_radius,
            GridlessDistanceMode::CenterCenter => 0.0,
        };
    }

    let rounded = (shortest * 10.0).round() / 10.0;
    Some(if rounded.is_finite() { rounded.max(0.0) } else { 0.0 })
}

/// Distance between two 3D points (pixel position, elevation in units)
fn path_distance(ctx: &GeometryContext, a: DVec2, a_z: f64, b: DVec2, b_z: f64) -> f64 {
    let grid = &ctx.grid;
    let dz = (b_z - a_z).abs();
    if grid.is_gridless() {
        let planar = a.distance(b) / ctx.pixels_per_unit;
        return (planar * planar + dz * dz).sqrt();
    }

    let cells = grid.cell_distance(grid.offset_at(a), grid.offset_at(b)) as f64;
    let vertical_cells = if grid.distance > 0.0 { (dz / grid.distance).round() } else { 0.0 };
    cells.max(vertical_cells) * grid.distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CoverConfig, HostFeatures};
    use crate::core::types::SizeCategory;
    use crate::grid::{HexOrientation, SceneGrid};

    fn ctx_for(grid: SceneGrid, mode: GridlessDistanceMode) -> GeometryContext {
        let config = CoverConfig {
            gridless_distance_mode: mode,
            ..CoverConfig::default()
        };
        GeometryContext::build(grid, &config, HostFeatures::default())
    }

    #[test]
    fn test_square_diagonals_count_once() {
        let ctx = ctx_for(SceneGrid::square(100.0, 5.0), GridlessDistanceMode::default());
        let a = Occupant::new("a", SizeCategory::Medium).at_cell(&ctx.grid, 0, 0);
        let b = Occupant::new("b", SizeCategory::Medium).at_cell(&ctx.grid, 3, 4);
        assert_eq!(measure_distance(&ctx, &a, &b), Some(20.0));
    }

    #[test]
    fn test_square_elevation_dominates() {
        let ctx = ctx_for(SceneGrid::square(100.0, 5.0), GridlessDistanceMode::default());
        let a = Occupant::new("a", SizeCategory::Medium).at_cell(&ctx.grid, 0, 0);
        let b = Occupant::new("b", SizeCategory::Medium)
            .at_cell(&ctx.grid, 0, 1)
            .with_elevation(36.0);
        // a's head at 6, b's foot at 36: 30 ft = 6 cells
        assert_eq!(measure_distance(&ctx, &a, &b), Some(30.0));
    }

    #[test]
    fn test_hex_distance() {
        let grid = SceneGrid::hex(HexOrientation::PointyTop, false, 100.0, 5.0);
        let ctx = ctx_for(grid, GridlessDistanceMode::default());
        let a = Occupant::new("a", SizeCategory::Medium).at_cell(&ctx.grid, 0, 0);
        let b = Occupant::new("b", SizeCategory::Medium).at_cell(&ctx.grid, 0, 3);
        assert_eq!(measure_distance(&ctx, &a, &b), Some(15.0));
    }

    #[test]
    fn test_gridless_modes() {
        let grid = SceneGrid::gridless(100.0, 5.0);
        let place = || {
            (
                Occupant::new("a", SizeCategory::Medium).at(0.0, 0.0),
                Occupant::new("b", SizeCategory::Medium).at(1000.0, 0.0),
            )
        };

        let ctx = ctx_for(grid, GridlessDistanceMode::CenterCenter);
        let (a, b) = place();
        assert_eq!(measure_distance(&ctx, &a, &b), Some(50.0));

        let ctx = ctx_for(grid, GridlessDistanceMode::EdgeToCenter);
        let (a, b) = place();
        assert_eq!(measure_distance(&ctx, &a, &b), Some(47.5));

        let ctx = ctx_for(grid, GridlessDistanceMode::EdgeEdge);
        let (a, b) = place();
        assert_eq!(measure_distance(&ctx, &a, &b), Some(45.0));
    }

    #[test]
    fn test_overlapping_clamps_to_zero() {
        let ctx = ctx_for(SceneGrid::gridless(100.0, 5.0), GridlessDistanceMode::EdgeEdge);
        let a = Occupant::new("a", SizeCategory::Medium);
        let b = Occupant::new("b", SizeCategory::Medium);
        assert_eq!(measure_distance(&ctx, &a, &b), Some(0.0));
    }

    #[test]
    fn test_missing_position() {
        let ctx = ctx_for(SceneGrid::square(100.0, 5.0), GridlessDistanceMode::default());
        let mut a = Occupant::new("a", SizeCategory::Medium);
        a.x = f64::NAN;
        let b = Occupant::new("b", SizeCategory::Medium);
        assert_eq!(measure_distance(&ctx, &a, &b), None);
    }
}
