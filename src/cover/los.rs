//! Wall-only line-of-sight check

use glam::DVec2;

use crate::cover::constants::{LOS_TOLERANCE_FRACTION, OUTER_CORNER_EPSILON, OUTER_CORNER_PULL};
use crate::cover::context::GeometryContext;
use crate::cover::occupant::Occupant;
use crate::cover::report::{CoverOptions, LosPoint, LosReport};
use crate::cover::sampler::{constrain_to_visibility, pull_outer_corners, CornerPoint};
use crate::cover::topology::TopologyStrategy;
use crate::cover::walls::{walls_block, LineEnds, SightLine, WallOracle};

/// Center first, then the eight neighbours
const TEST_PATTERN: [(f64, f64); 9] = [
    (0.0, 0.0),
    (-1.0, -1.0),
    (-1.0, 1.0),
    (1.0, 1.0),
    (1.0, -1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (0.0, -1.0),
    (0.0, 1.0),
];

/// Points of the target tested for line of sight: every sample center
/// expanded into a 3x3 pattern, corrected for round tokens and limited to
/// what the target itself can see.
pub fn los_test_points<W: WallOracle + ?Sized>(
    ctx: &GeometryContext,
    walls: &W,
    target: &Occupant,
) -> Vec<DVec2> {
    let strategy = TopologyStrategy::for_occupant(ctx, target);
    let tolerance = ctx.grid.size * LOS_TOLERANCE_FRACTION;
    let center = target.center(&ctx.grid);

    let mut points: Vec<DVec2> = strategy
        .sample_centers(ctx, target)
        .iter()
        .flat_map(|c| {
            TEST_PATTERN
                .iter()
                .map(move |(dx, dy)| c.point + DVec2::new(*dx, *dy) * tolerance)
        })
        .collect();

    if strategy == TopologyStrategy::GridlessCircle {
        pull_outer_corners(&mut points, center, OUTER_CORNER_PULL, OUTER_CORNER_EPSILON);
    }

    constrain_to_visibility(points, center, walls)
}

/// Whether the attacker's vision origin sees any test point of the target.
///
/// Stops at the first clear point unless `options.debug` asks for every
/// point. A missing position never blocks sight.
pub fn evaluate_los<W: WallOracle + ?Sized>(
    ctx: &GeometryContext,
    walls: &W,
    attacker: &Occupant,
    target: &Occupant,
    options: CoverOptions,
) -> LosReport {
    if !attacker.has_position() || !target.has_position() {
        return LosReport::open();
    }

    let origin = CornerPoint::new(attacker.center(&ctx.grid));
    let ends = LineEnds {
        attacker_bottom: attacker.elevation,
        attacker_height: ctx.occupant_height(attacker),
        target_bottom: target.elevation,
        target_height: ctx.occupant_height(target),
    };

    let mut report = LosReport {
        has_los: false,
        points: Vec::new(),
    };

    for point in los_test_points(ctx, walls, target) {
        let blocked = walls_block(
            walls,
            &origin,
            &CornerPoint::new(point),
            &ends,
            ctx.host.wall_heights,
            SightLine::Los,
        );
        report.points.push(LosPoint { point, blocked });

        if !blocked {
            report.has_los = true;
            if !options.debug {
                break;
            }
        }
    }

    tracing::debug!(
        "LOS {} -> {}: {} ({} points tested)",
        attacker.name,
        target.name,
        report.has_los,
        report.points.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CoverConfig, HostFeatures};
    use crate::core::types::SizeCategory;
    use crate::cover::walls::{Wall, WallSet};
    use crate::grid::SceneGrid;

    fn ctx() -> GeometryContext {
        GeometryContext::build(
            SceneGrid::square(100.0, 5.0),
            &CoverConfig::default(),
            HostFeatures::default(),
        )
    }

    #[test]
    fn test_pattern_for_medium_target() {
        let ctx = ctx();
        let target = Occupant::new("t", SizeCategory::Medium).at_cell(&ctx.grid, 0, 0);
        let points = los_test_points(&ctx, &WallSet::new(), &target);
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], DVec2::new(50.0, 50.0));
        assert_eq!(points[1], DVec2::new(25.0, 25.0));
    }

    #[test]
    fn test_open_field_has_los() {
        let ctx = ctx();
        let attacker = Occupant::new("a", SizeCategory::Medium).at_cell(&ctx.grid, 0, 0);
        let target = Occupant::new("t", SizeCategory::Medium).at_cell(&ctx.grid, 0, 5);
        let report = evaluate_los(&ctx, &WallSet::new(), &attacker, &target, CoverOptions::default());
        assert!(report.has_los);
        assert_eq!(report.points.len(), 1);
    }

    #[test]
    fn test_full_wall_blocks_los() {
        let ctx = ctx();
        let walls: WallSet = [Wall::new(DVec2::new(300.0, -500.0), DVec2::new(300.0, 500.0))]
            .into_iter()
            .collect();
        let attacker = Occupant::new("a", SizeCategory::Medium).at_cell(&ctx.grid, 0, 0);
        let target = Occupant::new("t", SizeCategory::Medium).at_cell(&ctx.grid, 0, 5);
        let report = evaluate_los(&ctx, &walls, &attacker, &target, CoverOptions::default());
        assert!(!report.has_los);
        assert_eq!(report.points.len(), 9);
    }

    #[test]
    fn test_missing_position_fails_open() {
        let ctx = ctx();
        let mut attacker = Occupant::new("a", SizeCategory::Medium);
        attacker.y = f64::INFINITY;
        let target = Occupant::new("t", SizeCategory::Medium);
        let report = evaluate_los(&ctx, &WallSet::new(), &attacker, &target, CoverOptions::default());
        assert!(report.has_los);
        assert!(report.points.is_empty());
    }
}
