//! Cover classification by corner-ray sampling
//!
//! Every attacker corner casts one ray to each corner of a target corner
//! set. Rays blocked by walls or creature prisms are counted against the
//! target topology's ray budget, and the best (least blocked) combination
//! over all sample centers decides the tier: an attacker only needs one
//! good vantage point.

use glam::{DVec2, DVec3};

use crate::cover::constants::{COVER_SAMPLE_FRACTION, OUTER_CORNER_EPSILON, OUTER_CORNER_PULL, RAY_Z_LIFT};
use crate::cover::context::GeometryContext;
use crate::cover::occluders::OccluderMap;
use crate::cover::occupant::Occupant;
use crate::cover::prism::OccluderPrism;
use crate::cover::report::{Blocker, CoverOptions, CoverReport, CoverTier, CoverTrace, DebugShapes, RayTrace};
use crate::cover::sampler::{constrain_corners, pull_outer_corners, CornerPoint, SampleCenter};
use crate::cover::topology::{RayBudget, TopologyStrategy};
use crate::cover::walls::{walls_block, LineEnds, SightLine, WallOracle};

/// Blocked-ray counts for one attacker corner against one target corner set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RayTally {
    pub blocked_walls: usize,
    pub blocked_creatures: usize,
    /// Budgeted rays with no target corner to aim at
    pub missing: usize,
}

impl RayTally {
    pub fn total_blocked(&self) -> usize {
        self.blocked_walls + self.blocked_creatures + self.missing
    }

    /// Unblocked rays and the resulting tier.
    ///
    /// Missing corners count as wall blocks. With `creatures_half_only`
    /// the wall count alone decides three-quarters and creatures can add
    /// at most half cover.
    pub fn classify(&self, budget: RayBudget, creatures_half_only: bool) -> (usize, CoverTier) {
        let reachable = budget.total.saturating_sub(self.total_blocked());

        let tier = if creatures_half_only {
            let walls = self.blocked_walls + self.missing;
            if walls >= budget.threshold {
                CoverTier::ThreeQuarters
            } else if walls >= 1 || self.blocked_creatures >= 1 {
                CoverTier::Half
            } else {
                CoverTier::None
            }
        } else {
            let blocked = self.total_blocked();
            if blocked >= budget.threshold {
                CoverTier::ThreeQuarters
            } else if blocked >= 1 {
                CoverTier::Half
            } else {
                CoverTier::None
            }
        };

        (reachable, tier)
    }
}

struct Candidate {
    reachable: usize,
    tier: CoverTier,
    rays: Vec<RayTrace>,
}

impl Candidate {
    fn beats(&self, other: &Option<Candidate>) -> bool {
        match other {
            None => true,
            Some(best) => {
                self.reachable > best.reachable
                    || (self.reachable == best.reachable && self.tier < best.tier)
            }
        }
    }
}

/// Everything the occupant contributes to ray casting
struct Sampling {
    strategy: TopologyStrategy,
    centers: Vec<SampleCenter>,
    /// Ray endpoint height for creature tests, in pixels
    ray_z: f64,
    height: f64,
}

impl Sampling {
    fn of(ctx: &GeometryContext, occupant: &Occupant) -> Self {
        let strategy = TopologyStrategy::for_occupant(ctx, occupant);
        let mut centers = strategy.sample_centers(ctx, occupant);
        if strategy == TopologyStrategy::GridlessCircle {
            let mut points: Vec<DVec2> = centers.iter().map(|c| c.point).collect();
            pull_outer_corners(
                &mut points,
                occupant.center(&ctx.grid),
                OUTER_CORNER_PULL,
                OUTER_CORNER_EPSILON,
            );
            for (center, point) in centers.iter_mut().zip(points) {
                center.point = point;
            }
        }
        let height = ctx.occupant_height(occupant);
        let ray_z =
            (occupant.elevation + height * COVER_SAMPLE_FRACTION) * ctx.pixels_per_unit + RAY_Z_LIFT;
        Self {
            strategy,
            centers,
            ray_z,
            height,
        }
    }

    /// Visibility-constrained corner set per sample center
    fn corner_sets<W: WallOracle + ?Sized>(
        &self,
        ctx: &GeometryContext,
        walls: &W,
        occupant: &Occupant,
        inset: f64,
    ) -> Vec<Vec<CornerPoint>> {
        let origin = occupant.center(&ctx.grid);
        self.centers
            .iter()
            .map(|c| {
                let corners = self.strategy.corners(ctx, occupant, c.point, inset);
                constrain_corners(corners, origin, walls)
            })
            .filter(|set| !set.is_empty())
            .collect()
    }
}

/// Best cover the target has against the attacker.
///
/// Returns no cover when either occupant lacks a usable position or when
/// no corner combination could be evaluated.
pub fn evaluate_cover<W: WallOracle + ?Sized>(
    ctx: &GeometryContext,
    walls: &W,
    occluders: &OccluderMap,
    attacker: &Occupant,
    target: &Occupant,
    options: CoverOptions,
) -> CoverReport {
    if !attacker.has_position() || !target.has_position() {
        tracing::debug!(
            "Cover skipped for {} -> {}: missing position",
            attacker.name,
            target.name
        );
        return CoverReport::uncovered();
    }

    let debug = options.debug;
    let att = Sampling::of(ctx, attacker);
    let tgt = Sampling::of(ctx, target);
    let budget = tgt.strategy.ray_budget();
    let policy = ctx.policy;

    let ends = LineEnds {
        attacker_bottom: attacker.elevation,
        attacker_height: att.height,
        target_bottom: target.elevation,
        target_height: tgt.height,
    };

    let prisms: Vec<&OccluderPrism> = occluders
        .blocking_for(attacker, target, policy.ignore_allied_occluders)
        .collect();

    let attacker_sets = att.corner_sets(ctx, walls, attacker, ctx.inset_attacker);
    let target_sets = tgt.corner_sets(ctx, walls, target, ctx.inset_target);

    let mut best: Option<Candidate> = None;

    'search: for target_corners in &target_sets {
        let missing = budget.total.saturating_sub(target_corners.len());

        for attacker_corners in &attacker_sets {
            for a in attacker_corners {
                let mut tally = RayTally {
                    missing,
                    ..RayTally::default()
                };
                let mut rays = Vec::new();

                for t in target_corners {
                    let blocker = if walls_block(
                        walls,
                        a,
                        t,
                        &ends,
                        ctx.host.wall_heights,
                        SightLine::Cover,
                    ) {
                        tally.blocked_walls += 1;
                        Some(Blocker::Wall)
                    } else {
                        let p = DVec3::new(a.inset.x, a.inset.y, att.ray_z);
                        let q = DVec3::new(t.inset.x, t.inset.y, tgt.ray_z);
                        if prisms.iter().any(|b| b.intersects_segment(p, q)) {
                            tally.blocked_creatures += 1;
                            Some(Blocker::Creature)
                        } else {
                            None
                        }
                    };

                    tracing::trace!(
                        "Ray ({:.1}, {:.1}) -> ({:.1}, {:.1}): {:?}",
                        a.inset.x,
                        a.inset.y,
                        t.inset.x,
                        t.inset.y,
                        blocker
                    );

                    if debug {
                        rays.push(RayTrace {
                            from: a.inset,
                            to: t.inset,
                            blocker,
                        });
                    }
                }

                let (reachable, tier) = tally.classify(budget, policy.creatures_half_only);
                let candidate = Candidate {
                    reachable,
                    tier,
                    rays,
                };
                if candidate.beats(&best) {
                    best = Some(candidate);
                    if !debug && tier == CoverTier::None && tally.total_blocked() == 0 {
                        break 'search;
                    }
                }
            }
        }
    }

    let mut report = match &best {
        Some(b) => CoverReport::new(b.tier, b.reachable, budget.total),
        None => CoverReport::uncovered(),
    };

    tracing::debug!(
        "Cover {} -> {}: {} ({}/{} rays reachable)",
        attacker.name,
        target.name,
        report.cover,
        report.reachable,
        budget.total
    );

    if debug {
        let shapes = DebugShapes {
            attacker: attacker_sets
                .iter()
                .map(|set| set.iter().map(|c| c.inset).collect())
                .collect(),
            target: target_sets
                .iter()
                .map(|set| set.iter().map(|c| c.inset).collect())
                .collect(),
            occluders: OccluderMap::footprints(prisms.iter().copied()),
        };
        report.trace = Some(CoverTrace {
            rays: best.map(|b| b.rays).unwrap_or_default(),
            shapes,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(walls: usize, creatures: usize, missing: usize) -> RayTally {
        RayTally {
            blocked_walls: walls,
            blocked_creatures: creatures,
            missing,
        }
    }

    #[test]
    fn test_square_threshold_boundaries() {
        let b = RayBudget::SQUARE;
        assert_eq!(tally(0, 0, 0).classify(b, false), (4, CoverTier::None));
        assert_eq!(tally(1, 0, 0).classify(b, false), (3, CoverTier::Half));
        assert_eq!(tally(1, 1, 0).classify(b, false), (2, CoverTier::Half));
        assert_eq!(tally(2, 1, 0).classify(b, false), (1, CoverTier::ThreeQuarters));
        assert_eq!(tally(4, 0, 0).classify(b, false), (0, CoverTier::ThreeQuarters));
    }

    #[test]
    fn test_hex_and_circle_thresholds() {
        assert_eq!(tally(3, 0, 0).classify(RayBudget::HEX, false).1, CoverTier::Half);
        assert_eq!(tally(4, 0, 0).classify(RayBudget::HEX, false).1, CoverTier::ThreeQuarters);
        assert_eq!(tally(5, 0, 0).classify(RayBudget::CIRCLE, false).1, CoverTier::Half);
        assert_eq!(tally(6, 0, 0).classify(RayBudget::CIRCLE, false).1, CoverTier::ThreeQuarters);
    }

    #[test]
    fn test_missing_corners_count_as_walls() {
        let (reachable, tier) = tally(0, 0, 3).classify(RayBudget::SQUARE, false);
        assert_eq!(reachable, 1);
        assert_eq!(tier, CoverTier::ThreeQuarters);
    }

    #[test]
    fn test_creatures_half_only_caps_creatures() {
        let b = RayBudget::SQUARE;
        assert_eq!(tally(0, 4, 0).classify(b, true), (0, CoverTier::Half));
        assert_eq!(tally(3, 1, 0).classify(b, true).1, CoverTier::ThreeQuarters);
        assert_eq!(tally(2, 2, 0).classify(b, true).1, CoverTier::Half);
        assert_eq!(tally(0, 0, 0).classify(b, true).1, CoverTier::None);
        // Same counts without the policy reach three-quarters
        assert_eq!(tally(0, 4, 0).classify(b, false).1, CoverTier::ThreeQuarters);
    }

    #[test]
    fn test_candidate_ordering() {
        let worse = Candidate {
            reachable: 2,
            tier: CoverTier::Half,
            rays: Vec::new(),
        };
        let tie_lower = Candidate {
            reachable: 2,
            tier: CoverTier::None,
            rays: Vec::new(),
        };
        assert!(worse.beats(&None));
        let best = Some(worse);
        assert!(tie_lower.beats(&best));
        let fewer = Candidate {
            reachable: 1,
            tier: CoverTier::None,
            rays: Vec::new(),
        };
        assert!(!fewer.beats(&best));
    }
}
