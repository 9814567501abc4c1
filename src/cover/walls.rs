//! Wall occlusion: the host oracle seam, an in-memory oracle, and the
//! elevation-aware filter the engine wraps around it

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::cover::sampler::CornerPoint;

/// Vertical band of a wall in distance units; `None` is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WallHeight {
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub bottom: Option<f64>,
}

impl WallHeight {
    pub fn new(bottom: Option<f64>, top: Option<f64>) -> Self {
        Self { top, bottom }
    }

    pub fn is_unbounded(&self) -> bool {
        self.top.is_none() && self.bottom.is_none()
    }

    /// Whether a line at height `z` passes through the wall
    pub fn contains(&self, z: f64) -> bool {
        let top = self.top.unwrap_or(f64::INFINITY);
        let bottom = self.bottom.unwrap_or(f64::NEG_INFINITY);
        bottom <= z && z <= top
    }
}

/// One wall edge meeting a collision vertex
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WallEdge {
    /// Height metadata; `None` when the wall carries none
    pub height: Option<WallHeight>,
}

/// A point where a segment meets sight-blocking walls
#[derive(Debug, Clone, PartialEq)]
pub struct WallCollision {
    pub point: DVec2,
    pub edges: Vec<WallEdge>,
}

/// The host's sight-collision primitive.
///
/// Implementations return every vertex where the segment `a -> b` meets a
/// sight-blocking wall, not merely whether one exists.
pub trait WallOracle: Sync {
    fn collisions(&self, a: DVec2, b: DVec2) -> Vec<WallCollision>;

    /// Whether `point` is visible from `origin` (no wall in between)
    fn is_visible_from(&self, origin: DVec2, point: DVec2) -> bool {
        self.collisions(origin, point).is_empty()
    }
}

/// A straight wall segment in scene pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub a: DVec2,
    pub b: DVec2,
    #[serde(default = "default_blocks_sight")]
    pub blocks_sight: bool,
    #[serde(default)]
    pub height: Option<WallHeight>,
}

fn default_blocks_sight() -> bool {
    true
}

impl Wall {
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            a,
            b,
            blocks_sight: true,
            height: None,
        }
    }

    pub fn with_height(mut self, bottom: Option<f64>, top: Option<f64>) -> Self {
        self.height = Some(WallHeight::new(bottom, top));
        self
    }

    fn as_line(&self) -> Line<f64> {
        Line::new(to_coord(self.a), to_coord(self.b))
    }
}

fn to_coord(p: DVec2) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Collision vertices closer than this are merged
const VERTEX_MERGE_DISTANCE: f64 = 1e-6;

/// In-memory wall oracle over straight segments.
///
/// A segment touching a wall (including at an endpoint) collides with it;
/// a segment running along a wall does not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WallSet {
    walls: Vec<Wall>,
}

impl WallSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}

impl FromIterator<Wall> for WallSet {
    fn from_iter<I: IntoIterator<Item = Wall>>(iter: I) -> Self {
        Self {
            walls: iter.into_iter().collect(),
        }
    }
}

impl WallOracle for WallSet {
    fn collisions(&self, a: DVec2, b: DVec2) -> Vec<WallCollision> {
        let segment = Line::new(to_coord(a), to_coord(b));
        let mut hits: Vec<WallCollision> = Vec::new();

        for wall in self.walls.iter().filter(|w| w.blocks_sight) {
            let point = match line_intersection(segment, wall.as_line()) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    DVec2::new(intersection.x, intersection.y)
                }
                _ => continue,
            };

            let edge = WallEdge {
                height: wall.height,
            };
            match hits
                .iter_mut()
                .find(|hit| hit.point.distance(point) < VERTEX_MERGE_DISTANCE)
            {
                Some(hit) => hit.edges.push(edge),
                None => hits.push(WallCollision {
                    point,
                    edges: vec![edge],
                }),
            }
        }

        hits.sort_by(|x, y| a.distance_squared(x.point).total_cmp(&a.distance_squared(y.point)));
        hits
    }
}

/// Which interpolated height a wall band is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SightLine {
    /// Mid-height line used by cover rays
    Cover,
    /// Eye-height line used by the line-of-sight check
    Los,
}

/// Vertical extents of both ends of a sight line, in distance units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineEnds {
    pub attacker_bottom: f64,
    pub attacker_height: f64,
    pub target_bottom: f64,
    pub target_height: f64,
}

/// Interpolated heights of a sight line at a wall vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHeights {
    pub cover: f64,
    pub los: f64,
}

/// Heights of the segment `a -> b` where it crosses `vertex`.
///
/// The parameter is measured along the dominant axis and clamped to the
/// segment.
pub fn line_heights_at(a: DVec2, b: DVec2, vertex: DVec2, ends: &LineEnds) -> LineHeights {
    let d = b - a;
    let t = if d.x.abs() >= d.y.abs() {
        let denom = if d.x == 0.0 { 1e-9 } else { d.x };
        (vertex.x - a.x) / denom
    } else {
        (vertex.y - a.y) / d.y
    };
    let t = t.clamp(0.0, 1.0);

    let finite_or_zero = |h: f64| if h.is_finite() { h } else { 0.0 };
    let att_height = finite_or_zero(ends.attacker_height);
    let tgt_height = finite_or_zero(ends.target_height);

    let att_mid = ends.attacker_bottom + att_height * 0.5;
    let att_top = ends.attacker_bottom + att_height;
    let tgt_mid = ends.target_bottom + tgt_height * 0.5;
    let tgt_top = ends.target_bottom + tgt_height;

    LineHeights {
        cover: att_mid + t * (tgt_mid - att_mid),
        los: att_top.min(att_mid + t * (tgt_top - att_mid)),
    }
}

/// Whether walls obstruct the sight line between two corners.
///
/// Tests the inset segment first; when it is clear, also probes the short
/// raw-to-inset stub at each end so walls lying exactly on a footprint
/// boundary are not skipped. With `wall_heights` set, each collision is
/// filtered by the walls' vertical bands.
pub fn walls_block<W: WallOracle + ?Sized>(
    oracle: &W,
    from: &CornerPoint,
    to: &CornerPoint,
    ends: &LineEnds,
    wall_heights: bool,
    line: SightLine,
) -> bool {
    let (a, b) = (from.inset, to.inset);
    if segment_blocked(oracle, a, b, (a, b), ends, wall_heights, line) {
        return true;
    }

    let stubs = [
        from.raw.map(|raw| (raw, from.inset)),
        to.raw.map(|raw| (to.inset, raw)),
    ];
    stubs
        .into_iter()
        .flatten()
        .filter(|(p, q)| p.distance_squared(*q) > 0.0)
        .any(|(p, q)| segment_blocked(oracle, p, q, (a, b), ends, wall_heights, line))
}

fn segment_blocked<W: WallOracle + ?Sized>(
    oracle: &W,
    p: DVec2,
    q: DVec2,
    sight: (DVec2, DVec2),
    ends: &LineEnds,
    wall_heights: bool,
    line: SightLine,
) -> bool {
    let collisions = oracle.collisions(p, q);
    if collisions.is_empty() {
        return false;
    }
    if !wall_heights {
        return true;
    }

    for collision in &collisions {
        if collision.edges.iter().any(|e| e.height.is_none()) {
            return true;
        }

        let heights = line_heights_at(sight.0, sight.1, collision.point, ends);
        if !heights.cover.is_finite() {
            continue;
        }
        let z = match line {
            SightLine::Cover => heights.cover,
            SightLine::Los => heights.los,
        };

        for band in collision.edges.iter().filter_map(|e| e.height) {
            if band.is_unbounded() || band.contains(z) {
                tracing::trace!(
                    "Wall band {:?}..{:?} blocks {:?} line at z={:.2}",
                    band.bottom,
                    band.top,
                    line,
                    z
                );
                return true;
            }
        }
    }
    false
}
