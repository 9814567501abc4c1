//! Footprint sampling primitives: sample centers, inset corner sets and
//! the point corrections applied before rays are cast

use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::cover::walls::WallOracle;

/// A point of an occupant's footprint that rays are sampled around
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleCenter {
    pub point: DVec2,
    pub elevation: f64,
}

impl SampleCenter {
    pub fn new(point: DVec2, elevation: f64) -> Self {
        Self { point, elevation }
    }
}

/// A ray endpoint: the inset point rays are cast from, plus the boundary
/// point it was pulled in from, when there is one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerPoint {
    pub inset: DVec2,
    pub raw: Option<DVec2>,
}

impl CornerPoint {
    pub fn new(point: DVec2) -> Self {
        Self {
            inset: point,
            raw: None,
        }
    }

    pub fn with_raw(inset: DVec2, raw: DVec2) -> Self {
        Self {
            inset,
            raw: Some(raw),
        }
    }
}

/// Four box corners around `center`, each pulled diagonally toward it
pub fn box_corners(center: DVec2, radius: f64, inset: f64) -> Vec<CornerPoint> {
    let d = inset / SQRT_2;
    [
        DVec2::new(-1.0, -1.0),
        DVec2::new(1.0, -1.0),
        DVec2::new(1.0, 1.0),
        DVec2::new(-1.0, 1.0),
    ]
    .into_iter()
    .map(|dir| CornerPoint::with_raw(center + dir * (radius - d), center + dir * radius))
    .collect()
}

/// Hex cell vertices scaled to the occupant and pulled radially inward.
///
/// `vertices` are the full-size cell vertices around `center`; they are
/// scaled by `min(1, 2 * radius / grid_size)` so small occupants sample a
/// smaller hexagon.
pub fn hex_corners(
    center: DVec2,
    vertices: &[DVec2],
    radius: f64,
    grid_size: f64,
    inset: f64,
) -> Vec<CornerPoint> {
    let scale = (2.0 * radius / grid_size).min(1.0);
    vertices
        .iter()
        .map(|v| {
            let d = *v - center;
            let dir = d.try_normalize().unwrap_or(DVec2::ZERO);
            let raw = center + d * scale;
            CornerPoint::with_raw(raw - dir * inset, raw)
        })
        .collect()
}

/// Eight points at 45 degree steps (clockwise from 0 degrees) on a circle,
/// pulled radially inward.
pub fn circle_corners(center: DVec2, radius: f64, inset: f64) -> Vec<CornerPoint> {
    let r = radius - inset;
    let k = FRAC_1_SQRT_2;
    [
        DVec2::new(1.0, 0.0),
        DVec2::new(k, k),
        DVec2::new(0.0, 1.0),
        DVec2::new(-k, k),
        DVec2::new(-1.0, 0.0),
        DVec2::new(-k, -k),
        DVec2::new(0.0, -1.0),
        DVec2::new(k, -k),
    ]
    .into_iter()
    .map(|dir| CornerPoint::with_raw(center + dir * r, center + dir * radius))
    .collect()
}

/// Pull the points sitting on the bounding box corners of the set toward
/// `center` by `pull`; every other point is left alone.
///
/// Round tokens are hit-tested as circles by the host while samples are
/// laid out on a rectangle; only the four extremes fall outside the circle.
pub fn pull_outer_corners(points: &mut [DVec2], center: DVec2, pull: f64, eps: f64) {
    if points.is_empty() {
        return;
    }
    let (min, max) = points
        .iter()
        .fold((points[0], points[0]), |(lo, hi), p| (lo.min(*p), hi.max(*p)));

    let near = |a: f64, b: f64| (a - b).abs() <= eps;
    for p in points.iter_mut() {
        let on_x = near(p.x, min.x) || near(p.x, max.x);
        let on_y = near(p.y, min.y) || near(p.y, max.y);
        if on_x && on_y {
            *p += (center - *p) * pull;
        }
    }
}

/// Keep the points visible from `origin`; fall back to the origin alone
/// when none survive.
pub fn constrain_to_visibility<W: WallOracle + ?Sized>(
    points: Vec<DVec2>,
    origin: DVec2,
    walls: &W,
) -> Vec<DVec2> {
    if points.len() == 1 && points[0] == origin {
        return points;
    }
    let mut kept: Vec<DVec2> = points
        .into_iter()
        .filter(|p| walls.is_visible_from(origin, *p))
        .collect();
    if kept.is_empty() {
        kept.push(origin);
    }
    kept
}

/// Corner variant of [`constrain_to_visibility`], judged on inset points
pub fn constrain_corners<W: WallOracle + ?Sized>(
    corners: Vec<CornerPoint>,
    origin: DVec2,
    walls: &W,
) -> Vec<CornerPoint> {
    if corners.len() == 1 && corners[0].inset == origin {
        return corners;
    }
    let mut kept: Vec<CornerPoint> = corners
        .into_iter()
        .filter(|c| walls.is_visible_from(origin, c.inset))
        .collect();
    if kept.is_empty() {
        kept.push(CornerPoint::new(origin));
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::cover::walls::{Wall, WallCollision, WallSet};

    #[test]
    fn test_box_corners_inset_diagonally() {
        let corners = box_corners(DVec2::new(50.0, 50.0), 50.0, 3.0 * SQRT_2);
        assert_eq!(corners.len(), 4);
        assert!((corners[0].inset - DVec2::new(3.0, 3.0)).length() < 1e-9);
        assert_eq!(corners[0].raw, Some(DVec2::new(0.0, 0.0)));
        assert!((corners[2].inset - DVec2::new(97.0, 97.0)).length() < 1e-9);
    }

    #[test]
    fn test_hex_corners_scaled_and_inset() {
        let center = DVec2::new(100.0, 100.0);
        let verts: Vec<DVec2> = (0..6)
            .map(|i| {
                let a = (-90.0 + 60.0 * i as f64).to_radians();
                center + DVec2::new(a.cos(), a.sin()) * 50.0
            })
            .collect();
        let corners = hex_corners(center, &verts, 25.0, 100.0, 5.0);
        assert_eq!(corners.len(), 6);
        for c in &corners {
            assert!((c.raw.unwrap().distance(center) - 25.0).abs() < 1e-9);
            assert!((c.inset.distance(center) - 20.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_circle_corners() {
        let corners = circle_corners(DVec2::ZERO, 50.0, 5.0);
        assert_eq!(corners.len(), 8);
        for c in &corners {
            assert!((c.inset.length() - 45.0).abs() < 1e-9);
        }
        assert!((corners[0].inset - DVec2::new(45.0, 0.0)).length() < 1e-9);
        assert!((corners[2].inset - DVec2::new(0.0, 45.0)).length() < 1e-9);
    }

    #[test]
    fn test_pull_outer_corners_only_moves_extremes() {
        let mut points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(5.0, 5.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(5.0, 0.0),
        ];
        pull_outer_corners(&mut points, DVec2::new(5.0, 5.0), 0.30, 0.5);
        assert!((points[0] - DVec2::new(1.5, 1.5)).length() < 1e-9);
        assert!((points[1] - DVec2::new(8.5, 1.5)).length() < 1e-9);
        assert_eq!(points[2], DVec2::new(5.0, 5.0));
        assert!((points[3] - DVec2::new(8.5, 8.5)).length() < 1e-9);
        // Edge midpoint is not a corner
        assert_eq!(points[4], DVec2::new(5.0, 0.0));
    }

    #[test]
    fn test_constrain_drops_hidden_points() {
        let walls: WallSet = [Wall::new(DVec2::new(8.0, -20.0), DVec2::new(8.0, 20.0))]
            .into_iter()
            .collect();
        let kept = constrain_to_visibility(
            vec![DVec2::new(-5.0, 0.0), DVec2::new(10.0, 0.0)],
            DVec2::ZERO,
            &walls,
        );
        assert_eq!(kept, vec![DVec2::new(-5.0, 0.0)]);
    }

    #[test]
    fn test_constrain_falls_back_to_origin() {
        let walls: WallSet = [Wall::new(DVec2::new(8.0, -20.0), DVec2::new(8.0, 20.0))]
            .into_iter()
            .collect();
        let kept = constrain_corners(
            vec![CornerPoint::new(DVec2::new(10.0, 0.0))],
            DVec2::ZERO,
            &walls,
        );
        assert_eq!(kept, vec![CornerPoint::new(DVec2::ZERO)]);
    }

    /// Counts every wall query it answers
    #[derive(Default)]
    struct CountingWalls {
        queries: AtomicUsize,
    }

    impl WallOracle for CountingWalls {
        fn collisions(&self, _a: DVec2, _b: DVec2) -> Vec<WallCollision> {
            self.queries.fetch_add(1, Ordering::Relaxed);
            Vec::new()
        }
    }

    #[test]
    fn test_lone_origin_skips_wall_queries() {
        let walls = CountingWalls::default();
        let origin = DVec2::new(40.0, 40.0);

        let kept = constrain_corners(vec![CornerPoint::new(origin)], origin, &walls);
        assert_eq!(kept, vec![CornerPoint::new(origin)]);
        let kept = constrain_to_visibility(vec![origin], origin, &walls);
        assert_eq!(kept, vec![origin]);
        assert_eq!(walls.queries.load(Ordering::Relaxed), 0);

        constrain_corners(vec![CornerPoint::new(DVec2::ZERO)], origin, &walls);
        assert_eq!(walls.queries.load(Ordering::Relaxed), 1);
    }
}
