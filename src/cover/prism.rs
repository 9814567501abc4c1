//! Axis-aligned occluder volumes and the 3D segment test against them

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::cover::constants::{INTERSECT_EPSILON, PRISM_Z_EPSILON};

/// Axis-aligned 3D box in scene pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccluderPrism {
    pub min: DVec3,
    pub max: DVec3,
}

impl OccluderPrism {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Box around a 2D center with the given half extents, spanning the
    /// vertical band `[z_bottom, z_top]` shrunk by the anti-tangency epsilon
    /// at both ends.
    pub fn around(center: DVec2, half: DVec2, z_bottom: f64, z_top: f64) -> Self {
        let half = half.max(DVec2::ZERO);
        Self {
            min: DVec3::new(center.x - half.x, center.y - half.y, z_bottom + PRISM_Z_EPSILON),
            max: DVec3::new(center.x + half.x, center.y + half.y, z_top - PRISM_Z_EPSILON),
        }
    }

    /// Shrink horizontally by `amount` on every side (never past the center)
    pub fn eroded(self, amount: f64) -> Self {
        let center = (self.min + self.max) / 2.0;
        let min_x = (self.min.x + amount).min(center.x);
        let min_y = (self.min.y + amount).min(center.y);
        let max_x = (self.max.x - amount).max(center.x);
        let max_y = (self.max.y - amount).max(center.y);
        Self {
            min: DVec3::new(min_x, min_y, self.min.z),
            max: DVec3::new(max_x, max_y, self.max.z),
        }
    }

    /// Whether the vertical span is non-empty
    pub fn has_volume(&self) -> bool {
        self.min.z < self.max.z
    }

    /// Footprint rectangle, clockwise from the top-left corner
    pub fn footprint(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.min.x, self.min.y),
            DVec2::new(self.max.x, self.min.y),
            DVec2::new(self.max.x, self.max.y),
            DVec2::new(self.min.x, self.max.y),
        ]
    }

    /// Liang-Barsky clip of the segment `p -> q` against the box.
    ///
    /// Only a proper crossing counts: the surviving parametric interval
    /// must stay non-empty after trimming `INTERSECT_EPSILON` from both
    /// ends, so grazing a face, edge or corner is not an intersection.
    pub fn intersects_segment(&self, p: DVec3, q: DVec3) -> bool {
        let d = q - p;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;

        let mut clip = |pv: f64, qv: f64| -> bool {
            if pv == 0.0 {
                return qv >= 0.0;
            }
            let t = qv / pv;
            if pv < 0.0 {
                if t > t1 {
                    return false;
                }
                if t > t0 {
                    t0 = t;
                }
            } else {
                if t < t0 {
                    return false;
                }
                if t < t1 {
                    t1 = t;
                }
            }
            true
        };

        let accepted = clip(-d.x, p.x - self.min.x)
            && clip(d.x, self.max.x - p.x)
            && clip(-d.y, p.y - self.min.y)
            && clip(d.y, self.max.y - p.y)
            && clip(-d.z, p.z - self.min.z)
            && clip(d.z, self.max.z - p.z);

        accepted && t0 + INTERSECT_EPSILON < t1 - INTERSECT_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> OccluderPrism {
        OccluderPrism::new(DVec3::ZERO, DVec3::splat(10.0))
    }

    #[test]
    fn test_straight_through() {
        let b = unit_box();
        assert!(b.intersects_segment(DVec3::new(-5.0, 5.0, 5.0), DVec3::new(15.0, 5.0, 5.0)));
    }

    #[test]
    fn test_miss_above() {
        let b = unit_box();
        assert!(!b.intersects_segment(DVec3::new(-5.0, 5.0, 12.0), DVec3::new(15.0, 5.0, 12.0)));
    }

    #[test]
    fn test_endpoint_touching_face_is_not_blocking() {
        let b = unit_box();
        // Starts exactly on the max-x face and leaves
        assert!(!b.intersects_segment(DVec3::new(10.0, 5.0, 5.0), DVec3::new(20.0, 5.0, 5.0)));
        // Ends exactly on the min-x face
        assert!(!b.intersects_segment(DVec3::new(-10.0, 5.0, 5.0), DVec3::new(0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_grazing_edge_is_not_blocking() {
        let b = unit_box();
        // Runs along the top face
        assert!(!b.intersects_segment(DVec3::new(-5.0, 5.0, 10.0), DVec3::new(15.0, 5.0, 10.0)));
        // Clips the corner at (10, 10)
        assert!(!b.intersects_segment(DVec3::new(5.0, 15.0, 5.0), DVec3::new(15.0, 5.0, 5.0)));
    }

    #[test]
    fn test_degenerate_axis_requires_inside() {
        let b = unit_box();
        // No x movement, x outside the slab
        assert!(!b.intersects_segment(DVec3::new(11.0, -5.0, 5.0), DVec3::new(11.0, 15.0, 5.0)));
        // No x movement, x inside the slab
        assert!(b.intersects_segment(DVec3::new(5.0, -5.0, 5.0), DVec3::new(5.0, 15.0, 5.0)));
    }

    #[test]
    fn test_segment_inside_box() {
        let b = unit_box();
        assert!(b.intersects_segment(DVec3::new(2.0, 2.0, 2.0), DVec3::new(8.0, 8.0, 8.0)));
    }

    #[test]
    fn test_around_applies_z_epsilon() {
        let p = OccluderPrism::around(DVec2::new(50.0, 50.0), DVec2::splat(10.0), 0.0, 120.0);
        assert!((p.min.z - 0.1).abs() < 1e-12);
        assert!((p.max.z - 119.9).abs() < 1e-12);
        assert_eq!(p.min.x, 40.0);
        assert!(p.has_volume());
    }

    #[test]
    fn test_zero_height_has_no_volume() {
        let p = OccluderPrism::around(DVec2::ZERO, DVec2::splat(10.0), 0.0, 0.0);
        assert!(!p.has_volume());
        assert!(!p.intersects_segment(DVec3::new(-20.0, 0.0, 0.0), DVec3::new(20.0, 0.0, 0.0)));
    }

    #[test]
    fn test_erosion_never_inverts() {
        let p = OccluderPrism::around(DVec2::ZERO, DVec2::splat(2.0), 0.0, 10.0).eroded(5.0);
        assert!(p.min.x <= p.max.x);
        assert!(p.min.y <= p.max.y);
    }
}
