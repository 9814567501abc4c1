//! Hex coordinate system for scene grids (axial coordinates)
//!
//! Uses axial coordinates (q, r) for distance and rounding, and converts to
//! and from the row/column offset coordinates scenes store tokens in.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::GridOffset;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Which way the hex cells point
///
/// Pointy-top cells stack in rows (every other row shifted half a cell);
/// flat-top cells stack in columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HexOrientation {
    #[default]
    PointyTop,
    FlatTop,
}

/// Axial hex coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Manhattan distance in hex space
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// All 6 neighbouring hexes, consecutive entries adjacent to each other
    pub fn neighbors(&self) -> [HexCoord; 6] {
        [
            HexCoord::new(self.q + 1, self.r),
            HexCoord::new(self.q + 1, self.r - 1),
            HexCoord::new(self.q, self.r - 1),
            HexCoord::new(self.q - 1, self.r),
            HexCoord::new(self.q - 1, self.r + 1),
            HexCoord::new(self.q, self.r + 1),
        ]
    }

    /// All hexes within range (inclusive)
    pub fn hexes_in_range(&self, range: u32) -> Vec<HexCoord> {
        let range = range as i32;
        let mut results = Vec::new();
        for q in -range..=range {
            for r in (-range).max(-q - range)..=range.min(-q + range) {
                results.push(HexCoord::new(self.q + q, self.r + r));
            }
        }
        results
    }

    /// Round floating point hex to nearest integer hex
    pub fn round(q: f64, r: f64) -> Self {
        let s = -q - r;
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        Self::new(rq as i32, rr as i32)
    }
}

/// Pixel layout of a hex grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    pub orientation: HexOrientation,
    /// Even rows (pointy) or columns (flat) are the shifted ones
    pub even: bool,
    /// Circumradius: center to vertex, half the grid size
    pub radius: f64,
}

impl HexLayout {
    pub fn new(orientation: HexOrientation, even: bool, grid_size: f64) -> Self {
        Self {
            orientation,
            even,
            radius: grid_size / 2.0,
        }
    }

    /// Pixel center of axial (0, 0)
    fn origin(&self) -> DVec2 {
        let short = self.radius * SQRT_3;
        let shift = if self.even { short / 2.0 } else { 0.0 };
        match self.orientation {
            HexOrientation::PointyTop => DVec2::new(short / 2.0 + shift, self.radius),
            HexOrientation::FlatTop => DVec2::new(self.radius, short / 2.0 + shift),
        }
    }

    pub fn offset_to_axial(&self, offset: GridOffset) -> HexCoord {
        let GridOffset { row, col } = offset;
        match (self.orientation, self.even) {
            (HexOrientation::PointyTop, false) => HexCoord::new(col - (row - (row & 1)) / 2, row),
            (HexOrientation::PointyTop, true) => HexCoord::new(col - (row + (row & 1)) / 2, row),
            (HexOrientation::FlatTop, false) => HexCoord::new(col, row - (col - (col & 1)) / 2),
            (HexOrientation::FlatTop, true) => HexCoord::new(col, row - (col + (col & 1)) / 2),
        }
    }

    pub fn axial_to_offset(&self, hex: HexCoord) -> GridOffset {
        let HexCoord { q, r } = hex;
        match (self.orientation, self.even) {
            (HexOrientation::PointyTop, false) => GridOffset::new(r, q + (r - (r & 1)) / 2),
            (HexOrientation::PointyTop, true) => GridOffset::new(r, q + (r + (r & 1)) / 2),
            (HexOrientation::FlatTop, false) => GridOffset::new(r + (q - (q & 1)) / 2, q),
            (HexOrientation::FlatTop, true) => GridOffset::new(r + (q + (q & 1)) / 2, q),
        }
    }

    /// Pixel center of an axial hex
    pub fn center(&self, hex: HexCoord) -> DVec2 {
        let q = hex.q as f64;
        let r = hex.r as f64;
        let local = match self.orientation {
            HexOrientation::PointyTop => DVec2::new(
                self.radius * (SQRT_3 * q + SQRT_3 / 2.0 * r),
                self.radius * 1.5 * r,
            ),
            HexOrientation::FlatTop => DVec2::new(
                self.radius * 1.5 * q,
                self.radius * (SQRT_3 / 2.0 * q + SQRT_3 * r),
            ),
        };
        self.origin() + local
    }

    /// Axial hex containing a pixel point
    pub fn from_pixel(&self, point: DVec2) -> HexCoord {
        let p = point - self.origin();
        let (q, r) = match self.orientation {
            HexOrientation::PointyTop => (
                (SQRT_3 / 3.0 * p.x - p.y / 3.0) / self.radius,
                (2.0 / 3.0 * p.y) / self.radius,
            ),
            HexOrientation::FlatTop => (
                (2.0 / 3.0 * p.x) / self.radius,
                (-p.x / 3.0 + SQRT_3 / 3.0 * p.y) / self.radius,
            ),
        };
        HexCoord::round(q, r)
    }

    /// The six vertices of the cell centered at `center`
    pub fn vertices(&self, center: DVec2) -> [DVec2; 6] {
        let start = match self.orientation {
            HexOrientation::PointyTop => -90.0_f64,
            HexOrientation::FlatTop => 0.0_f64,
        };
        let mut verts = [DVec2::ZERO; 6];
        for (i, v) in verts.iter_mut().enumerate() {
            let angle = (start + 60.0 * i as f64).to_radians();
            *v = center + DVec2::new(angle.cos(), angle.sin()) * self.radius;
        }
        verts
    }

    /// Half extents of the largest axis-aligned rectangle inside one cell
    pub fn inscribed_half_extents(&self) -> DVec2 {
        let wide = self.radius * SQRT_3 / 2.0;
        let tall = self.radius / 2.0;
        match self.orientation {
            HexOrientation::PointyTop => DVec2::new(wide, tall),
            HexOrientation::FlatTop => DVec2::new(tall, wide),
        }
    }
}
