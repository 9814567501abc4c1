//! Scene grid description: cell size, topology and cell geometry lookups
//!
//! The grid is the engine's view of the host's grid provider. Square and
//! gridless scenes share the same cell arithmetic; hex scenes delegate to
//! [`HexLayout`].

pub mod hex;

use glam::DVec2;
use serde::{Deserialize, Serialize};

pub use hex::{HexCoord, HexLayout, HexOrientation};

/// Row/column offset of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridOffset {
    pub row: i32,
    pub col: i32,
}

impl GridOffset {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Grid topology of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GridTopology {
    #[default]
    Square,
    Gridless,
    Hex {
        #[serde(default)]
        orientation: HexOrientation,
        #[serde(default)]
        even: bool,
    },
}

/// Grid configuration of a scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneGrid {
    #[serde(default)]
    pub topology: GridTopology,
    /// Cell size in pixels
    pub size: f64,
    /// Distance units covered by one cell (e.g. 5 ft)
    #[serde(default = "default_distance")]
    pub distance: f64,
}

fn default_distance() -> f64 {
    5.0
}

impl Default for SceneGrid {
    fn default() -> Self {
        Self::square(100.0, 5.0)
    }
}

impl SceneGrid {
    pub fn new(topology: GridTopology, size: f64, distance: f64) -> Self {
        Self {
            topology,
            size,
            distance,
        }
    }

    pub fn square(size: f64, distance: f64) -> Self {
        Self::new(GridTopology::Square, size, distance)
    }

    pub fn gridless(size: f64, distance: f64) -> Self {
        Self::new(GridTopology::Gridless, size, distance)
    }

    pub fn hex(orientation: HexOrientation, even: bool, size: f64, distance: f64) -> Self {
        Self::new(GridTopology::Hex { orientation, even }, size, distance)
    }

    pub fn is_hex(&self) -> bool {
        matches!(self.topology, GridTopology::Hex { .. })
    }

    pub fn is_gridless(&self) -> bool {
        matches!(self.topology, GridTopology::Gridless)
    }

    /// Pixels per distance unit
    pub fn pixels_per_unit(&self) -> f64 {
        if self.distance > 0.0 {
            self.size / self.distance
        } else {
            1.0
        }
    }

    /// Hex layout, if this is a hex grid
    pub fn hex_layout(&self) -> Option<HexLayout> {
        match self.topology {
            GridTopology::Hex { orientation, even } => {
                Some(HexLayout::new(orientation, even, self.size))
            }
            _ => None,
        }
    }

    /// Pixel center of a cell
    pub fn center_of(&self, offset: GridOffset) -> DVec2 {
        match self.hex_layout() {
            Some(layout) => layout.center(layout.offset_to_axial(offset)),
            None => DVec2::new(
                (offset.col as f64 + 0.5) * self.size,
                (offset.row as f64 + 0.5) * self.size,
            ),
        }
    }

    /// Cell containing a pixel point
    pub fn offset_at(&self, point: DVec2) -> GridOffset {
        match self.hex_layout() {
            Some(layout) => layout.axial_to_offset(layout.from_pixel(point)),
            None => GridOffset::new(
                (point.y / self.size).floor() as i32,
                (point.x / self.size).floor() as i32,
            ),
        }
    }

    /// Vertices of the cell centered at `center`
    pub fn vertices(&self, center: DVec2) -> Vec<DVec2> {
        match self.hex_layout() {
            Some(layout) => layout.vertices(center).to_vec(),
            None => {
                let h = self.size / 2.0;
                vec![
                    center + DVec2::new(-h, -h),
                    center + DVec2::new(h, -h),
                    center + DVec2::new(h, h),
                    center + DVec2::new(-h, h),
                ]
            }
        }
    }

    /// Distance in cells between two cells (hex distance or Chebyshev)
    pub fn cell_distance(&self, a: GridOffset, b: GridOffset) -> u32 {
        match self.hex_layout() {
            Some(layout) => layout
                .offset_to_axial(a)
                .distance(&layout.offset_to_axial(b)),
            None => (a.row - b.row).unsigned_abs().max((a.col - b.col).unsigned_abs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_center_and_offset() {
        let grid = SceneGrid::square(100.0, 5.0);
        let c = grid.center_of(GridOffset::new(2, 3));
        assert_eq!(c, DVec2::new(350.0, 250.0));
        assert_eq!(grid.offset_at(c), GridOffset::new(2, 3));
    }

    #[test]
    fn test_pixels_per_unit() {
        let grid = SceneGrid::square(100.0, 5.0);
        assert_eq!(grid.pixels_per_unit(), 20.0);
        let broken = SceneGrid::square(100.0, 0.0);
        assert_eq!(broken.pixels_per_unit(), 1.0);
    }

    #[test]
    fn test_hex_offset_round_trip() {
        let grid = SceneGrid::hex(HexOrientation::FlatTop, true, 80.0, 5.0);
        let offset = GridOffset::new(4, 7);
        assert_eq!(grid.offset_at(grid.center_of(offset)), offset);
        assert_eq!(grid.vertices(grid.center_of(offset)).len(), 6);
    }

    #[test]
    fn test_cell_distance() {
        let square = SceneGrid::square(100.0, 5.0);
        assert_eq!(square.cell_distance(GridOffset::new(0, 0), GridOffset::new(3, 5)), 5);

        let hex = SceneGrid::hex(HexOrientation::PointyTop, false, 100.0, 5.0);
        assert_eq!(hex.cell_distance(GridOffset::new(0, 0), GridOffset::new(0, 3)), 3);
    }

    #[test]
    fn test_topology_from_toml() {
        let grid: SceneGrid = toml::from_str(
            r#"
            size = 100.0
            [topology]
            type = "hex"
            orientation = "flat_top"
            "#,
        )
        .unwrap();
        assert!(grid.is_hex());
        assert_eq!(grid.distance, 5.0);
    }
}
