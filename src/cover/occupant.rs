//! Occupants: the engine's view of a token on the scene

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::core::types::{Disposition, OccupantId, SizeCategory, TokenShape};
use crate::grid::{GridOffset, HexCoord, SceneGrid};

/// Status flags that affect whether and how an occupant blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupantStatus {
    pub hidden: bool,
    pub visible: bool,
    pub dead: bool,
    pub ethereal: bool,
    pub prone: bool,
    /// Reduced to zero maximum hit points
    pub incapacitated: bool,
}

impl Default for OccupantStatus {
    fn default() -> Self {
        Self {
            hidden: false,
            visible: true,
            dead: false,
            ethereal: false,
            prone: false,
            incapacitated: false,
        }
    }
}

/// A token on the scene
///
/// Positions are in scene pixels (top-left corner of the footprint);
/// footprint and elevation are in grid cells and distance units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupant {
    #[serde(default)]
    pub id: OccupantId,
    #[serde(default)]
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Footprint width in grid cells; zero takes the size category's
    #[serde(default)]
    pub width: f64,
    /// Footprint height in grid cells; zero takes the size category's
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub elevation: f64,
    #[serde(default)]
    pub size: SizeCategory,
    #[serde(default)]
    pub shape: TokenShape,
    #[serde(default)]
    pub disposition: Disposition,
    #[serde(default)]
    pub status: OccupantStatus,
    /// Measured line-of-sight height (absolute, distance units)
    #[serde(default)]
    pub los_height: Option<f64>,
    /// Occupied hex cells; derived from the footprint when empty
    #[serde(default)]
    pub hex_cells: Vec<GridOffset>,
}

impl Occupant {
    /// Create an occupant of the given size at the scene origin
    pub fn new(name: impl Into<String>, size: SizeCategory) -> Self {
        let cells = size.cells();
        Self {
            id: OccupantId::new(),
            name: name.into(),
            x: 0.0,
            y: 0.0,
            width: cells,
            height: cells,
            elevation: 0.0,
            size,
            shape: TokenShape::Rectangle,
            disposition: Disposition::Neutral,
            status: OccupantStatus::default(),
            los_height: None,
            hex_cells: Vec::new(),
        }
    }

    /// Fill an unset footprint from the size category
    pub fn with_default_footprint(mut self) -> Self {
        if self.width <= 0.0 {
            self.width = self.size.cells();
        }
        if self.height <= 0.0 {
            self.height = self.size.cells();
        }
        self
    }

    /// Place the footprint's top-left corner on a grid cell.
    ///
    /// On hex grids the footprint is centered on the cell instead.
    pub fn at_cell(mut self, grid: &SceneGrid, row: i32, col: i32) -> Self {
        let offset = GridOffset::new(row, col);
        if grid.is_hex() {
            let center = grid.center_of(offset);
            self.x = center.x - self.width * grid.size / 2.0;
            self.y = center.y - self.height * grid.size / 2.0;
        } else {
            self.x = col as f64 * grid.size;
            self.y = row as f64 * grid.size;
        }
        self
    }

    /// Place the footprint's top-left corner at a pixel position
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    pub fn with_shape(mut self, shape: TokenShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_los_height(mut self, los_height: f64) -> Self {
        self.los_height = Some(los_height);
        self
    }

    pub fn prone(mut self) -> Self {
        self.status.prone = true;
        self
    }

    /// Footprint size in pixels
    pub fn pixel_size(&self, grid: &SceneGrid) -> DVec2 {
        DVec2::new(self.width * grid.size, self.height * grid.size)
    }

    /// Center of the footprint in pixels (also the vision origin)
    pub fn center(&self, grid: &SceneGrid) -> DVec2 {
        DVec2::new(self.x, self.y) + self.pixel_size(grid) / 2.0
    }

    /// Radius of the circle enclosing the footprint's larger dimension
    pub fn external_radius(&self, grid: &SceneGrid) -> f64 {
        self.width.max(self.height) * grid.size / 2.0
    }

    /// Whether the occupant has a usable position
    pub fn has_position(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.elevation.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Whether the occupant blocks rays as a creature occluder.
    ///
    /// Hidden, invisible, dead, ethereal and incapacitated creatures
    /// are ignored.
    pub fn is_blocking(&self) -> bool {
        let s = &self.status;
        !(s.hidden || !s.visible || s.dead || s.ethereal || s.incapacitated)
    }

    /// Hex cells covered by the footprint.
    ///
    /// Without explicit cells the footprint follows the size category. A
    /// span of 2 covers the three hexes meeting at the vertex nearest the
    /// token center. Other spans cover a hex disk around the home cell,
    /// rounding even spans up.
    pub fn occupied_hex_cells(&self, grid: &SceneGrid) -> Vec<GridOffset> {
        if !self.hex_cells.is_empty() {
            return self.hex_cells.clone();
        }

        let center = self.center(grid);
        let home = grid.offset_at(center);
        let Some(layout) = grid.hex_layout() else {
            return vec![home];
        };

        let span = self.width.max(self.height).round().max(1.0) as u32;
        let origin = layout.offset_to_axial(home);
        let cells = if span == 2 {
            let neighbors = origin.neighbors();
            let dist = |h: HexCoord| layout.center(h).distance(center);
            let mut best = (neighbors[0], neighbors[1]);
            let mut best_sum = f64::INFINITY;
            for i in 0..6 {
                let pair = (neighbors[i], neighbors[(i + 1) % 6]);
                let sum = dist(pair.0) + dist(pair.1);
                if sum < best_sum - VERTEX_TIE_EPSILON {
                    best = pair;
                    best_sum = sum;
                }
            }
            vec![origin, best.0, best.1]
        } else {
            origin.hexes_in_range((span - 1).div_ceil(2))
        };

        cells.into_iter().map(|h| layout.axial_to_offset(h)).collect()
    }
}

/// Pair sums closer than this are ties; the first pair in ring order wins
const VERTEX_TIE_EPSILON: f64 = 1e-9;
