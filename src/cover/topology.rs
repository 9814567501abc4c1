//! Grid-topology strategies
//!
//! Every topology-dependent decision (where an occupant is sampled, what
//! its corner sets look like, how it occludes, and how many rays a corner
//! set is worth) lives on [`TopologyStrategy`].

use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::core::types::SizeCategory;
use crate::cover::constants::{HEX_CENTROID_BOX_FRACTION, TINY_BOX_FRACTION};
use crate::cover::context::GeometryContext;
use crate::cover::occupant::Occupant;
use crate::cover::prism::OccluderPrism;
use crate::cover::sampler::{box_corners, circle_corners, hex_corners, CornerPoint, SampleCenter};

/// Rays cast per corner set and the blocked count that means
/// three-quarters cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RayBudget {
    pub total: usize,
    pub threshold: usize,
}

impl RayBudget {
    pub const SQUARE: RayBudget = RayBudget {
        total: 4,
        threshold: 3,
    };
    pub const HEX: RayBudget = RayBudget {
        total: 6,
        threshold: 4,
    };
    pub const CIRCLE: RayBudget = RayBudget {
        total: 8,
        threshold: 6,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyStrategy {
    Square,
    GridlessRect,
    GridlessCircle,
    Hex,
}

impl TopologyStrategy {
    pub fn for_occupant(ctx: &GeometryContext, occupant: &Occupant) -> Self {
        if ctx.grid.is_hex() {
            TopologyStrategy::Hex
        } else if ctx.grid.is_gridless() {
            if ctx.is_circle(occupant) {
                TopologyStrategy::GridlessCircle
            } else {
                TopologyStrategy::GridlessRect
            }
        } else {
            TopologyStrategy::Square
        }
    }

    pub fn ray_budget(&self) -> RayBudget {
        match self {
            TopologyStrategy::Hex => RayBudget::HEX,
            TopologyStrategy::GridlessCircle => RayBudget::CIRCLE,
            TopologyStrategy::Square | TopologyStrategy::GridlessRect => RayBudget::SQUARE,
        }
    }

    /// Points of the footprint rays are sampled around
    pub fn sample_centers(&self, ctx: &GeometryContext, occupant: &Occupant) -> Vec<SampleCenter> {
        let elevation = occupant.elevation;
        match self {
            TopologyStrategy::Square | TopologyStrategy::GridlessRect => {
                let (cols, rows, cell) = sub_cells(ctx, occupant);
                let origin = DVec2::new(occupant.x, occupant.y);
                let mut centers = Vec::with_capacity(cols * rows);
                for row in 0..rows {
                    for col in 0..cols {
                        let offset = DVec2::new(col as f64 + 0.5, row as f64 + 0.5) * cell;
                        centers.push(SampleCenter::new(origin + offset, elevation));
                    }
                }
                centers
            }
            TopologyStrategy::Hex => occupant
                .occupied_hex_cells(&ctx.grid)
                .into_iter()
                .map(|cell| SampleCenter::new(ctx.grid.center_of(cell), elevation))
                .collect(),
            TopologyStrategy::GridlessCircle => {
                let center = occupant.center(&ctx.grid);
                let ring = (occupant.external_radius(&ctx.grid) - ctx.half_cell).max(0.0);
                let k = FRAC_1_SQRT_2;
                let cardinal = [
                    DVec2::new(ring, 0.0),
                    DVec2::new(0.0, ring),
                    DVec2::new(-ring, 0.0),
                    DVec2::new(0.0, -ring),
                ];
                let diagonal = [
                    DVec2::new(ring * k, ring * k),
                    DVec2::new(-ring * k, ring * k),
                    DVec2::new(-ring * k, -ring * k),
                    DVec2::new(ring * k, -ring * k),
                ];
                let offsets: Vec<DVec2> = match occupant.size {
                    SizeCategory::Tiny | SizeCategory::Small | SizeCategory::Medium => {
                        vec![DVec2::ZERO]
                    }
                    SizeCategory::Large => cardinal.to_vec(),
                    SizeCategory::Huge | SizeCategory::Gargantuan => {
                        cardinal.iter().chain(diagonal.iter()).copied().collect()
                    }
                };
                offsets
                    .into_iter()
                    .map(|o| SampleCenter::new(center + o, elevation))
                    .collect()
            }
        }
    }

    /// Inset corner set around one sample center
    pub fn corners(
        &self,
        ctx: &GeometryContext,
        occupant: &Occupant,
        center: DVec2,
        inset: f64,
    ) -> Vec<CornerPoint> {
        let radius = occupant.external_radius(&ctx.grid).min(ctx.half_cell);
        match self {
            TopologyStrategy::Square | TopologyStrategy::GridlessRect => {
                let (_, _, cell) = sub_cells(ctx, occupant);
                let radius = (cell.min_element() / 2.0).min(ctx.half_cell);
                box_corners(center, radius, inset)
            }
            TopologyStrategy::Hex => {
                let vertices = ctx.grid.vertices(center);
                hex_corners(center, &vertices, radius, ctx.grid.size, inset)
            }
            TopologyStrategy::GridlessCircle => circle_corners(center, radius, inset),
        }
    }

    /// Occlusion volumes for a blocking occupant `height` units tall
    pub fn prisms(&self, ctx: &GeometryContext, occupant: &Occupant, height: f64) -> Vec<OccluderPrism> {
        let scale = ctx.pixels_per_unit;
        let z_bottom = occupant.elevation * scale;
        let z_top = z_bottom + height * scale;
        let erosion = ctx.inset_occluder / SQRT_2;
        let center = occupant.center(&ctx.grid);
        let ext_radius = occupant.external_radius(&ctx.grid);

        let boxes = match self {
            TopologyStrategy::Square | TopologyStrategy::GridlessRect => {
                if occupant.size == SizeCategory::Tiny {
                    // Tiny tokens block from the middle of the cell they stand in
                    let anchor = match self {
                        TopologyStrategy::Square => ctx.grid.center_of(ctx.grid.offset_at(center)),
                        _ => center,
                    };
                    let half = DVec2::splat(ctx.half_cell * TINY_BOX_FRACTION);
                    vec![OccluderPrism::around(anchor, half, z_bottom, z_top)]
                } else {
                    let half = occupant.pixel_size(&ctx.grid) / 2.0;
                    vec![OccluderPrism::around(center, half, z_bottom, z_top)]
                }
            }
            TopologyStrategy::GridlessCircle => {
                let half = DVec2::splat(ext_radius / SQRT_2);
                vec![OccluderPrism::around(center, half, z_bottom, z_top)]
            }
            TopologyStrategy::Hex => {
                let half = ctx
                    .grid
                    .hex_layout()
                    .map(|layout| layout.inscribed_half_extents())
                    .unwrap_or(DVec2::splat(ctx.half_cell));
                let cells = occupant.occupied_hex_cells(&ctx.grid);
                let mut boxes: Vec<OccluderPrism> = cells
                    .iter()
                    .map(|cell| OccluderPrism::around(ctx.grid.center_of(*cell), half, z_bottom, z_top))
                    .collect();
                if cells.len() > 1 {
                    let centroid_half = DVec2::splat(ext_radius * HEX_CENTROID_BOX_FRACTION);
                    boxes.push(OccluderPrism::around(center, centroid_half, z_bottom, z_top));
                }
                boxes
            }
        };

        boxes.into_iter().map(|b| b.eroded(erosion)).collect()
    }
}

/// Sub-cell grid dividing a rectangular footprint: columns, rows and the
/// pixel size of one sub-cell
fn sub_cells(ctx: &GeometryContext, occupant: &Occupant) -> (usize, usize, DVec2) {
    let size = occupant.pixel_size(&ctx.grid);
    let cols = (size.x / ctx.grid.size).round().max(1.0) as usize;
    let rows = (size.y / ctx.grid.size).round().max(1.0) as usize;
    (cols, rows, DVec2::new(size.x / cols as f64, size.y / rows as f64))
}
