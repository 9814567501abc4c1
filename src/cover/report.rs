//! Results returned by the cover and line-of-sight evaluators

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::cover::constants::{HALF_COVER_BONUS, THREE_QUARTERS_COVER_BONUS};

/// Discrete cover classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverTier {
    #[default]
    None,
    Half,
    ThreeQuarters,
    /// Only produced by a failed line-of-sight check or an override
    Total,
}

impl CoverTier {
    /// AC / Dexterity save bonus; total cover has none because the target
    /// cannot be targeted at all
    pub fn bonus(&self) -> Option<i8> {
        match self {
            CoverTier::None => Some(0),
            CoverTier::Half => Some(HALF_COVER_BONUS),
            CoverTier::ThreeQuarters => Some(THREE_QUARTERS_COVER_BONUS),
            CoverTier::Total => None,
        }
    }

    /// One step up, saturating at total
    pub fn upgraded(&self) -> Self {
        match self {
            CoverTier::None => CoverTier::None,
            CoverTier::Half => CoverTier::ThreeQuarters,
            CoverTier::ThreeQuarters | CoverTier::Total => CoverTier::Total,
        }
    }
}

impl fmt::Display for CoverTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoverTier::None => "none",
            CoverTier::Half => "half",
            CoverTier::ThreeQuarters => "three-quarters",
            CoverTier::Total => "total",
        };
        write!(f, "{}", name)
    }
}

/// What stopped a ray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blocker {
    Wall,
    Creature,
}

/// Outcome of one attacker-corner to target-corner ray
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RayTrace {
    pub from: DVec2,
    pub to: DVec2,
    pub blocker: Option<Blocker>,
}

impl RayTrace {
    pub fn blocked(&self) -> bool {
        self.blocker.is_some()
    }
}

/// Shapes sampled during an evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugShapes {
    /// Attacker corner sets, one per sample center
    pub attacker: Vec<Vec<DVec2>>,
    /// Target corner sets, one per sample center
    pub target: Vec<Vec<DVec2>>,
    /// Occluder prism footprints
    pub occluders: Vec<[DVec2; 4]>,
}

/// Debug trace of the winning corner combination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverTrace {
    pub rays: Vec<RayTrace>,
    pub shapes: DebugShapes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverReport {
    pub cover: CoverTier,
    pub bonus: Option<i8>,
    /// Unblocked rays of the best combination
    pub reachable: usize,
    /// Rays a corner set is worth for the target's topology
    pub total_rays: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<CoverTrace>,
}

impl CoverReport {
    pub fn new(cover: CoverTier, reachable: usize, total_rays: usize) -> Self {
        Self {
            cover,
            bonus: cover.bonus(),
            reachable,
            total_rays,
            trace: None,
        }
    }

    /// Result used when nothing could be evaluated
    pub fn uncovered() -> Self {
        Self::new(CoverTier::None, 0, 0)
    }

    /// Replace the tier, keeping ray counts and trace
    pub fn with_cover(mut self, cover: CoverTier) -> Self {
        self.cover = cover;
        self.bonus = cover.bonus();
        self
    }
}

/// One tested line-of-sight point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LosPoint {
    pub point: DVec2,
    pub blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LosReport {
    pub has_los: bool,
    /// Points tested, in order; the scan stops at the first clear point
    /// unless every point was requested
    pub points: Vec<LosPoint>,
}

impl LosReport {
    /// Result used when a position is missing: never manufacture total cover
    pub fn open() -> Self {
        Self {
            has_los: true,
            points: Vec::new(),
        }
    }
}

/// Options accepted by the evaluators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoverOptions {
    /// Record traces and disable early exits
    pub debug: bool,
}

impl CoverOptions {
    pub fn debug() -> Self {
        Self { debug: true }
    }
}
