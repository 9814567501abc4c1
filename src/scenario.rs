//! Scene snapshots described in TOML
//!
//! A scenario bundles everything one cover pass needs: the grid, the
//! host's capabilities, the cover configuration, occupants and walls.
//!
//! ```toml
//! [grid]
//! size = 100.0
//! distance = 5.0
//!
//! [config]
//! inset_target = 4.0
//!
//! [[occupant]]
//! name = "archer"
//! x = 0.0
//! y = 0.0
//! size = "medium"
//!
//! [[wall]]
//! a = [300.0, -100.0]
//! b = [300.0, 400.0]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::{CoverConfig, HostFeatures};
use crate::core::error::{CoverError, Result};
use crate::cover::context::GeometryContext;
use crate::cover::occluders::OccluderMap;
use crate::cover::occupant::Occupant;
use crate::cover::walls::{Wall, WallSet};
use crate::grid::SceneGrid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub grid: SceneGrid,
    #[serde(default)]
    pub host: HostFeatures,
    #[serde(default)]
    pub config: CoverConfig,
    #[serde(default, rename = "occupant")]
    pub occupants: Vec<Occupant>,
    #[serde(default, rename = "wall")]
    pub walls: Vec<Wall>,
}

impl Scenario {
    /// Parse and validate a scenario from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut scenario: Scenario = toml::from_str(content)?;
        scenario.config.validate()?;
        scenario.occupants = scenario
            .occupants
            .into_iter()
            .map(Occupant::with_default_footprint)
            .collect();
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let scenario = Self::from_toml_str(&content)?;
        tracing::debug!(
            "Loaded scenario {} ({} occupants, {} walls)",
            path.display(),
            scenario.occupants.len(),
            scenario.walls.len()
        );
        Ok(scenario)
    }

    /// Look up an occupant by name
    pub fn occupant(&self, name: &str) -> Result<&Occupant> {
        self.occupants
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| CoverError::OccupantNotFound(name.to_string()))
    }

    pub fn context(&self) -> GeometryContext {
        GeometryContext::build(self.grid, &self.config, self.host)
    }

    pub fn wall_set(&self) -> WallSet {
        self.walls.iter().copied().collect()
    }

    pub fn occluders(&self, ctx: &GeometryContext) -> OccluderMap {
        OccluderMap::build(ctx, &self.occupants)
    }
}
