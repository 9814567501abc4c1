//! Cover evaluation configuration with documented defaults
//!
//! Every tunable the engine reads is collected here and passed explicitly
//! into the geometry context. Nothing in the engine reads settings from
//! ambient state.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{CoverError, Result};
use crate::core::types::SizeCategory;

/// Default creature heights per size category, in scene distance units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeHeights {
    pub tiny: f64,
    pub small: f64,
    pub medium: f64,
    pub large: f64,
    pub huge: f64,
    pub gargantuan: f64,
}

impl Default for SizeHeights {
    fn default() -> Self {
        Self {
            tiny: 1.0,
            small: 3.0,
            medium: 6.0,
            large: 12.0,
            huge: 24.0,
            gargantuan: 48.0,
        }
    }
}

impl SizeHeights {
    pub fn get(&self, size: SizeCategory) -> f64 {
        match size {
            SizeCategory::Tiny => self.tiny,
            SizeCategory::Small => self.small,
            SizeCategory::Medium => self.medium,
            SizeCategory::Large => self.large,
            SizeCategory::Huge => self.huge,
            SizeCategory::Gargantuan => self.gargantuan,
        }
    }
}

/// How a prone occupant shrinks when used as an occluder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProneCoverPolicy {
    /// Prone occupants keep their standing height
    #[default]
    Off,
    /// Height is halved
    HalfHeight,
    /// Height drops to the next smaller size category's default
    SizeDown,
}

/// Shape used for tokens on gridless scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridlessTokenShape {
    #[default]
    Square,
    Circle,
}

/// How distances are measured between tokens on gridless scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridlessDistanceMode {
    EdgeEdge,
    CenterCenter,
    #[default]
    EdgeToCenter,
}

/// Rule toggles applied by the cover classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverPolicy {
    /// Creatures can only ever grant half cover; walls alone decide
    /// three-quarters.
    pub creatures_half_only: bool,

    /// Occupants sharing the attacker's disposition never block
    pub ignore_allied_occluders: bool,

    /// Height reduction for prone occluders
    pub prone: ProneCoverPolicy,
}

/// Capabilities of the host scene model
///
/// These are not user settings: they describe whether the host provides
/// elevation-aware walls and measured line-of-sight heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostFeatures {
    /// Walls carry a vertical top/bottom band
    pub wall_heights: bool,

    /// Occupants may carry a measured line-of-sight height that overrides
    /// the size-category default
    pub measured_heights: bool,
}

/// Configuration for cover evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    // === SAMPLING ===
    /// Inset (pixels) pulling attacker corners toward their sample center
    ///
    /// Clamped to 30% of the cell size when the context is built.
    pub inset_attacker: f64,

    /// Inset (pixels) pulling target corners toward their sample center
    pub inset_target: f64,

    /// Erosion (pixels) shrinking occluder prisms so touching occupants
    /// do not block each other along a shared edge
    pub inset_occluder: f64,

    /// Token shape used on gridless scenes
    pub gridless_token_shape: GridlessTokenShape,

    /// Distance mode used by token distance measurement on gridless scenes
    pub gridless_distance_mode: GridlessDistanceMode,

    // === HEIGHTS ===
    /// Default heights per size category (scene distance units)
    pub creature_heights: SizeHeights,

    // === RULES ===
    pub policy: CoverPolicy,

    /// Combine the wall-only line-of-sight test with the cover result;
    /// no line of sight yields total cover.
    pub los_check: bool,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            inset_attacker: 3.0,
            inset_target: 3.0,
            inset_occluder: 3.0,
            gridless_token_shape: GridlessTokenShape::Square,
            gridless_distance_mode: GridlessDistanceMode::EdgeToCenter,
            creature_heights: SizeHeights::default(),
            policy: CoverPolicy::default(),
            los_check: false,
        }
    }
}

impl CoverConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CoverConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("inset_attacker", self.inset_attacker),
            ("inset_target", self.inset_target),
            ("inset_occluder", self.inset_occluder),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoverError::InvalidConfig(format!(
                    "{} must be a non-negative number (got {})",
                    name, value
                )));
            }
        }

        for size in SizeCategory::all() {
            let height = self.creature_heights.get(size);
            if !height.is_finite() || height <= 0.0 {
                return Err(CoverError::InvalidConfig(format!(
                    "creature height for {:?} must be positive (got {})",
                    size, height
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CoverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_heights() {
        let heights = SizeHeights::default();
        assert_eq!(heights.get(SizeCategory::Medium), 6.0);
        assert_eq!(heights.get(SizeCategory::Gargantuan), 48.0);
    }

    #[test]
    fn test_negative_inset_rejected() {
        let config = CoverConfig {
            inset_target: -1.0,
            ..CoverConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoverError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_height_rejected() {
        let mut config = CoverConfig::default();
        config.creature_heights.large = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CoverConfig::from_toml_str(
            r#"
            inset_occluder = 1.5
            gridless_token_shape = "circle"

            [policy]
            creatures_half_only = true
            prone = "half_height"

            [creature_heights]
            medium = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.inset_occluder, 1.5);
        assert_eq!(config.inset_attacker, 3.0);
        assert_eq!(config.gridless_token_shape, GridlessTokenShape::Circle);
        assert!(config.policy.creatures_half_only);
        assert_eq!(config.policy.prone, ProneCoverPolicy::HalfHeight);
        assert_eq!(config.creature_heights.medium, 5.0);
        assert_eq!(config.creature_heights.large, 12.0);
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let result = CoverConfig::from_toml_str("inset_attacker = \"wide\"");
        assert!(matches!(result, Err(CoverError::TomlError(_))));
    }
}
