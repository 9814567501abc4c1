//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for occupants (tokens) on a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccupantId(pub Uuid);

impl OccupantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OccupantId {
    fn default() -> Self {
        Self::new()
    }
}

/// Allegiance of an occupant relative to the players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Friendly,
    #[default]
    Neutral,
    Hostile,
    Secret,
}

/// Creature size category
///
/// The closed set of six categories drives default heights, footprint
/// size and the sampling pattern of circular gridless tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeCategory {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
    Gargantuan,
}

impl SizeCategory {
    /// Footprint edge length in grid cells
    pub fn cells(&self) -> f64 {
        match self {
            SizeCategory::Tiny => 0.5,
            SizeCategory::Small | SizeCategory::Medium => 1.0,
            SizeCategory::Large => 2.0,
            SizeCategory::Huge => 3.0,
            SizeCategory::Gargantuan => 4.0,
        }
    }

    /// Next smaller category (tiny stays tiny)
    pub fn smaller(&self) -> Self {
        match self {
            SizeCategory::Tiny | SizeCategory::Small => SizeCategory::Tiny,
            SizeCategory::Medium => SizeCategory::Small,
            SizeCategory::Large => SizeCategory::Medium,
            SizeCategory::Huge => SizeCategory::Large,
            SizeCategory::Gargantuan => SizeCategory::Huge,
        }
    }

    pub fn all() -> [SizeCategory; 6] {
        [
            SizeCategory::Tiny,
            SizeCategory::Small,
            SizeCategory::Medium,
            SizeCategory::Large,
            SizeCategory::Huge,
            SizeCategory::Gargantuan,
        ]
    }
}

/// Shape of a token's artwork footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenShape {
    #[default]
    Rectangle,
    Ellipse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupant_id_unique() {
        let a = OccupantId::new();
        let b = OccupantId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_size_ordering() {
        assert!(SizeCategory::Gargantuan > SizeCategory::Huge);
        assert!(SizeCategory::Huge > SizeCategory::Large);
        assert!(SizeCategory::Small > SizeCategory::Tiny);
    }

    #[test]
    fn test_smaller_steps_down_once() {
        assert_eq!(SizeCategory::Medium.smaller(), SizeCategory::Small);
        assert_eq!(SizeCategory::Gargantuan.smaller(), SizeCategory::Huge);
        assert_eq!(SizeCategory::Tiny.smaller(), SizeCategory::Tiny);
    }

    #[test]
    fn test_footprint_cells() {
        assert_eq!(SizeCategory::Tiny.cells(), 0.5);
        assert_eq!(SizeCategory::Medium.cells(), 1.0);
        assert_eq!(SizeCategory::Large.cells(), 2.0);
    }
}
