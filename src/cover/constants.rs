//! Cover engine constants - every fixed number the geometry uses

/// Vertical erosion (pixels) applied to both ends of an occluder prism so
/// that ground/ceiling tangency is never an intersection.
pub const PRISM_Z_EPSILON: f64 = 0.1;

/// Vertical lift (pixels) applied to creature-test ray endpoints
pub const RAY_Z_LIFT: f64 = 0.1;

/// Parametric slack required on both ends of a clipped segment before it
/// counts as a proper intersection.
pub const INTERSECT_EPSILON: f64 = 1e-3;

/// Insets are clamped to this fraction of the cell size
pub const MAX_INSET_FRACTION: f64 = 0.3;

/// Cell size used when the scene reports an unusable one
pub const FALLBACK_GRID_SIZE: f64 = 100.0;

/// Fraction of an occupant's height sampled by cover rays
pub const COVER_SAMPLE_FRACTION: f64 = 0.5;

/// Pull applied to the four extreme points of a circular token's samples
pub const OUTER_CORNER_PULL: f64 = 0.30;

/// Tolerance (pixels) for deciding a point sits on an extreme
pub const OUTER_CORNER_EPSILON: f64 = 0.5;

/// Hex occluder box around the centroid of a multi-cell occupant,
/// as a fraction of its external radius.
pub const HEX_CENTROID_BOX_FRACTION: f64 = 0.6;

/// Tiny occluders shrink to this fraction of a half cell
pub const TINY_BOX_FRACTION: f64 = 0.5;

/// LOS test pattern spacing as a fraction of the cell size
pub const LOS_TOLERANCE_FRACTION: f64 = 0.25;

// Cover bonuses (AC and Dexterity saves)
pub const HALF_COVER_BONUS: i8 = 2;
pub const THREE_QUARTERS_COVER_BONUS: i8 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilons_small() {
        assert!(PRISM_Z_EPSILON < 1.0);
        assert!(INTERSECT_EPSILON < 0.01);
    }

    #[test]
    fn test_bonus_ordering() {
        assert!(THREE_QUARTERS_COVER_BONUS > HALF_COVER_BONUS);
        assert!(HALF_COVER_BONUS > 0);
    }
}
