//! Cover and line-of-sight engine
//!
//! Evaluation is synchronous and allocation-local: build a
//! [`GeometryContext`] and an [`OccluderMap`] once per scene snapshot,
//! then query any number of attacker/target pairs through a
//! [`CoverEngine`].

pub mod classifier;
pub mod constants;
pub mod context;
pub mod engine;
pub mod los;
pub mod occluders;
pub mod occupant;
pub mod prism;
pub mod report;
pub mod rules;
pub mod sampler;
pub mod topology;
pub mod walls;

pub use classifier::{evaluate_cover, RayTally};
pub use context::GeometryContext;
pub use engine::CoverEngine;
pub use los::{evaluate_los, los_test_points};
pub use occluders::{OccluderEntry, OccluderMap};
pub use occupant::{Occupant, OccupantStatus};
pub use prism::OccluderPrism;
pub use report::{
    Blocker, CoverOptions, CoverReport, CoverTier, CoverTrace, DebugShapes, LosPoint, LosReport,
    RayTrace,
};
pub use rules::{CoverModifiers, CoverUpgrade, IgnoreCover};
pub use sampler::{CornerPoint, SampleCenter};
pub use topology::{RayBudget, TopologyStrategy};
pub use walls::{Wall, WallCollision, WallEdge, WallHeight, WallOracle, WallSet};
