//! Engine facade over one read-only scene snapshot

use rayon::prelude::*;

use crate::core::types::OccupantId;
use crate::cover::classifier;
use crate::cover::context::GeometryContext;
use crate::cover::los;
use crate::cover::occluders::OccluderMap;
use crate::cover::occupant::Occupant;
use crate::cover::report::{CoverOptions, CoverReport, LosReport};
use crate::cover::rules::CoverModifiers;
use crate::cover::walls::WallOracle;

/// Cover and line-of-sight queries against a scene snapshot.
///
/// Borrows the context, walls and occluder map; rebuild the map whenever
/// occupants move or change status.
pub struct CoverEngine<'a, W: WallOracle + ?Sized> {
    pub ctx: &'a GeometryContext,
    pub walls: &'a W,
    pub occluders: &'a OccluderMap,
    /// Combine cover with the line-of-sight check in [`CoverEngine::resolve`]
    pub los_check: bool,
}

impl<'a, W: WallOracle + ?Sized> CoverEngine<'a, W> {
    pub fn new(ctx: &'a GeometryContext, walls: &'a W, occluders: &'a OccluderMap) -> Self {
        Self {
            ctx,
            walls,
            occluders,
            los_check: false,
        }
    }

    pub fn with_los_check(mut self, los_check: bool) -> Self {
        self.los_check = los_check;
        self
    }

    pub fn evaluate_cover(&self, attacker: &Occupant, target: &Occupant, options: CoverOptions) -> CoverReport {
        classifier::evaluate_cover(self.ctx, self.walls, self.occluders, attacker, target, options)
    }

    pub fn evaluate_los(&self, attacker: &Occupant, target: &Occupant, options: CoverOptions) -> LosReport {
        los::evaluate_los(self.ctx, self.walls, attacker, target, options)
    }

    /// Computed cover with rule modifiers applied; with `los_check` set a
    /// target out of sight has total cover.
    pub fn resolve(
        &self,
        attacker: &Occupant,
        target: &Occupant,
        modifiers: &CoverModifiers,
        options: CoverOptions,
    ) -> CoverReport {
        let report = self.evaluate_cover(attacker, target, options);
        let has_los = if self.los_check {
            Some(self.evaluate_los(attacker, target, options).has_los)
        } else {
            None
        };
        let tier = modifiers.resolve(report.cover, has_los);
        report.with_cover(tier)
    }

    /// Cover of every target against one attacker, evaluated in parallel
    pub fn evaluate_targets(
        &self,
        attacker: &Occupant,
        targets: &[Occupant],
        options: CoverOptions,
    ) -> Vec<(OccupantId, CoverReport)> {
        targets
            .par_iter()
            .filter(|t| t.id != attacker.id)
            .map(|t| (t.id, self.evaluate_cover(attacker, t, options)))
            .collect()
    }
}
