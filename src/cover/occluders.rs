//! Per-scene cache of creature occluder prisms
//!
//! Building prisms is identical for every attacker/target pair on a scene,
//! so callers build the map once per pass and rebuild it whenever occupant
//! positions, elevations or statuses change.

use ahash::AHashMap;
use glam::DVec2;

use crate::core::types::{Disposition, OccupantId};
use crate::cover::context::GeometryContext;
use crate::cover::occupant::Occupant;
use crate::cover::prism::OccluderPrism;
use crate::cover::topology::TopologyStrategy;

#[derive(Debug, Clone, PartialEq)]
pub struct OccluderEntry {
    pub disposition: Disposition,
    pub prisms: Vec<OccluderPrism>,
}

#[derive(Debug, Clone, Default)]
pub struct OccluderMap {
    entries: AHashMap<OccupantId, OccluderEntry>,
}

impl OccluderMap {
    /// Build prisms for every blocking occupant with a usable position
    pub fn build<'a, I>(ctx: &GeometryContext, occupants: I) -> Self
    where
        I: IntoIterator<Item = &'a Occupant>,
    {
        let mut entries = AHashMap::new();
        for occupant in occupants {
            if !occupant.is_blocking() || !occupant.has_position() {
                continue;
            }
            let height = ctx.occupant_height(occupant);
            let strategy = TopologyStrategy::for_occupant(ctx, occupant);
            let prisms: Vec<OccluderPrism> = strategy
                .prisms(ctx, occupant, height)
                .into_iter()
                .filter(|p| p.has_volume())
                .collect();
            if prisms.is_empty() {
                continue;
            }
            entries.insert(
                occupant.id,
                OccluderEntry {
                    disposition: occupant.disposition,
                    prisms,
                },
            );
        }

        tracing::debug!("Built occluder prisms for {} occupants", entries.len());
        Self { entries }
    }

    pub fn get(&self, id: &OccupantId) -> Option<&OccluderEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prisms that may block rays between `attacker` and `target`.
    ///
    /// The pair themselves never block; with `ignore_allies` neither does
    /// anyone sharing the attacker's disposition.
    pub fn blocking_for<'a>(
        &'a self,
        attacker: &'a Occupant,
        target: &'a Occupant,
        ignore_allies: bool,
    ) -> impl Iterator<Item = &'a OccluderPrism> + 'a {
        self.entries
            .iter()
            .filter(move |(id, entry)| {
                **id != attacker.id
                    && **id != target.id
                    && !(ignore_allies && entry.disposition == attacker.disposition)
            })
            .flat_map(|(_, entry)| entry.prisms.iter())
    }

    /// Footprint rectangles of the given prisms, for debug output
    pub fn footprints<'a>(prisms: impl Iterator<Item = &'a OccluderPrism>) -> Vec<[DVec2; 4]> {
        prisms.map(|p| p.footprint()).collect()
    }
}
