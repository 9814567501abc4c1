//! Rule adjustments applied on top of the computed cover tier

use serde::{Deserialize, Serialize};

use crate::cover::report::CoverTier;

/// Target-side cover upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverUpgrade {
    #[default]
    None,
    /// Half becomes three-quarters, three-quarters becomes total
    Once,
    /// Half becomes total
    Twice,
}

/// Attacker-side ability to disregard cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreCover {
    #[default]
    None,
    Half,
    /// Half and three-quarters
    ThreeQuarters,
    /// Every tier, total included
    All,
}

/// Modifiers for a single roll
///
/// Nothing here knows whether the roll is an attack or a saving throw, or
/// whether an area effect ignores cover. The caller builds one set of
/// modifiers per roll, setting `ignore` to `All` for area effects that
/// disregard cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverModifiers {
    pub upgrade: CoverUpgrade,
    pub ignore: IgnoreCover,
    /// Replaces the computed tier outright
    pub override_tier: Option<CoverTier>,
}

impl CoverModifiers {
    /// Final tier from the computed one and an optional line-of-sight
    /// result. Failed line of sight means total cover; an override wins
    /// over both. Upgrades are applied before ignores.
    pub fn resolve(&self, computed: CoverTier, has_los: Option<bool>) -> CoverTier {
        let base = match (self.override_tier, has_los) {
            (Some(tier), _) => tier,
            (None, Some(false)) => CoverTier::Total,
            (None, _) => computed,
        };

        let upgraded = match self.upgrade {
            CoverUpgrade::None => base,
            CoverUpgrade::Once => base.upgraded(),
            CoverUpgrade::Twice if base == CoverTier::Half => CoverTier::Total,
            CoverUpgrade::Twice => base,
        };

        match (self.ignore, upgraded) {
            (IgnoreCover::All, _) => CoverTier::None,
            (IgnoreCover::ThreeQuarters, CoverTier::Half | CoverTier::ThreeQuarters) => CoverTier::None,
            (IgnoreCover::Half, CoverTier::Half) => CoverTier::None,
            (_, tier) => tier,
        }
    }
}
