//! Per-damage-type modifier cache
//!
//! Raid modifiers and the crit damage multiplier only depend on buffs,
//! gear and level, so they are computed on first use and kept until the
//! owning calculator changes level.

use crate::config::LevelConstants;
use crate::source::{BuffsProvider, GearBonusProvider};
use crate::types::DamageKind;
use tracing::debug;

/// Flat damage multiplier and crit damage multiplier for one damage type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifierPair {
    pub damage: f64,
    pub crit: f64,
}

/// Everything a cache miss needs
pub struct RaidContext<'a> {
    pub buffs: &'a dyn BuffsProvider,
    pub gear: &'a dyn GearBonusProvider,
    pub level: &'a LevelConstants,
    pub base_crit_multiplier: f64,
}

/// Physical damage left after armor
pub fn armor_mitigation(armor: f64, armor_constant: f64) -> f64 {
    1.0 - armor / (armor + armor_constant)
}

/// Raid-wide multiplier for a damage type
pub fn raid_modifier(kind: DamageKind, armor: Option<f64>, ctx: &RaidContext<'_>) -> f64 {
    match kind {
        DamageKind::Physical => {
            let armor = armor.unwrap_or(ctx.level.boss_armor) * ctx.buffs.armor_multiplier();
            ctx.buffs.physical_damage_multiplier()
                * armor_mitigation(armor, ctx.level.armor_constant)
        }
        DamageKind::Bleed => ctx.buffs.physical_damage_multiplier(),
        DamageKind::Spell => ctx.buffs.spell_damage_multiplier(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModifierCache {
    damage_modifier: f64,
    physical: Option<f64>,
    spell: Option<f64>,
    bleed: Option<f64>,
    crit: Option<f64>,
}

impl ModifierCache {
    /// Empty cache with a specialization's passive damage multiplier
    pub fn new(damage_modifier: f64) -> Self {
        ModifierCache {
            damage_modifier,
            ..Default::default()
        }
    }

    /// Drop every memoized value
    pub fn clear(&mut self, damage_modifier: f64) {
        *self = ModifierCache::new(damage_modifier);
    }

    pub fn is_empty(&self) -> bool {
        self.physical.is_none() && self.spell.is_none() && self.bleed.is_none() && self.crit.is_none()
    }

    /// Modifier pair for a damage type
    ///
    /// `armor` only matters on the first physical lookup after a clear.
    /// Executioner and potent poisons multipliers are applied per call.
    pub fn modifiers(
        &mut self,
        kind: DamageKind,
        armor: Option<f64>,
        executioner: f64,
        potent_poisons: f64,
        ctx: &RaidContext<'_>,
    ) -> ModifierPair {
        let slot = match kind {
            DamageKind::Physical => &mut self.physical,
            DamageKind::Spell => &mut self.spell,
            DamageKind::Bleed => &mut self.bleed,
        };
        let raid = match *slot {
            Some(value) => value,
            None => {
                let value = raid_modifier(kind, armor, ctx);
                debug!(?kind, raid_modifier = value, "raid modifier cache miss");
                *slot = Some(value);
                value
            }
        };

        let crit = match self.crit {
            Some(value) => value,
            None => {
                let value = ctx.base_crit_multiplier * ctx.gear.crit_damage_multiplier();
                debug!(crit_multiplier = value, "crit multiplier cache miss");
                self.crit = Some(value);
                value
            }
        };

        ModifierPair {
            damage: self.damage_modifier * raid * executioner * potent_poisons,
            crit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConstants;
    use crate::source::{Buffs, GearBuffs};

    const EPS: f64 = 1e-12;

    fn level_100() -> LevelConstants {
        GameConstants::default().for_level(100).unwrap().clone()
    }

    #[test]
    fn test_armor_mitigation() {
        assert!((armor_mitigation(0.0, 7390.0) - 1.0).abs() < EPS);
        assert!((armor_mitigation(7390.0, 7390.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_raid_modifiers_by_kind() {
        let buffs = Buffs::new(["physical_vulnerability_debuff", "armor_debuff", "spell_damage_debuff"])
            .unwrap();
        let gear = GearBuffs::default();
        let level = level_100();
        let ctx = RaidContext {
            buffs: &buffs,
            gear: &gear,
            level: &level,
            base_crit_multiplier: 2.0,
        };

        let armor = 3610.0 * 0.88;
        let expected = 1.04 * (1.0 - armor / (armor + 7390.0));
        assert!((raid_modifier(DamageKind::Physical, None, &ctx) - expected).abs() < EPS);
        assert!((raid_modifier(DamageKind::Bleed, None, &ctx) - 1.04).abs() < EPS);
        assert!((raid_modifier(DamageKind::Spell, None, &ctx) - 1.05).abs() < EPS);
    }

    #[test]
    fn test_cache_memoizes_raid_part_only() {
        let buffs = Buffs::default();
        let gear = GearBuffs::new(["chaotic_metagem"]).unwrap();
        let level = level_100();
        let ctx = RaidContext {
            buffs: &buffs,
            gear: &gear,
            level: &level,
            base_crit_multiplier: 2.0,
        };
        let mut cache = ModifierCache::new(1.0);
        assert!(cache.is_empty());

        let first = cache.modifiers(DamageKind::Physical, Some(0.0), 1.0, 1.0, &ctx);
        assert!((first.damage - 1.0).abs() < EPS);
        assert!((first.crit - 2.06).abs() < EPS);

        // Armor is ignored once memoized, executioner is not
        let second = cache.modifiers(DamageKind::Physical, Some(5000.0), 1.2, 1.0, &ctx);
        assert!((second.damage - 1.2).abs() < EPS);

        cache.clear(1.0);
        assert!(cache.is_empty());
        let third = cache.modifiers(DamageKind::Physical, Some(7390.0), 1.0, 1.0, &ctx);
        assert!((third.damage - 0.5).abs() < EPS);
    }

    #[test]
    fn test_damage_modifier_constant() {
        let buffs = Buffs::default();
        let gear = GearBuffs::default();
        let level = level_100();
        let ctx = RaidContext {
            buffs: &buffs,
            gear: &gear,
            level: &level,
            base_crit_multiplier: 2.0,
        };
        let mut cache = ModifierCache::new(1.1);
        let pair = cache.modifiers(DamageKind::Spell, None, 1.0, 1.25, &ctx);
        assert!((pair.damage - 1.1 * 1.25).abs() < EPS);
        assert!((pair.crit - 2.0).abs() < EPS);
    }
}
