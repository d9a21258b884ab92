//! Collaborator traits and their data-driven implementations
//!
//! The engine only talks to these traits. The concrete types here are
//! table-backed versions good enough for build files and tests.

mod buffs;
mod character;
mod export;
mod gear;
mod race;

pub use buffs::Buffs;
pub use character::CharacterStats;
pub use export::JsonLinesSink;
pub use gear::{GearBuffs, OnUseItem};
pub use race::Race;

use crate::ability::Ability;
use crate::breakdown::DamageBreakdown;
use crate::error::Result;
use crate::stats::{StatSnapshot, Weapon};
use crate::types::Hand;

/// Weapons and rating-to-percentage conversions
pub trait StatsProvider: Send + Sync {
    fn weapon(&self, hand: Hand) -> &Weapon;

    /// Weapon damage at an attack power, normalized or not
    fn weapon_damage(&self, hand: Hand, ap: f64, normalized: bool) -> f64 {
        let weapon = self.weapon(hand);
        if normalized {
            weapon.normalized_damage(ap)
        } else {
            weapon.damage(ap)
        }
    }

    /// Crit chance (fraction) granted by crit rating
    fn crit_from_rating(&self, rating: f64) -> f64;

    /// Mastery points, base included, for a mastery rating
    fn mastery_from_rating(&self, rating: f64) -> f64;

    /// Multistrike chance (fraction) granted by multistrike rating
    fn multistrike_from_rating(&self, rating: f64) -> f64;

    /// Cooldown multiplier from readiness rating weighted by a spec conversion
    fn readiness_multiplier_from_rating(&self, rating: f64, conversion: f64) -> f64;

    /// Switch conversion tables to a new level
    fn set_level(&mut self, level: u32) -> Result<()>;
}

/// Raid buffs and debuffs
pub trait BuffsProvider: Send + Sync {
    fn attack_power_multiplier(&self) -> f64;
    /// Additive crit chance (fraction)
    fn crit_chance_bonus(&self) -> f64;
    fn physical_damage_multiplier(&self) -> f64;
    fn spell_damage_multiplier(&self) -> f64;
    /// Multiplier on target armor
    fn armor_multiplier(&self) -> f64;
}

/// Racial bonuses
pub trait RaceProvider: Send + Sync {
    /// Racial crit chance (fraction) for the time of day
    fn racial_crit(&self, is_day: bool) -> f64;
}

/// Set bonuses, meta gems and on-use trinkets
pub trait GearBonusProvider: Send + Sync {
    /// Set-bonus damage multiplier for an ability (1.0 when none applies)
    fn set_bonus_multiplier(&self, ability: Ability) -> f64;

    /// Multiplier on the crit damage bonus
    fn crit_damage_multiplier(&self) -> f64;

    /// DPS of on-use items, keyed by item name
    fn on_use_damage(&self, ap: f64, stats: &StatSnapshot) -> Vec<(String, f64)>;
}

/// Receives every computed breakdown (reporting, export)
pub trait BreakdownSink: Send {
    fn export(&mut self, breakdown: &DamageBreakdown);
}
