//! rogue_core - Damage model for rogue DPS and stat weights
//!
//! This library provides:
//! - TalentConfiguration: Talent encodings gated by character level
//! - FormulaRegistry: Base damage of every rogue ability
//! - ModifierCache: Per-damage-type raid and crit modifiers
//! - RogueCalculator: Per-ability DPS breakdown from rotation frequencies
//! - EpEstimator: Stat weights from finite differences of total DPS

pub mod ability;
pub mod breakdown;
pub mod config;
pub mod ep;
pub mod error;
pub mod formula;
pub mod modifiers;
pub mod prelude;
pub mod procs;
pub mod settings;
pub mod source;
pub mod stats;
pub mod talents;
pub mod types;

// Re-export core types for convenience
pub use ability::{ability_cost, base_cooldown, Ability, AbilityUse};
pub use breakdown::{
    expected_value, AttackFrequencyMap, CharacterBuild, CritRateMap, DamageBreakdown, Frequency,
    RogueCalculator,
};
pub use config::{BuildConfig, ConfigError, GameConstants};
pub use ep::{CycleInputs, CycleModel, EpEstimator, EpValues, FixedCycle};
pub use error::{CalcError, Result};
pub use formula::{Formula, FormulaRegistry, WeaponContext};
pub use modifiers::{ModifierCache, ModifierPair};
pub use procs::{DamageProc, ProcEffect};
pub use settings::Settings;
pub use source::{
    BreakdownSink, Buffs, BuffsProvider, CharacterStats, GearBonusProvider, GearBuffs,
    JsonLinesSink, Race, RaceProvider, StatsProvider,
};
pub use stats::{Stat, StatSnapshot, Weapon};
pub use talents::TalentConfiguration;
pub use types::{DamageKind, Hand, Spec, WeaponKind};
