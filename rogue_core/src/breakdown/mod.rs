//! Damage breakdown - rotation frequencies in, per-ability DPS out

mod engine;
mod inputs;
mod result;

pub use engine::{CharacterBuild, RogueCalculator};
pub use inputs::{AttackFrequencyMap, CritRateMap, Frequency};
pub use result::{expected_value, DamageBreakdown};
