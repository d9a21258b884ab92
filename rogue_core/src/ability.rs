//! Ability identifiers plus energy cost and cooldown tables

use crate::error::{CalcError, Result};
use crate::types::Spec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every damage source the model knows a formula or frequency key for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    MhAutoattacks,
    OhAutoattacks,
    Backstab,
    Dispatch,
    /// Frequency key only; damage comes from the two hand formulas
    Mutilate,
    MhMutilate,
    OhMutilate,
    SinisterStrike,
    Hemorrhage,
    HemorrhageTicks,
    Ambush,
    RevealingStrike,
    MainGauche,
    MhKillingSpree,
    OhKillingSpree,
    Eviscerate,
    Envenom,
    RuptureTicks,
    GarroteTicks,
    CrimsonTempest,
    CrimsonTempestTicks,
    VenomousWounds,
    DeadlyPoison,
    DeadlyInstantPoison,
    InstantPoison,
    WoundPoison,
    FanOfKnives,
    Shiv,
    ShurikenToss,
    Throw,
}

impl Ability {
    pub fn all() -> &'static [Ability] {
        &[
            Ability::MhAutoattacks,
            Ability::OhAutoattacks,
            Ability::Backstab,
            Ability::Dispatch,
            Ability::Mutilate,
            Ability::MhMutilate,
            Ability::OhMutilate,
            Ability::SinisterStrike,
            Ability::Hemorrhage,
            Ability::HemorrhageTicks,
            Ability::Ambush,
            Ability::RevealingStrike,
            Ability::MainGauche,
            Ability::MhKillingSpree,
            Ability::OhKillingSpree,
            Ability::Eviscerate,
            Ability::Envenom,
            Ability::RuptureTicks,
            Ability::GarroteTicks,
            Ability::CrimsonTempest,
            Ability::CrimsonTempestTicks,
            Ability::VenomousWounds,
            Ability::DeadlyPoison,
            Ability::DeadlyInstantPoison,
            Ability::InstantPoison,
            Ability::WoundPoison,
            Ability::FanOfKnives,
            Ability::Shiv,
            Ability::ShurikenToss,
            Ability::Throw,
        ]
    }

    /// Identifier used in frequency maps, crit-rate maps and breakdown keys
    pub fn name(&self) -> &'static str {
        match self {
            Ability::MhAutoattacks => "mh_autoattacks",
            Ability::OhAutoattacks => "oh_autoattacks",
            Ability::Backstab => "backstab",
            Ability::Dispatch => "dispatch",
            Ability::Mutilate => "mutilate",
            Ability::MhMutilate => "mh_mutilate",
            Ability::OhMutilate => "oh_mutilate",
            Ability::SinisterStrike => "sinister_strike",
            Ability::Hemorrhage => "hemorrhage",
            Ability::HemorrhageTicks => "hemorrhage_ticks",
            Ability::Ambush => "ambush",
            Ability::RevealingStrike => "revealing_strike",
            Ability::MainGauche => "main_gauche",
            Ability::MhKillingSpree => "mh_killing_spree",
            Ability::OhKillingSpree => "oh_killing_spree",
            Ability::Eviscerate => "eviscerate",
            Ability::Envenom => "envenom",
            Ability::RuptureTicks => "rupture_ticks",
            Ability::GarroteTicks => "garrote_ticks",
            Ability::CrimsonTempest => "crimson_tempest",
            Ability::CrimsonTempestTicks => "crimson_tempest_ticks",
            Ability::VenomousWounds => "venomous_wounds",
            Ability::DeadlyPoison => "deadly_poison",
            Ability::DeadlyInstantPoison => "deadly_instant_poison",
            Ability::InstantPoison => "instant_poison",
            Ability::WoundPoison => "wound_poison",
            Ability::FanOfKnives => "fan_of_knives",
            Ability::Shiv => "shiv",
            Ability::ShurikenToss => "shuriken_toss",
            Ability::Throw => "throw",
        }
    }

    pub fn from_name(name: &str) -> Option<Ability> {
        Ability::all().iter().copied().find(|a| a.name() == name)
    }

    /// Whether damage depends on a combo-point rank
    pub fn is_rank_dependent(&self) -> bool {
        matches!(
            self,
            Ability::Eviscerate
                | Ability::Envenom
                | Ability::RuptureTicks
                | Ability::CrimsonTempest
                | Ability::CrimsonTempestTicks
        )
    }

    /// Whether the breakdown engine consumes this identifier as a frequency-map key
    ///
    /// Per-hand mutilate formulas are driven by the single `mutilate` key.
    pub fn is_frequency_key(&self) -> bool {
        !matches!(self, Ability::MhMutilate | Ability::OhMutilate)
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ability {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        Ability::from_name(s).ok_or_else(|| CalcError::UnknownAbility(s.to_string()))
    }
}

/// What an ability's energy is spent on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityUse {
    Strike,
    Buff,
}

const ABILITY_COSTS: &[(&str, f64, AbilityUse)] = &[
    ("ambush", 60.0, AbilityUse::Strike),
    ("backstab", 35.0, AbilityUse::Strike),
    ("dispatch", 30.0, AbilityUse::Strike),
    ("envenom", 35.0, AbilityUse::Strike),
    ("eviscerate", 35.0, AbilityUse::Strike),
    ("garrote", 45.0, AbilityUse::Strike),
    ("hemorrhage", 30.0, AbilityUse::Strike),
    ("mutilate", 55.0, AbilityUse::Strike),
    ("recuperate", 30.0, AbilityUse::Buff),
    ("revealing_strike", 40.0, AbilityUse::Strike),
    ("rupture", 25.0, AbilityUse::Strike),
    ("sinister_strike", 40.0, AbilityUse::Strike),
    ("slice_and_dice", 25.0, AbilityUse::Buff),
    ("tricks_of_the_trade", 0.0, AbilityUse::Buff),
    ("shuriken_toss", 40.0, AbilityUse::Strike),
    ("shiv", 20.0, AbilityUse::Strike),
    ("feint", 20.0, AbilityUse::Buff),
];

const ABILITY_COOLDOWNS: &[(&str, f64)] = &[
    ("tricks_of_the_trade", 30.0),
    ("kick", 15.0),
    ("shiv", 8.0),
    ("vanish", 120.0),
    ("vendetta", 120.0),
    ("adrenaline_rush", 180.0),
    ("killing_spree", 120.0),
    ("shadow_dance", 60.0),
    ("shadowmeld", 120.0),
    ("marked_for_death", 60.0),
    ("preparation", 300.0),
];

/// Energy cost (scaled by `cost_modifier`) and use of an ability
pub fn ability_cost(name: &str, cost_modifier: f64) -> Result<(f64, AbilityUse)> {
    ABILITY_COSTS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, cost, usage)| (cost * cost_modifier, *usage))
        .ok_or_else(|| CalcError::UnknownAbility(name.to_string()))
}

/// Base cooldown in seconds, before readiness
pub fn base_cooldown(name: &str) -> Result<f64> {
    ABILITY_COOLDOWNS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, cd)| *cd)
        .ok_or_else(|| CalcError::UnknownAbility(name.to_string()))
}

/// Major cooldowns whose duration readiness shortens for a specialization
pub fn readiness_affected(spec: Spec) -> &'static [&'static str] {
    match spec {
        Spec::Assassination => &["vanish", "vendetta"],
        Spec::Combat => &["adrenaline_rush", "killing_spree"],
        Spec::Subtlety => &["vanish", "shadow_dance"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for ability in Ability::all() {
            assert_eq!(Ability::from_name(ability.name()), Some(*ability));
        }
        assert_eq!(Ability::from_name("slice_and_dice"), None);
    }

    #[test]
    fn test_parse_unknown_ability() {
        let err = "pistol_shot".parse::<Ability>().unwrap_err();
        assert_eq!(err, CalcError::UnknownAbility("pistol_shot".to_string()));
    }

    #[test]
    fn test_rank_dependent() {
        assert!(Ability::Eviscerate.is_rank_dependent());
        assert!(Ability::RuptureTicks.is_rank_dependent());
        assert!(!Ability::GarroteTicks.is_rank_dependent());
    }

    #[test]
    fn test_ability_cost() {
        let (cost, usage) = ability_cost("mutilate", 1.0).unwrap();
        assert!((cost - 55.0).abs() < f64::EPSILON);
        assert_eq!(usage, AbilityUse::Strike);

        let (cost, _) = ability_cost("ambush", 0.5).unwrap();
        assert!((cost - 30.0).abs() < f64::EPSILON);

        assert!(ability_cost("pick_pocket", 1.0).is_err());
    }

    #[test]
    fn test_readiness_affected() {
        assert!(readiness_affected(Spec::Combat).contains(&"killing_spree"));
        assert!(!readiness_affected(Spec::Assassination).contains(&"shadow_dance"));
        assert!((base_cooldown("vendetta").unwrap() - 120.0).abs() < f64::EPSILON);
    }
}
