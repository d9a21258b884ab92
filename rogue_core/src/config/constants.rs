//! Game constants configuration

use crate::error::{CalcError, Result};
use crate::types::Spec;
use serde::{Deserialize, Serialize};

/// Tunable model constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub crit: CritConstants,
    #[serde(default)]
    pub melee: MeleeConstants,
    #[serde(default)]
    pub specs: SpecConstants,
    /// Level-dependent tables, looked up by the highest entry at or below a level
    #[serde(default = "default_levels")]
    pub levels: Vec<LevelConstants>,
}

impl Default for GameConstants {
    fn default() -> Self {
        GameConstants {
            crit: CritConstants::default(),
            melee: MeleeConstants::default(),
            specs: SpecConstants::default(),
            levels: default_levels(),
        }
    }
}

impl GameConstants {
    /// Constants for a character level
    pub fn for_level(&self, level: u32) -> Result<&LevelConstants> {
        self.levels
            .iter()
            .filter(|entry| entry.level <= level)
            .max_by_key(|entry| entry.level)
            .or_else(|| self.levels.iter().min_by_key(|entry| entry.level))
            .ok_or_else(|| CalcError::InvalidInput("no level constants configured".to_string()))
    }

    pub fn spec(&self, spec: Spec) -> &SpecProfile {
        match spec {
            Spec::Assassination => &self.specs.assassination,
            Spec::Combat => &self.specs.combat,
            Spec::Subtlety => &self.specs.subtlety,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CritConstants {
    /// Critical strike damage multiplier (2.0 = 200%)
    #[serde(default = "default_crit_multiplier")]
    pub base_multiplier: f64,
    /// Crit chance every rogue starts with
    #[serde(default = "default_base_crit")]
    pub base_chance: f64,
}

impl Default for CritConstants {
    fn default() -> Self {
        CritConstants {
            base_multiplier: 2.0,
            base_chance: 0.15,
        }
    }
}

fn default_crit_multiplier() -> f64 {
    2.0
}
fn default_base_crit() -> f64 {
    0.15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeleeConstants {
    /// Miss chance for dual-wielded white swings
    #[serde(default = "default_dual_wield_miss")]
    pub dual_wield_miss_chance: f64,
    /// Off-hand damage penalty
    #[serde(default = "default_off_hand_penalty")]
    pub off_hand_penalty: f64,
    /// Off-hand damage penalty under combat (Ambidexterity)
    #[serde(default = "default_combat_off_hand_penalty")]
    pub combat_off_hand_penalty: f64,
    /// Attack power bonus multiplier under combat (Vitality)
    #[serde(default = "default_combat_ap_bonus")]
    pub combat_ap_bonus: f64,
    /// Share of multistrike chance that turns into damage
    #[serde(default = "default_multistrike_damage")]
    pub multistrike_damage: f64,
    /// Opener damage bonus from Nightstalker
    #[serde(default = "default_nightstalker_bonus")]
    pub nightstalker_bonus: f64,
}

impl Default for MeleeConstants {
    fn default() -> Self {
        MeleeConstants {
            dual_wield_miss_chance: 0.19,
            off_hand_penalty: 0.5,
            combat_off_hand_penalty: 0.875,
            combat_ap_bonus: 1.40,
            multistrike_damage: 0.3,
            nightstalker_bonus: 0.5,
        }
    }
}

fn default_dual_wield_miss() -> f64 {
    0.19
}
fn default_off_hand_penalty() -> f64 {
    0.5
}
fn default_combat_off_hand_penalty() -> f64 {
    0.875
}
fn default_combat_ap_bonus() -> f64 {
    1.40
}
fn default_multistrike_damage() -> f64 {
    0.3
}
fn default_nightstalker_bonus() -> f64 {
    0.5
}

/// Per-specialization conversions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecConstants {
    #[serde(default = "SpecProfile::assassination")]
    pub assassination: SpecProfile,
    #[serde(default = "SpecProfile::combat")]
    pub combat: SpecProfile,
    #[serde(default = "SpecProfile::subtlety")]
    pub subtlety: SpecProfile,
}

impl Default for SpecConstants {
    fn default() -> Self {
        SpecConstants {
            assassination: SpecProfile::assassination(),
            combat: SpecProfile::combat(),
            subtlety: SpecProfile::subtlety(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecProfile {
    /// Damage bonus per mastery point
    pub mastery_conversion: f64,
    /// Cooldown reduction weight of readiness
    pub readiness_conversion: f64,
    /// Flat passive multiplier applied to every damage type
    #[serde(default = "default_damage_modifier")]
    pub damage_modifier: f64,
}

impl SpecProfile {
    fn assassination() -> Self {
        SpecProfile {
            mastery_conversion: 0.035,
            readiness_conversion: 1.0,
            damage_modifier: 1.0,
        }
    }

    fn combat() -> Self {
        SpecProfile {
            mastery_conversion: 0.02,
            readiness_conversion: 0.8,
            damage_modifier: 1.0,
        }
    }

    fn subtlety() -> Self {
        SpecProfile {
            mastery_conversion: 0.03,
            readiness_conversion: 1.0,
            damage_modifier: 1.0,
        }
    }
}

fn default_damage_modifier() -> f64 {
    1.0
}

/// Constants that change with character level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConstants {
    pub level: u32,
    pub ratings: RatingConversions,
    /// K in `armor / (armor + K)`
    pub armor_constant: f64,
    /// Armor of a raid boss three levels higher
    pub boss_armor: f64,
    #[serde(default = "default_crit_suppression")]
    pub melee_crit_suppression: f64,
    #[serde(default = "default_crit_suppression")]
    pub spell_crit_suppression: f64,
}

fn default_crit_suppression() -> f64 {
    0.03
}

/// Rating needed for one percent of each secondary stat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingConversions {
    pub crit: f64,
    pub haste: f64,
    pub mastery: f64,
    pub multistrike: f64,
    pub readiness: f64,
    pub versatility: f64,
    /// Mastery points every character has before rating
    #[serde(default = "default_base_mastery")]
    pub base_mastery: f64,
}

fn default_base_mastery() -> f64 {
    8.0
}

fn default_levels() -> Vec<LevelConstants> {
    vec![
        LevelConstants {
            level: 90,
            ratings: RatingConversions {
                crit: 23.0,
                haste: 20.0,
                mastery: 23.0,
                multistrike: 14.0,
                readiness: 23.0,
                versatility: 27.0,
                base_mastery: 8.0,
            },
            armor_constant: 4037.5,
            boss_armor: 2200.0,
            melee_crit_suppression: 0.03,
            spell_crit_suppression: 0.03,
        },
        LevelConstants {
            level: 100,
            ratings: RatingConversions {
                crit: 110.0,
                haste: 90.0,
                mastery: 110.0,
                multistrike: 66.0,
                readiness: 110.0,
                versatility: 130.0,
                base_mastery: 8.0,
            },
            armor_constant: 7390.0,
            boss_armor: 3610.0,
            melee_crit_suppression: 0.03,
            spell_crit_suppression: 0.03,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = GameConstants::default();
        assert!((constants.crit.base_multiplier - 2.0).abs() < f64::EPSILON);
        assert!((constants.melee.off_hand_penalty - 0.5).abs() < f64::EPSILON);
        assert!((constants.spec(Spec::Combat).readiness_conversion - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_level_lookup() {
        let constants = GameConstants::default();
        assert_eq!(constants.for_level(90).unwrap().level, 90);
        assert_eq!(constants.for_level(95).unwrap().level, 90);
        assert_eq!(constants.for_level(100).unwrap().level, 100);
        // Below every entry falls back to the lowest one
        assert_eq!(constants.for_level(40).unwrap().level, 90);
    }

    #[test]
    fn test_parse_constants() {
        let toml = r#"
[crit]
base_multiplier = 2.06

[melee]
dual_wield_miss_chance = 0.17

[specs.assassination]
mastery_conversion = 0.035
readiness_conversion = 1.0
damage_modifier = 1.2

[[levels]]
level = 100
armor_constant = 7390.0
boss_armor = 3610.0

[levels.ratings]
crit = 110
haste = 90
mastery = 110
multistrike = 66
readiness = 110
versatility = 130
"#;

        let constants: GameConstants = toml::from_str(toml).unwrap();
        assert!((constants.crit.base_multiplier - 2.06).abs() < f64::EPSILON);
        assert!((constants.crit.base_chance - 0.15).abs() < f64::EPSILON);
        assert!((constants.melee.dual_wield_miss_chance - 0.17).abs() < f64::EPSILON);
        assert!((constants.melee.off_hand_penalty - 0.5).abs() < f64::EPSILON);
        assert!((constants.spec(Spec::Assassination).damage_modifier - 1.2).abs() < f64::EPSILON);
        assert!((constants.spec(Spec::Subtlety).mastery_conversion - 0.03).abs() < f64::EPSILON);
        assert_eq!(constants.levels.len(), 1);
        assert!((constants.levels[0].ratings.base_mastery - 8.0).abs() < f64::EPSILON);
    }
}
