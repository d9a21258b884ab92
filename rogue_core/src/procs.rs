//! Damage procs - trinkets, weapon enchants and other triggered effects

use crate::types::Hand;
use serde::{Deserialize, Serialize};

/// A named damage proc
///
/// Its trigger rate comes from the frequency map under the proc's name,
/// and its crit rate from the crit map (no entry means it cannot crit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageProc {
    pub name: String,
    #[serde(flatten)]
    pub effect: ProcEffect,
}

/// Per-trigger damage of a proc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcEffect {
    /// Flat plus AP-scaled spell damage
    Spell {
        #[serde(default)]
        damage: f64,
        #[serde(default)]
        ap_coefficient: f64,
    },
    /// Flat plus AP-scaled physical damage, reduced by armor
    Physical {
        #[serde(default)]
        damage: f64,
        #[serde(default)]
        ap_coefficient: f64,
    },
    /// Extra normalized weapon strike
    WeaponStrike { hand: Hand, coefficient: f64 },
    /// Repeats a share of another breakdown entry's DPS
    Echo { source: String, fraction: f64 },
}

impl DamageProc {
    pub fn new(name: &str, effect: ProcEffect) -> Self {
        DamageProc {
            name: name.to_string(),
            effect,
        }
    }

    pub fn spell(name: &str, damage: f64, ap_coefficient: f64) -> Self {
        DamageProc::new(
            name,
            ProcEffect::Spell {
                damage,
                ap_coefficient,
            },
        )
    }

    pub fn physical(name: &str, damage: f64, ap_coefficient: f64) -> Self {
        DamageProc::new(
            name,
            ProcEffect::Physical {
                damage,
                ap_coefficient,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_procs_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            procs: Vec<DamageProc>,
        }

        let toml = r#"
[[procs]]
name = "dancing_steel"
type = "spell"
damage = 1500

[[procs]]
name = "mark_of_the_shattered_hand"
type = "physical"
ap_coefficient = 0.3

[[procs]]
name = "windfury"
type = "weapon_strike"
hand = "main_hand"
coefficient = 1.0

[[procs]]
name = "shadow_reflection"
type = "echo"
source = "eviscerate"
fraction = 0.5
"#;
        let wrapper: Wrapper = toml::from_str(toml).unwrap();
        assert_eq!(wrapper.procs.len(), 4);
        assert_eq!(wrapper.procs[0], DamageProc::spell("dancing_steel", 1500.0, 0.0));
        assert_eq!(
            wrapper.procs[1],
            DamageProc::physical("mark_of_the_shattered_hand", 0.0, 0.3)
        );
        assert_eq!(
            wrapper.procs[2].effect,
            ProcEffect::WeaponStrike {
                hand: Hand::MainHand,
                coefficient: 1.0
            }
        );
        assert!(matches!(wrapper.procs[3].effect, ProcEffect::Echo { .. }));
    }
}
