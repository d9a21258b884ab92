//! Buffs - raid buffs and debuffs by name

use crate::error::{CalcError, Result};
use crate::source::BuffsProvider;
use std::collections::BTreeSet;

/// Buffs the damage model reads a multiplier from
const DAMAGE_BUFFS: &[&str] = &[
    "attack_power_buff",
    "crit_chance_buff",
    "physical_vulnerability_debuff",
    "spell_damage_debuff",
    "armor_debuff",
];

/// Buffs that only matter to the rotation and stat collaborators
const CYCLE_BUFFS: &[&str] = &[
    "short_term_haste_buff",
    "stat_multiplier_buff",
    "mastery_buff",
    "melee_haste_buff",
    "spell_haste_buff",
    "multistrike_buff",
    "versatility_buff",
    "agi_flask_mop",
    "food_300_agi",
    "flask_wod_agi",
    "food_wod_agi",
];

/// Set of active raid buffs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffs {
    active: BTreeSet<String>,
}

impl Buffs {
    /// Build from buff names, rejecting anything unknown
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut active = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            if !DAMAGE_BUFFS.contains(&name) && !CYCLE_BUFFS.contains(&name) {
                return Err(CalcError::InvalidInput(format!("unknown buff '{}'", name)));
            }
            active.insert(name.to_string());
        }
        Ok(Buffs { active })
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    fn multiplier_if(&self, name: &str, value: f64) -> f64 {
        if self.is_active(name) {
            value
        } else {
            1.0
        }
    }
}

impl BuffsProvider for Buffs {
    fn attack_power_multiplier(&self) -> f64 {
        self.multiplier_if("attack_power_buff", 1.10)
    }

    fn crit_chance_bonus(&self) -> f64 {
        if self.is_active("crit_chance_buff") {
            0.05
        } else {
            0.0
        }
    }

    fn physical_damage_multiplier(&self) -> f64 {
        self.multiplier_if("physical_vulnerability_debuff", 1.04)
    }

    fn spell_damage_multiplier(&self) -> f64 {
        self.multiplier_if("spell_damage_debuff", 1.05)
    }

    fn armor_multiplier(&self) -> f64 {
        self.multiplier_if("armor_debuff", 0.88)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_buffs() {
        let buffs = Buffs::default();
        assert!((buffs.attack_power_multiplier() - 1.0).abs() < f64::EPSILON);
        assert!(buffs.crit_chance_bonus().abs() < f64::EPSILON);
        assert!((buffs.armor_multiplier() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_damage_buffs() {
        let buffs = Buffs::new(["attack_power_buff", "armor_debuff", "crit_chance_buff"]).unwrap();
        assert!((buffs.attack_power_multiplier() - 1.10).abs() < f64::EPSILON);
        assert!((buffs.armor_multiplier() - 0.88).abs() < f64::EPSILON);
        assert!((buffs.crit_chance_bonus() - 0.05).abs() < f64::EPSILON);
        assert!((buffs.spell_damage_multiplier() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cycle_buffs_accepted() {
        let buffs = Buffs::new(["melee_haste_buff", "food_300_agi"]).unwrap();
        assert!(buffs.is_active("melee_haste_buff"));
        assert!((buffs.attack_power_multiplier() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_buff() {
        assert!(matches!(
            Buffs::new(["bloodlust_but_misspelled"]),
            Err(CalcError::InvalidInput(_))
        ));
    }
}
