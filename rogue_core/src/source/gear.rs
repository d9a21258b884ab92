//! GearBuffs - set bonuses, meta gems and on-use items

use crate::ability::Ability;
use crate::error::{CalcError, Result};
use crate::source::GearBonusProvider;
use crate::stats::StatSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const KNOWN_GEAR_BUFFS: &[&str] = &[
    "rogue_t14_2pc",
    "rogue_t14_4pc",
    "rogue_t15_2pc",
    "rogue_t15_4pc",
    "rogue_t16_2pc",
    "rogue_t16_4pc",
    "rogue_t17_2pc",
    "rogue_t17_4pc",
    "leather_specialization",
    "chaotic_metagem",
    "virmens_bite",
    "virmens_bite_prepot",
];

/// An on-use item that deals damage once per cooldown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnUseItem {
    pub name: String,
    #[serde(default)]
    pub damage: f64,
    #[serde(default)]
    pub ap_coefficient: f64,
    /// Seconds between uses
    pub cooldown: f64,
}

impl OnUseItem {
    pub fn dps(&self, ap: f64) -> f64 {
        (self.damage + self.ap_coefficient * ap) / self.cooldown
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GearBuffs {
    active: BTreeSet<String>,
    on_use: Vec<OnUseItem>,
}

impl GearBuffs {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut active = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            if !KNOWN_GEAR_BUFFS.contains(&name) {
                return Err(CalcError::InvalidInput(format!("unknown gear buff '{}'", name)));
            }
            active.insert(name.to_string());
        }
        Ok(GearBuffs {
            active,
            on_use: Vec::new(),
        })
    }

    /// Add on-use items; cooldowns must be positive
    pub fn with_on_use(mut self, items: Vec<OnUseItem>) -> Result<Self> {
        if let Some(item) = items.iter().find(|item| item.cooldown <= 0.0) {
            return Err(CalcError::InvalidInput(format!(
                "on-use item '{}' needs a positive cooldown",
                item.name
            )));
        }
        self.on_use = items;
        Ok(self)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }
}

impl GearBonusProvider for GearBuffs {
    fn set_bonus_multiplier(&self, ability: Ability) -> f64 {
        if !self.is_active("rogue_t14_2pc") {
            return 1.0;
        }
        match ability {
            Ability::VenomousWounds => 1.2,
            Ability::SinisterStrike => 1.15,
            Ability::Backstab => 1.10,
            _ => 1.0,
        }
    }

    fn crit_damage_multiplier(&self) -> f64 {
        if self.is_active("chaotic_metagem") {
            1.03
        } else {
            1.0
        }
    }

    fn on_use_damage(&self, ap: f64, _stats: &StatSnapshot) -> Vec<(String, f64)> {
        self.on_use
            .iter()
            .map(|item| (item.name.clone(), item.dps(ap)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t14_bonus() {
        let gear = GearBuffs::new(["rogue_t14_2pc"]).unwrap();
        assert!((gear.set_bonus_multiplier(Ability::Backstab) - 1.10).abs() < f64::EPSILON);
        assert!((gear.set_bonus_multiplier(Ability::VenomousWounds) - 1.2).abs() < f64::EPSILON);
        assert!((gear.set_bonus_multiplier(Ability::Dispatch) - 1.0).abs() < f64::EPSILON);

        let plain = GearBuffs::default();
        assert!((plain.set_bonus_multiplier(Ability::Backstab) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metagem() {
        let gear = GearBuffs::new(["chaotic_metagem"]).unwrap();
        assert!((gear.crit_damage_multiplier() - 1.03).abs() < f64::EPSILON);
    }

    #[test]
    fn test_on_use_dps() {
        let gear = GearBuffs::default()
            .with_on_use(vec![OnUseItem {
                name: "bomb".to_string(),
                damage: 6000.0,
                ap_coefficient: 1.0,
                cooldown: 60.0,
            }])
            .unwrap();
        let out = gear.on_use_damage(6000.0, &StatSnapshot::new());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "bomb");
        assert!((out[0].1 - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(GearBuffs::new(["rogue_t99_2pc"]).is_err());
        let zero_cooldown = OnUseItem {
            name: "broken".to_string(),
            damage: 1.0,
            ap_coefficient: 0.0,
            cooldown: 0.0,
        };
        assert!(GearBuffs::default().with_on_use(vec![zero_cooldown]).is_err());
    }
}
