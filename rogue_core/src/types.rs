//! Core enums shared across the damage model

use crate::error::{CalcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rogue specialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spec {
    Assassination,
    Combat,
    Subtlety,
}

impl Spec {
    pub fn all() -> &'static [Spec] {
        &[Spec::Assassination, Spec::Combat, Spec::Subtlety]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Spec::Assassination => "assassination",
            Spec::Combat => "combat",
            Spec::Subtlety => "subtlety",
        }
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Damage category used to select a modifier pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    Physical,
    Spell,
    Bleed,
}

impl DamageKind {
    pub fn all() -> &'static [DamageKind] {
        &[DamageKind::Physical, DamageKind::Spell, DamageKind::Bleed]
    }
}

/// Weapon hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    MainHand,
    OffHand,
}

/// Weapon type, which drives coefficient selection and normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Dagger,
    Sword,
    Axe,
    Mace,
    FistWeapon,
}

impl WeaponKind {
    /// Speed used by normalized weapon damage
    pub fn normalized_speed(&self) -> f64 {
        match self {
            WeaponKind::Dagger => 1.7,
            _ => 2.4,
        }
    }

    pub fn is_dagger(&self) -> bool {
        matches!(self, WeaponKind::Dagger)
    }
}

impl FromStr for WeaponKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dagger" => Ok(WeaponKind::Dagger),
            "sword" => Ok(WeaponKind::Sword),
            "axe" => Ok(WeaponKind::Axe),
            "mace" => Ok(WeaponKind::Mace),
            "fist" | "fist_weapon" => Ok(WeaponKind::FistWeapon),
            other => Err(CalcError::InvalidInput(format!("unknown weapon type '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_speed() {
        assert!((WeaponKind::Dagger.normalized_speed() - 1.7).abs() < f64::EPSILON);
        assert!((WeaponKind::Axe.normalized_speed() - 2.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weapon_kind_parse() {
        assert_eq!("dagger".parse::<WeaponKind>().unwrap(), WeaponKind::Dagger);
        assert!("polearm".parse::<WeaponKind>().is_err());
    }

    #[test]
    fn test_spec_serde_names() {
        let spec: Spec = serde_json::from_str("\"subtlety\"").unwrap();
        assert_eq!(spec, Spec::Subtlety);
        assert_eq!(Spec::Combat.to_string(), "combat");
    }
}
