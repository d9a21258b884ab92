//! Weapon damage as a function of attack power

use crate::types::WeaponKind;
use serde::{Deserialize, Serialize};

/// Attack power per point of weapon DPS
const AP_PER_DPS: f64 = 3.5;

/// An equipped weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Average base damage per swing
    pub damage: f64,
    /// Swing time in seconds
    pub speed: f64,
    #[serde(rename = "type")]
    pub kind: WeaponKind,
}

impl Weapon {
    pub fn new(damage: f64, speed: f64, kind: WeaponKind) -> Self {
        Weapon { damage, speed, kind }
    }

    /// Unnormalized swing damage (autoattacks and a few strikes)
    pub fn damage(&self, ap: f64) -> f64 {
        self.damage + self.speed * ap / AP_PER_DPS
    }

    /// Normalized damage used by most weapon strikes
    pub fn normalized_damage(&self, ap: f64) -> f64 {
        self.damage + self.kind.normalized_speed() * ap / AP_PER_DPS
    }

    pub fn is_dagger(&self) -> bool {
        self.kind.is_dagger()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unnormalized_damage() {
        let weapon = Weapon::new(1000.0, 2.6, WeaponKind::Axe);
        // 1000 + 2.6 * 3500 / 3.5
        assert!((weapon.damage(3500.0) - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_damage() {
        let dagger = Weapon::new(1000.0, 1.8, WeaponKind::Dagger);
        assert!((dagger.normalized_damage(3500.0) - 2700.0).abs() < 1e-9);

        let sword = Weapon::new(1000.0, 2.6, WeaponKind::Sword);
        assert!((sword.normalized_damage(3500.0) - 3400.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_weapon_table() {
        let weapon: Weapon = toml::from_str("damage = 1262.5\nspeed = 1.8\ntype = \"dagger\"\n").unwrap();
        assert_eq!(weapon, Weapon::new(1262.5, 1.8, WeaponKind::Dagger));
    }
}
