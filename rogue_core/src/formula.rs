//! Base damage formulas
//!
//! Every formula is a pure function of attack power, the equipped weapons
//! and, for finishers, a combo-point rank. The registry maps each
//! [`Ability`] to one [`Formula`] and is built once per calculator.

use crate::ability::Ability;
use crate::error::{CalcError, Result};
use crate::stats::Weapon;
use crate::types::Hand;
use std::collections::HashMap;

/// Lowest and highest combo-point rank
pub const MIN_RANK: u8 = 1;
pub const MAX_RANK: u8 = 5;

/// Weapon coefficient, optionally keyed on a main-hand dagger
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coefficient {
    Fixed(f64),
    /// Main-hand dagger decides the coefficient for both hands
    ByMainHand { dagger: f64, other: f64 },
}

impl Coefficient {
    pub fn value(&self, main_hand_dagger: bool) -> f64 {
        match *self {
            Coefficient::Fixed(value) => value,
            Coefficient::ByMainHand { dagger, other } => {
                if main_hand_dagger {
                    dagger
                } else {
                    other
                }
            }
        }
    }
}

/// How base damage is derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Formula {
    /// coefficient × weapon damage; off-hand strikes take the off-hand penalty
    WeaponStrike {
        hand: Hand,
        normalized: bool,
        coefficient: Coefficient,
    },
    /// coefficient × ap
    AttackPower(f64),
    /// per-point × cp × ap
    PerComboPoint(f64),
    /// table[cp] × ap
    RankTable([f64; 6]),
    /// factor × another ability's damage
    Scaled { base: Ability, factor: f64 },
}

/// Weapons and off-hand penalty a formula is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct WeaponContext<'a> {
    pub main_hand: &'a Weapon,
    pub off_hand: &'a Weapon,
    pub off_hand_penalty: f64,
}

impl<'a> WeaponContext<'a> {
    pub fn new(main_hand: &'a Weapon, off_hand: &'a Weapon, off_hand_penalty: f64) -> Self {
        WeaponContext {
            main_hand,
            off_hand,
            off_hand_penalty,
        }
    }

    fn weapon(&self, hand: Hand) -> &'a Weapon {
        match hand {
            Hand::MainHand => self.main_hand,
            Hand::OffHand => self.off_hand,
        }
    }
}

/// Ability → formula lookup table
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaRegistry {
    formulas: HashMap<Ability, Formula>,
}

impl FormulaRegistry {
    /// Every rogue formula
    pub fn rogue() -> Self {
        use Coefficient::{ByMainHand, Fixed};
        use Formula::*;

        let strike = |hand, normalized, coefficient| WeaponStrike {
            hand,
            normalized,
            coefficient,
        };

        FormulaRegistry::with_formulas([
            (Ability::MhAutoattacks, strike(Hand::MainHand, false, Fixed(1.0))),
            (Ability::OhAutoattacks, strike(Hand::OffHand, false, Fixed(1.0))),
            (Ability::Backstab, strike(Hand::MainHand, true, Fixed(3.80))),
            (
                Ability::Dispatch,
                strike(Hand::MainHand, true, ByMainHand { dagger: 4.80, other: 3.31 }),
            ),
            (
                Ability::MhMutilate,
                strike(Hand::MainHand, true, ByMainHand { dagger: 2.0, other: 1.37 }),
            ),
            (
                Ability::OhMutilate,
                strike(Hand::OffHand, true, ByMainHand { dagger: 2.0, other: 1.37 }),
            ),
            (
                Ability::SinisterStrike,
                strike(Hand::MainHand, true, ByMainHand { dagger: 1.88, other: 1.3 }),
            ),
            (
                Ability::Hemorrhage,
                strike(Hand::MainHand, true, ByMainHand { dagger: 2.32, other: 1.6 }),
            ),
            (
                Ability::HemorrhageTicks,
                Scaled {
                    base: Ability::Hemorrhage,
                    factor: 0.5 / 8.0,
                },
            ),
            (
                Ability::Ambush,
                strike(
                    Hand::MainHand,
                    true,
                    ByMainHand {
                        dagger: 3.65 * 1.447,
                        other: 3.65,
                    },
                ),
            ),
            (Ability::RevealingStrike, strike(Hand::MainHand, false, Fixed(1.60))),
            (Ability::MainGauche, strike(Hand::MainHand, true, Fixed(1.2))),
            (Ability::MhKillingSpree, strike(Hand::MainHand, true, Fixed(1.0))),
            (Ability::OhKillingSpree, strike(Hand::OffHand, true, Fixed(1.0))),
            (Ability::Eviscerate, PerComboPoint(0.18)),
            (Ability::Envenom, PerComboPoint(0.134)),
            (
                Ability::RuptureTicks,
                RankTable([0.0, 0.025, 0.04, 0.05, 0.056, 0.062]),
            ),
            (Ability::GarroteTicks, AttackPower(0.078)),
            (Ability::CrimsonTempest, PerComboPoint(0.0275)),
            (
                Ability::CrimsonTempestTicks,
                Scaled {
                    base: Ability::CrimsonTempest,
                    factor: 2.4 / 6.0,
                },
            ),
            (Ability::VenomousWounds, AttackPower(0.160)),
            (Ability::DeadlyPoison, AttackPower(0.213)),
            (Ability::DeadlyInstantPoison, AttackPower(0.109)),
            (Ability::InstantPoison, AttackPower(0.15)),
            (Ability::WoundPoison, AttackPower(0.120)),
            (Ability::FanOfKnives, AttackPower(0.175)),
            (Ability::Shiv, strike(Hand::OffHand, false, Fixed(0.25))),
            (Ability::ShurikenToss, AttackPower(0.6)),
            (Ability::Throw, AttackPower(0.05)),
        ])
    }

    /// Registry over an explicit set of formulas
    pub fn with_formulas<I>(formulas: I) -> Self
    where
        I: IntoIterator<Item = (Ability, Formula)>,
    {
        FormulaRegistry {
            formulas: formulas.into_iter().collect(),
        }
    }

    pub fn resolve(&self, ability: Ability) -> Result<&Formula> {
        self.formulas
            .get(&ability)
            .ok_or_else(|| CalcError::UnknownAbility(ability.name().to_string()))
    }

    /// Resolve by identifier
    pub fn resolve_name(&self, name: &str) -> Result<&Formula> {
        let ability: Ability = name.parse()?;
        self.resolve(ability)
    }

    pub fn contains(&self, ability: Ability) -> bool {
        self.formulas.contains_key(&ability)
    }

    /// Base damage of a rank-independent ability
    pub fn damage(&self, ability: Ability, weapons: &WeaponContext<'_>, ap: f64) -> Result<f64> {
        self.evaluate(ability, weapons, ap, None)
    }

    /// Base damage of a finisher at a combo-point rank
    pub fn ranked_damage(
        &self,
        ability: Ability,
        weapons: &WeaponContext<'_>,
        ap: f64,
        rank: u8,
    ) -> Result<f64> {
        if !(MIN_RANK..=MAX_RANK).contains(&rank) {
            return Err(CalcError::InvalidInput(format!(
                "combo point rank {} outside {}..={}",
                rank, MIN_RANK, MAX_RANK
            )));
        }
        self.evaluate(ability, weapons, ap, Some(rank))
    }

    fn evaluate(
        &self,
        ability: Ability,
        weapons: &WeaponContext<'_>,
        ap: f64,
        rank: Option<u8>,
    ) -> Result<f64> {
        let needs_rank = || {
            CalcError::InvalidInput(format!("{} needs a combo point rank", ability.name()))
        };

        match *self.resolve(ability)? {
            Formula::WeaponStrike {
                hand,
                normalized,
                coefficient,
            } => {
                let weapon = weapons.weapon(hand);
                let mut damage = if normalized {
                    weapon.normalized_damage(ap)
                } else {
                    weapon.damage(ap)
                };
                if hand == Hand::OffHand {
                    damage *= weapons.off_hand_penalty;
                }
                Ok(coefficient.value(weapons.main_hand.is_dagger()) * damage)
            }
            Formula::AttackPower(coefficient) => Ok(coefficient * ap),
            Formula::PerComboPoint(per_point) => {
                let cp = rank.ok_or_else(needs_rank)?;
                Ok(per_point * f64::from(cp) * ap)
            }
            Formula::RankTable(table) => {
                let cp = rank.ok_or_else(needs_rank)?;
                Ok(table[usize::from(cp)] * ap)
            }
            Formula::Scaled { base, factor } => {
                if base == ability {
                    return Err(CalcError::InvalidInput(format!(
                        "{} is scaled from itself",
                        ability.name()
                    )));
                }
                Ok(self.evaluate(base, weapons, ap, rank)? * factor)
            }
        }
    }
}

impl Default for FormulaRegistry {
    fn default() -> Self {
        FormulaRegistry::rogue()
    }
}
