//! CharacterStats - weapons plus level-dependent rating conversions

use crate::config::{GameConstants, RatingConversions};
use crate::error::Result;
use crate::source::StatsProvider;
use crate::stats::Weapon;
use crate::types::Hand;

/// Equipped weapons and the rating table for the current level
#[derive(Debug, Clone)]
pub struct CharacterStats {
    pub main_hand: Weapon,
    pub off_hand: Weapon,
    constants: GameConstants,
    ratings: RatingConversions,
}

impl CharacterStats {
    pub fn new(
        main_hand: Weapon,
        off_hand: Weapon,
        constants: &GameConstants,
        level: u32,
    ) -> Result<Self> {
        let ratings = constants.for_level(level)?.ratings.clone();
        Ok(CharacterStats {
            main_hand,
            off_hand,
            constants: constants.clone(),
            ratings,
        })
    }

    pub fn ratings(&self) -> &RatingConversions {
        &self.ratings
    }
}

impl StatsProvider for CharacterStats {
    fn weapon(&self, hand: Hand) -> &Weapon {
        match hand {
            Hand::MainHand => &self.main_hand,
            Hand::OffHand => &self.off_hand,
        }
    }

    fn crit_from_rating(&self, rating: f64) -> f64 {
        rating / self.ratings.crit / 100.0
    }

    fn mastery_from_rating(&self, rating: f64) -> f64 {
        self.ratings.base_mastery + rating / self.ratings.mastery
    }

    fn multistrike_from_rating(&self, rating: f64) -> f64 {
        rating / self.ratings.multistrike / 100.0
    }

    fn readiness_multiplier_from_rating(&self, rating: f64, conversion: f64) -> f64 {
        1.0 / (1.0 + conversion * rating / self.ratings.readiness / 100.0)
    }

    fn set_level(&mut self, level: u32) -> Result<()> {
        self.ratings = self.constants.for_level(level)?.ratings.clone();
        Ok(())
    }
}
