//! Static talent tree data

use crate::error::{CalcError, Result};

/// Levels at which each tier unlocks
pub const TIER_LEVELS: [u32; 7] = [15, 30, 45, 60, 75, 90, 100];

/// Highest supported character level
pub const MAX_LEVEL: u32 = 100;

/// One class's talent tree: tiers of mutually exclusive talents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TalentTree {
    pub class_id: &'static str,
    pub tiers: &'static [&'static [&'static str]],
}

const ROGUE_TIERS: &[&[&str]] = &[
    &["nightstalker", "subterfuge", "shadow_focus"],
    &["deadly_throw", "nerve_strike", "combat_readiness"],
    &["cheat_death", "leeching_poison", "elusiveness"],
    &["cloak_and_dagger", "shadowstep", "burst_of_speed"],
    &["prey_on_the_weak", "internal_bleeding", "dirty_tricks"],
    &["shuriken_toss", "marked_for_death", "anticipation"],
    &["venom_rush", "shadow_reflection", "death_from_above"],
];

impl TalentTree {
    /// Look up the tree for a class
    pub fn for_class(class_id: &str) -> Result<TalentTree> {
        match class_id {
            "rogue" => Ok(TalentTree {
                class_id: "rogue",
                tiers: ROGUE_TIERS,
            }),
            other => Err(CalcError::InvalidInput(format!(
                "no talent tree for class '{}'",
                other
            ))),
        }
    }

    /// Tier index (0-based) of a talent, if it belongs to this tree
    pub fn tier_of(&self, talent: &str) -> Option<usize> {
        self.tiers
            .iter()
            .position(|tier| tier.iter().any(|&t| t == talent))
    }

    pub fn contains(&self, talent: &str) -> bool {
        self.tier_of(talent).is_some()
    }

    /// Every talent in tier order
    pub fn all_talents(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tiers.iter().flat_map(|tier| tier.iter().copied())
    }
}

/// Number of tiers unlocked at a level
pub fn unlocked_tiers(level: u32) -> usize {
    TIER_LEVELS.iter().filter(|&&threshold| level >= threshold).count()
}
