//! Talent configuration - decoding, level gating and tier exclusivity

mod tree;

pub use tree::{unlocked_tiers, TalentTree, MAX_LEVEL, TIER_LEVELS};

use crate::error::{CalcError, Result};
use std::collections::BTreeMap;

/// Longest accepted talent encoding (one symbol per tier)
pub const MAX_ENCODING_LEN: usize = 7;

/// Active talents for one character
///
/// Flags are only ever true for talents in tiers unlocked at `level`, and at
/// most one talent per tier is active. Querying a talent that was never set
/// returns false.
#[derive(Debug, Clone, PartialEq)]
pub struct TalentConfiguration {
    tree: TalentTree,
    level: u32,
    flags: BTreeMap<&'static str, bool>,
}

impl TalentConfiguration {
    /// Create an empty configuration
    pub fn new(class_id: &str, level: u32) -> Result<Self> {
        validate_level(level)?;
        Ok(TalentConfiguration {
            tree: TalentTree::for_class(class_id)?,
            level,
            flags: BTreeMap::new(),
        })
    }

    /// Decode a talent encoding such as `"332213"`
    ///
    /// Symbol `n` at position `i` selects option `n` (1-based) in tier `i`;
    /// `0` and `.` select nothing. Selections in tiers that are still locked
    /// at `level` are dropped.
    pub fn decode(encoding: &str, class_id: &str, level: u32) -> Result<Self> {
        let mut config = Self::new(class_id, level)?;
        let selections = parse_encoding(encoding)?;
        let top_tier = config.top_tier();

        for (tier, selection) in selections.into_iter().enumerate() {
            let Some(option) = selection else { continue };
            let Some(options) = config.tree.tiers.get(tier) else {
                return Err(CalcError::InvalidInput(format!(
                    "{} has no talent tier {}",
                    config.tree.class_id,
                    tier + 1
                )));
            };
            let Some(&talent) = options.get(option - 1) else {
                return Err(CalcError::InvalidInput(format!(
                    "tier {} has no option {}",
                    tier + 1,
                    option
                )));
            };
            if tier < top_tier {
                config.flags.insert(talent, true);
            }
        }

        Ok(config)
    }

    pub fn class_id(&self) -> &'static str {
        self.tree.class_id
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn tree(&self) -> &TalentTree {
        &self.tree
    }

    /// Number of tiers unlocked at the current level
    pub fn top_tier(&self) -> usize {
        unlocked_tiers(self.level).min(self.tree.tiers.len())
    }

    /// Whether a talent is active. Unknown names are simply inactive.
    pub fn is_active(&self, talent: &str) -> bool {
        self.flags.get(talent).copied().unwrap_or(false)
    }

    pub fn tier_of(&self, talent: &str) -> Option<usize> {
        self.tree.tier_of(talent)
    }

    /// Whether a talent belongs to the tree, optionally requiring its tier be unlocked
    pub fn is_allowed(&self, talent: &str, check_level: bool) -> bool {
        match self.tree.tier_of(talent) {
            Some(tier) => !check_level || tier < self.top_tier(),
            None => false,
        }
    }

    /// Talents from every tier unlocked at the current level
    pub fn allowed_for_level(&self) -> Vec<&'static str> {
        self.tree.tiers[..self.top_tier()]
            .iter()
            .flat_map(|tier| tier.iter().copied())
            .collect()
    }

    /// Activate a talent and clear the rest of its tier
    ///
    /// Returns false and changes nothing if the talent is not in the tree or
    /// its tier is locked at the current level.
    pub fn set_talent(&mut self, talent: &str) -> bool {
        let Some(tier) = self.tree.tier_of(talent) else {
            return false;
        };
        if tier >= self.top_tier() {
            return false;
        }
        for &other in self.tree.tiers[tier] {
            self.flags.insert(other, other == talent);
        }
        true
    }

    /// Deactivate every talent
    pub fn reset_all(&mut self) {
        for talent in self.tree.all_talents() {
            self.flags.insert(talent, false);
        }
    }

    /// Change level, dropping selections in tiers that become locked
    pub fn set_level(&mut self, level: u32) -> Result<()> {
        validate_level(level)?;
        self.level = level;
        let top_tier = self.top_tier();
        for tier in self.tree.tiers.iter().skip(top_tier) {
            for &talent in tier.iter() {
                self.flags.insert(talent, false);
            }
        }
        Ok(())
    }

    /// Active talents in tier order
    pub fn active_talents(&self) -> Vec<&'static str> {
        self.tree.all_talents().filter(|t| self.is_active(t)).collect()
    }

    /// Selected option (1-based) per tier, `None` where nothing is selected
    pub fn selections(&self) -> Vec<Option<usize>> {
        self.tree
            .tiers
            .iter()
            .map(|tier| tier.iter().position(|t| self.is_active(t)).map(|i| i + 1))
            .collect()
    }

    /// Encode the unlocked tiers back into a talent string
    pub fn encode(&self) -> String {
        self.selections()
            .into_iter()
            .take(self.top_tier())
            .map(|selection| match selection {
                Some(option) => char::from_digit(option as u32, 10).unwrap_or('0'),
                None => '0',
            })
            .collect()
    }
}

fn validate_level(level: u32) -> Result<()> {
    if level == 0 || level > MAX_LEVEL {
        return Err(CalcError::InvalidInput(format!(
            "level must be between 1 and {}, got {}",
            MAX_LEVEL, level
        )));
    }
    Ok(())
}

/// Validate the whole encoding before anything is applied
fn parse_encoding(encoding: &str) -> Result<Vec<Option<usize>>> {
    if encoding.chars().count() > MAX_ENCODING_LEN {
        return Err(CalcError::InvalidInput(format!(
            "talent strings must be {} or less characters long",
            MAX_ENCODING_LEN
        )));
    }
    encoding
        .chars()
        .map(|symbol| match symbol {
            '0' | '.' => Ok(None),
            '1' => Ok(Some(1)),
            '2' => Ok(Some(2)),
            '3' => Ok(Some(3)),
            other => Err(CalcError::InvalidInput(format!(
                "talent symbol '{}' must be one of 0, 1, 2, 3 or '.'",
                other
            ))),
        })
        .collect()
}
