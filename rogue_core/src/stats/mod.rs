//! Stat snapshots and weapons

mod weapon;

pub use weapon::Weapon;

use crate::error::{CalcError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A stat the damage model reads from a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Ap,
    Agi,
    Str,
    Crit,
    Haste,
    Mastery,
    Multistrike,
    Readiness,
    Versatility,
}

impl Stat {
    pub fn all() -> &'static [Stat] {
        &[
            Stat::Ap,
            Stat::Agi,
            Stat::Str,
            Stat::Crit,
            Stat::Haste,
            Stat::Mastery,
            Stat::Multistrike,
            Stat::Readiness,
            Stat::Versatility,
        ]
    }

    /// Stats an EP run reports by default
    pub fn default_ep_stats() -> &'static [Stat] {
        &[
            Stat::Agi,
            Stat::Haste,
            Stat::Crit,
            Stat::Mastery,
            Stat::Ap,
            Stat::Multistrike,
            Stat::Readiness,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Ap => "ap",
            Stat::Agi => "agi",
            Stat::Str => "str",
            Stat::Crit => "crit",
            Stat::Haste => "haste",
            Stat::Mastery => "mastery",
            Stat::Multistrike => "multistrike",
            Stat::Readiness => "readiness",
            Stat::Versatility => "versatility",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stat {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        Stat::all()
            .iter()
            .copied()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| CalcError::InvalidInput(format!("unknown stat '{}'", s)))
    }
}

/// Current stat values fed to one breakdown computation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    values: BTreeMap<Stat, f64>,
}

impl StatSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, stat: Stat, value: f64) -> Self {
        self.values.insert(stat, value);
        self
    }

    pub fn set(&mut self, stat: Stat, value: f64) {
        self.values.insert(stat, value);
    }

    pub fn get(&self, stat: Stat) -> Option<f64> {
        self.values.get(&stat).copied()
    }

    /// Read a stat the computation cannot proceed without
    pub fn require(&self, stat: Stat) -> Result<f64> {
        self.get(stat)
            .ok_or_else(|| CalcError::MissingStat(stat.as_str().to_string()))
    }

    /// Copy with `amount` added to one stat (absent stats start from zero)
    pub fn perturbed(&self, stat: Stat, amount: f64) -> Self {
        let mut copy = self.clone();
        *copy.values.entry(stat).or_insert(0.0) += amount;
        copy
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        self.values.iter().map(|(stat, value)| (*stat, *value))
    }
}

impl FromIterator<(Stat, f64)> for StatSnapshot {
    fn from_iter<I: IntoIterator<Item = (Stat, f64)>>(iter: I) -> Self {
        StatSnapshot {
            values: iter.into_iter().collect(),
        }
    }
}
