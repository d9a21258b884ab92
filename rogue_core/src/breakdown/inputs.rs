//! Rotation outputs the breakdown consumes: attack frequencies and crit rates

use crate::error::{CalcError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occurrences per second of one ability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Frequency {
    Flat(f64),
    /// Per combo-point rank, index 0 = rank 1
    Ranked([f64; 5]),
}

impl Frequency {
    pub fn is_zero(&self) -> bool {
        match self {
            Frequency::Flat(value) => *value == 0.0,
            Frequency::Ranked(values) => values.iter().all(|v| *v == 0.0),
        }
    }

    /// Sum over ranks for ranked entries
    pub fn total(&self) -> f64 {
        match self {
            Frequency::Flat(value) => *value,
            Frequency::Ranked(values) => values.iter().sum(),
        }
    }
}

/// Ability/proc name → frequency, plus the rotation's opener rate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackFrequencyMap {
    entries: BTreeMap<String, Frequency>,
    #[serde(default)]
    pub openers_per_second: f64,
}

impl AttackFrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, per_second: f64) -> Self {
        self.insert(name, Frequency::Flat(per_second));
        self
    }

    pub fn with_ranked(mut self, name: &str, per_rank: [f64; 5]) -> Self {
        self.insert(name, Frequency::Ranked(per_rank));
        self
    }

    pub fn with_openers(mut self, per_second: f64) -> Self {
        self.openers_per_second = per_second;
        self
    }

    pub fn insert(&mut self, name: &str, frequency: Frequency) {
        self.entries.insert(name.to_string(), frequency);
    }

    pub fn get(&self, name: &str) -> Option<&Frequency> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flat frequency of an entry that must be present
    pub fn flat(&self, name: &str) -> Result<f64> {
        match self.entries.get(name) {
            Some(Frequency::Flat(value)) => Ok(*value),
            Some(Frequency::Ranked(_)) => Err(CalcError::InvalidInput(format!(
                "frequency for '{}' must be a single value",
                name
            ))),
            None => Err(CalcError::InvalidInput(format!("no frequency for '{}'", name))),
        }
    }

    /// Flat frequency, zero when absent
    pub fn flat_or_zero(&self, name: &str) -> Result<f64> {
        if self.contains(name) {
            self.flat(name)
        } else {
            Ok(0.0)
        }
    }

    /// Per-rank frequencies of an entry that must be present
    pub fn ranked(&self, name: &str) -> Result<[f64; 5]> {
        match self.entries.get(name) {
            Some(Frequency::Ranked(values)) => Ok(*values),
            Some(Frequency::Flat(_)) => Err(CalcError::InvalidInput(format!(
                "frequency for '{}' must be given per combo point rank",
                name
            ))),
            None => Err(CalcError::InvalidInput(format!("no frequency for '{}'", name))),
        }
    }

    /// Copy without zero-frequency entries
    pub fn without_zero_entries(&self) -> Self {
        AttackFrequencyMap {
            entries: self
                .entries
                .iter()
                .filter(|(_, frequency)| !frequency.is_zero())
                .map(|(name, frequency)| (name.clone(), *frequency))
                .collect(),
            openers_per_second: self.openers_per_second,
        }
    }
}

/// Ability name → crit probability
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CritRateMap {
    rates: BTreeMap<String, f64>,
}

impl CritRateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, rate: f64) -> Self {
        self.insert(name, rate);
        self
    }

    pub fn insert(&mut self, name: &str, rate: f64) {
        self.rates.insert(name.to_string(), rate);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rates.keys().map(String::as_str)
    }

    /// Optional lookup, validated
    pub fn get(&self, name: &str) -> Result<Option<f64>> {
        match self.rates.get(name) {
            Some(rate) if !(0.0..=1.0).contains(rate) => Err(CalcError::InvalidInput(format!(
                "crit rate for '{}' must be within [0, 1], got {}",
                name, rate
            ))),
            Some(rate) => Ok(Some(*rate)),
            None => Ok(None),
        }
    }

    /// Crit rate the computation cannot do without
    pub fn rate(&self, name: &str) -> Result<f64> {
        self.get(name)?
            .ok_or_else(|| CalcError::MissingStat(format!("crit rate for {}", name)))
    }
}

impl FromIterator<(String, f64)> for CritRateMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        CritRateMap {
            rates: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(String, Frequency)> for AttackFrequencyMap {
    fn from_iter<I: IntoIterator<Item = (String, Frequency)>>(iter: I) -> Self {
        AttackFrequencyMap {
            entries: iter.into_iter().collect(),
            openers_per_second: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_and_ranked_lookups() {
        let freqs = AttackFrequencyMap::new()
            .with("backstab", 0.4)
            .with_ranked("eviscerate", [0.0, 0.0, 0.0, 0.01, 0.1]);

        assert!((freqs.flat("backstab").unwrap() - 0.4).abs() < f64::EPSILON);
        assert!((freqs.flat_or_zero("oh_autoattacks").unwrap()).abs() < f64::EPSILON);
        assert_eq!(freqs.ranked("eviscerate").unwrap()[4], 0.1);
        assert!(matches!(freqs.flat("eviscerate"), Err(CalcError::InvalidInput(_))));
        assert!(matches!(freqs.ranked("backstab"), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_entries_dropped() {
        let freqs = AttackFrequencyMap::new()
            .with("backstab", 0.0)
            .with("ambush", 0.02)
            .with_ranked("rupture_ticks", [0.0; 5])
            .with_openers(0.02);
        let trimmed = freqs.without_zero_entries();
        assert_eq!(trimmed.keys().collect::<Vec<_>>(), vec!["ambush"]);
        assert!((trimmed.openers_per_second - 0.02).abs() < f64::EPSILON);
    }

    #[test]
    fn test_crit_rates() {
        let crits = CritRateMap::new().with("backstab", 0.3).with("bad", 1.5);
        assert!((crits.rate("backstab").unwrap() - 0.3).abs() < f64::EPSILON);
        assert_eq!(
            crits.rate("mutilate").unwrap_err(),
            CalcError::MissingStat("crit rate for mutilate".to_string())
        );
        assert_eq!(crits.get("mutilate").unwrap(), None);
        assert!(matches!(crits.rate("bad"), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn test_frequency_json_shapes() {
        let freqs: AttackFrequencyMap = serde_json::from_str(
            r#"{"entries": {"backstab": 0.5, "envenom": [0, 0, 0, 0.1, 0.2]}, "openers_per_second": 0.01}"#,
        )
        .unwrap();
        assert_eq!(freqs.get("backstab"), Some(&Frequency::Flat(0.5)));
        assert!((freqs.get("envenom").unwrap().total() - 0.3).abs() < 1e-12);
    }
}
