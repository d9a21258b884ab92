//! DamageBreakdown - per-contribution DPS

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Average damage of a hit-or-crit roll, times how often it happens
pub fn expected_value(base: f64, crit_rate: f64, frequency: f64, crit_multiplier: f64) -> f64 {
    let average_hit = base * (1.0 - crit_rate) + base * crit_rate * crit_multiplier;
    average_hit * frequency
}

/// Contribution name → DPS
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DamageBreakdown {
    entries: BTreeMap<String, f64>,
}

impl DamageBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an entry, replacing any previous value
    pub fn insert(&mut self, name: &str, dps: f64) {
        self.entries.insert(name.to_string(), dps);
    }

    /// Add to an entry, creating it at zero
    pub fn add(&mut self, name: &str, dps: f64) {
        *self.entries.entry(name.to_string()).or_insert(0.0) += dps;
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Multiply one entry; false when it does not exist
    pub fn scale(&mut self, name: &str, factor: f64) -> bool {
        match self.entries.get_mut(name) {
            Some(dps) => {
                *dps *= factor;
                true
            }
            None => false,
        }
    }

    pub fn scale_all(&mut self, factor: f64) {
        for dps in self.entries.values_mut() {
            *dps *= factor;
        }
    }

    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(name, dps)| (name.as_str(), *dps))
    }

    /// Entries from largest to smallest contribution
    pub fn sorted_by_dps(&self) -> Vec<(&str, f64)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }

    pub fn into_inner(self) -> BTreeMap<String, f64> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_value() {
        // 100 base, 25% crit at 2x, twice a second
        let ev = expected_value(100.0, 0.25, 2.0, 2.0);
        assert!((ev - 250.0).abs() < 1e-12);
        assert!(expected_value(100.0, 0.5, 0.0, 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_and_scale() {
        let mut breakdown = DamageBreakdown::new();
        breakdown.add("dancing_steel", 10.0);
        breakdown.add("dancing_steel", 5.0);
        breakdown.insert("backstab", 100.0);
        assert!((breakdown.get("dancing_steel").unwrap() - 15.0).abs() < f64::EPSILON);

        assert!(breakdown.scale("backstab", 1.5));
        assert!(!breakdown.scale("ambush", 2.0));
        breakdown.scale_all(2.0);
        assert!((breakdown.total() - 330.0).abs() < 1e-9);
    }

    #[test]
    fn test_sorted_by_dps() {
        let mut breakdown = DamageBreakdown::new();
        breakdown.insert("a", 1.0);
        breakdown.insert("b", 3.0);
        breakdown.insert("c", 2.0);
        let names: Vec<_> = breakdown.sorted_by_dps().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_json_is_flat_map() {
        let mut breakdown = DamageBreakdown::new();
        breakdown.insert("eviscerate", 1234.5);
        assert_eq!(serde_json::to_string(&breakdown).unwrap(), r#"{"eviscerate":1234.5}"#);
    }
}
