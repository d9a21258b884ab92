//! Stat weights (EP) from finite differences of total DPS

use crate::breakdown::{AttackFrequencyMap, CritRateMap, RogueCalculator};
use crate::error::{CalcError, Result};
use crate::procs::DamageProc;
use crate::stats::{Stat, StatSnapshot};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// What a rotation model hands to the breakdown engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleInputs {
    pub frequencies: AttackFrequencyMap,
    pub crit_rates: CritRateMap,
    pub procs: Vec<DamageProc>,
}

/// Rotation model: stats in, frequencies and crit rates out
pub trait CycleModel {
    fn cycle(&self, calculator: &RogueCalculator, stats: &StatSnapshot) -> Result<CycleInputs>;
}

/// A rotation that does not react to stats
///
/// Optionally re-derives every crit rate from the snapshot's crit rating,
/// which lets crit pick up a weight while haste stays flat.
#[derive(Debug, Clone, Default)]
pub struct FixedCycle {
    inputs: CycleInputs,
    crit_from_rating: bool,
}

impl FixedCycle {
    pub fn new(inputs: CycleInputs) -> Self {
        FixedCycle {
            inputs,
            crit_from_rating: false,
        }
    }

    pub fn with_rating_crit(mut self) -> Self {
        self.crit_from_rating = true;
        self
    }
}

impl CycleModel for FixedCycle {
    fn cycle(&self, calculator: &RogueCalculator, stats: &StatSnapshot) -> Result<CycleInputs> {
        if !self.crit_from_rating {
            return Ok(self.inputs.clone());
        }
        let rating = stats.get(Stat::Crit).unwrap_or(0.0);
        let crit = calculator.melee_crit_rate(rating).clamp(0.0, 1.0);
        let mut inputs = self.inputs.clone();
        inputs.crit_rates = self
            .inputs
            .crit_rates
            .names()
            .map(|name| (name.to_string(), crit))
            .collect();
        Ok(inputs)
    }
}

/// EP per stat plus the DPS it was derived from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpValues {
    pub baseline_dps: f64,
    /// `None` when weights are raw DPS per point
    pub normalized_to: Option<Stat>,
    /// DPS per point of each stat
    pub marginal_dps: BTreeMap<Stat, f64>,
    pub weights: BTreeMap<Stat, f64>,
}

impl EpValues {
    pub fn weight(&self, stat: Stat) -> Option<f64> {
        self.weights.get(&stat).copied()
    }
}

#[derive(Debug, Clone)]
pub struct EpEstimator {
    stats: Vec<Stat>,
    normalize_to: Option<Stat>,
    step: f64,
}

impl Default for EpEstimator {
    fn default() -> Self {
        EpEstimator {
            stats: Stat::default_ep_stats().to_vec(),
            normalize_to: Some(Stat::Agi),
            step: 1.0,
        }
    }
}

impl EpEstimator {
    /// `normalize_to: None` reports raw DPS per point
    pub fn new(stats: Vec<Stat>, normalize_to: Option<Stat>, step: f64) -> Result<Self> {
        if step <= 0.0 {
            return Err(CalcError::InvalidInput(format!(
                "EP step must be positive, got {}",
                step
            )));
        }
        Ok(EpEstimator {
            stats,
            normalize_to,
            step,
        })
    }

    pub fn stats(&self) -> &[Stat] {
        &self.stats
    }

    /// Total DPS for one snapshot under a rotation model
    pub fn dps(
        &self,
        calculator: &mut RogueCalculator,
        cycle: &dyn CycleModel,
        stats: &StatSnapshot,
    ) -> Result<f64> {
        let inputs = cycle.cycle(calculator, stats)?;
        calculator.total_dps(stats, &inputs.frequencies, &inputs.crit_rates, &inputs.procs)
    }

    /// Weights for every configured stat, relative to the normalizing stat if any
    pub fn estimate(
        &self,
        calculator: &mut RogueCalculator,
        cycle: &dyn CycleModel,
        stats: &StatSnapshot,
    ) -> Result<EpValues> {
        let baseline_dps = self.dps(calculator, cycle, stats)?;

        let mut marginal_dps = BTreeMap::new();
        let mut wanted = self.stats.clone();
        if let Some(normalize_to) = self.normalize_to {
            if !wanted.contains(&normalize_to) {
                wanted.push(normalize_to);
            }
        }
        for stat in wanted {
            let dps = self.dps(calculator, cycle, &stats.perturbed(stat, self.step))?;
            let per_point = (dps - baseline_dps) / self.step;
            debug!(%stat, per_point, "marginal dps");
            marginal_dps.insert(stat, per_point);
        }

        let normalizer = match self.normalize_to {
            Some(stat) => {
                let normalizer = marginal_dps.get(&stat).copied().unwrap_or(0.0);
                if normalizer.abs() < f64::EPSILON {
                    return Err(CalcError::InvalidInput(format!(
                        "{} adds no damage, cannot normalize EP to it",
                        stat
                    )));
                }
                normalizer
            }
            None => 1.0,
        };

        let weights = self
            .stats
            .iter()
            .map(|stat| (*stat, marginal_dps[stat] / normalizer))
            .collect();

        Ok(EpValues {
            baseline_dps,
            normalized_to: self.normalize_to,
            marginal_dps,
            weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::CharacterBuild;
    use crate::config::GameConstants;
    use crate::settings::Settings;
    use crate::source::{Buffs, CharacterStats, GearBuffs, Race};
    use crate::stats::Weapon;
    use crate::talents::TalentConfiguration;
    use crate::types::{Spec, WeaponKind};

    fn make_calculator() -> RogueCalculator {
        let constants = GameConstants::default();
        let stats = CharacterStats::new(
            Weapon::new(1500.0, 1.8, WeaponKind::Dagger),
            Weapon::new(1500.0, 1.8, WeaponKind::Dagger),
            &constants,
            100,
        )
        .unwrap();
        let build = CharacterBuild {
            stats: Box::new(stats),
            talents: TalentConfiguration::new("rogue", 100).unwrap(),
            buffs: Box::new(Buffs::default()),
            race: Box::new(Race::new("night_elf").unwrap()),
            gear: Box::new(GearBuffs::default()),
            settings: Settings::new(Spec::Subtlety),
        };
        RogueCalculator::new(build, constants, 100).unwrap()
    }

    fn snapshot() -> StatSnapshot {
        StatSnapshot::new()
            .with(Stat::Ap, 0.0)
            .with(Stat::Agi, 3000.0)
            .with(Stat::Str, 0.0)
            .with(Stat::Crit, 1000.0)
            .with(Stat::Haste, 800.0)
            .with(Stat::Mastery, 900.0)
            .with(Stat::Multistrike, 700.0)
            .with(Stat::Readiness, 0.0)
    }

    fn cycle() -> FixedCycle {
        FixedCycle::new(CycleInputs {
            frequencies: AttackFrequencyMap::new()
                .with("mh_autoattacks", 0.6)
                .with("oh_autoattacks", 0.6)
                .with("backstab", 0.35)
                .with_ranked("eviscerate", [0.0, 0.0, 0.0, 0.0, 0.1])
                .with_ranked("rupture_ticks", [0.0, 0.0, 0.0, 0.0, 0.5]),
            crit_rates: CritRateMap::new()
                .with("mh_autoattacks", 0.2)
                .with("oh_autoattacks", 0.2)
                .with("backstab", 0.2)
                .with("eviscerate", 0.2)
                .with("rupture_ticks", 0.2),
            procs: Vec::new(),
        })
    }

    #[test]
    fn test_agi_and_ap_weights() {
        let mut calc = make_calculator();
        let ep = EpEstimator::default()
            .estimate(&mut calc, &cycle(), &snapshot())
            .unwrap();

        assert!((ep.weight(Stat::Agi).unwrap() - 1.0).abs() < 1e-9);
        // Agility and attack power feed the same average AP
        assert!((ep.weight(Stat::Ap).unwrap() - 1.0).abs() < 1e-6);
        assert!(ep.weight(Stat::Mastery).unwrap() > 0.0);
        assert!(ep.weight(Stat::Multistrike).unwrap() > 0.0);
        // Fixed frequencies and crit rates: haste and crit do nothing
        assert!(ep.weight(Stat::Haste).unwrap().abs() < 1e-9);
        assert!(ep.weight(Stat::Crit).unwrap().abs() < 1e-9);
        assert!(ep.baseline_dps > 0.0);
    }

    #[test]
    fn test_rating_crit_gets_weight() {
        let mut calc = make_calculator();
        let ep = EpEstimator::default()
            .estimate(&mut calc, &cycle().with_rating_crit(), &snapshot())
            .unwrap();
        assert!(ep.weight(Stat::Crit).unwrap() > 0.0);
    }

    #[test]
    fn test_zero_normalizer() {
        let mut calc = make_calculator();
        let empty = FixedCycle::default();
        let result = EpEstimator::default().estimate(&mut calc, &empty, &snapshot());
        assert!(matches!(result, Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn test_normalizer_outside_stat_list() {
        let mut calc = make_calculator();
        let estimator = EpEstimator::new(vec![Stat::Mastery], Some(Stat::Agi), 1.0).unwrap();
        let ep = estimator.estimate(&mut calc, &cycle(), &snapshot()).unwrap();
        assert_eq!(ep.weights.len(), 1);
        assert!(ep.marginal_dps.contains_key(&Stat::Agi));
        assert!(EpEstimator::new(vec![Stat::Agi], Some(Stat::Agi), 0.0).is_err());
    }

    #[test]
    fn test_raw_dps_per_point() {
        let mut calc = make_calculator();
        let estimator = EpEstimator::new(vec![Stat::Agi, Stat::Mastery], None, 1.0).unwrap();
        let raw = estimator.estimate(&mut calc, &cycle(), &snapshot()).unwrap();
        assert_eq!(raw.normalized_to, None);
        assert_eq!(raw.marginal_dps.len(), 2);
        for stat in [Stat::Agi, Stat::Mastery] {
            assert!((raw.weight(stat).unwrap() - raw.marginal_dps[&stat]).abs() < 1e-12);
        }

        let normalized = EpEstimator::default()
            .estimate(&mut calc, &cycle(), &snapshot())
            .unwrap();
        let ratio = raw.weight(Stat::Mastery).unwrap() / raw.weight(Stat::Agi).unwrap();
        assert!((normalized.weight(Stat::Mastery).unwrap() - ratio).abs() < 1e-9);

        // Nothing to divide by, so a damage-free cycle still reports zeros
        let empty = estimator.estimate(&mut calc, &FixedCycle::default(), &snapshot()).unwrap();
        assert!(empty.weights.values().all(|weight| *weight == 0.0));
    }
}
