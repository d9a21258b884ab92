//! Character build files
//!
//! A build file describes one character: level, race, talents, gear, buffs,
//! current stats and the rotation output to evaluate.

use super::{load_toml, parse_toml, ConfigError, GameConstants};
use crate::breakdown::{AttackFrequencyMap, CharacterBuild, CritRateMap, Frequency, RogueCalculator};
use crate::ep::{CycleInputs, FixedCycle};
use crate::procs::DamageProc;
use crate::settings::Settings;
use crate::source::{Buffs, CharacterStats, GearBuffs, OnUseItem, Race};
use crate::stats::{Stat, StatSnapshot, Weapon};
use crate::talents::TalentConfiguration;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_class")]
    pub class: String,
    pub level: u32,
    pub race: String,
    /// Talent encoding, one symbol per tier
    #[serde(default)]
    pub talents: String,
    pub settings: Settings,
    /// Stat name → value
    pub stats: BTreeMap<String, f64>,
    pub main_hand: Weapon,
    pub off_hand: Weapon,
    #[serde(default)]
    pub buffs: Vec<String>,
    #[serde(default)]
    pub gear_buffs: Vec<String>,
    #[serde(default)]
    pub on_use: Vec<OnUseItem>,
    #[serde(default)]
    pub procs: Vec<DamageProc>,
    /// Armor of the target; the level's boss armor when omitted
    #[serde(default)]
    pub target_armor: Option<f64>,
    #[serde(default)]
    pub cycle: CycleConfig,
}

fn default_class() -> String {
    "rogue".to_string()
}

/// Rotation output: frequencies per second and crit rates
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CycleConfig {
    #[serde(default)]
    pub frequencies: BTreeMap<String, f64>,
    /// Finishers, per combo point rank 1 through 5
    #[serde(default)]
    pub ranked_frequencies: BTreeMap<String, [f64; 5]>,
    #[serde(default)]
    pub crit_rates: BTreeMap<String, f64>,
    #[serde(default)]
    pub openers_per_second: f64,
    /// Derive every crit rate from the crit rating for EP
    #[serde(default)]
    pub crit_from_rating: bool,
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let build: BuildConfig = load_toml(path)?;
        build.validate()?;
        Ok(build)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let build: BuildConfig = parse_toml(content)?;
        build.validate()?;
        Ok(build)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, frequency) in self
            .cycle
            .frequencies
            .iter()
            .chain(self.cycle.ranked_frequencies.iter().flat_map(|(name, per_rank)| {
                per_rank.iter().map(move |frequency| (name, frequency))
            }))
        {
            if *frequency < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "frequency for '{}' is negative",
                    name
                )));
            }
        }
        if let Some(name) = self
            .cycle
            .frequencies
            .keys()
            .find(|name| self.cycle.ranked_frequencies.contains_key(*name))
        {
            return Err(ConfigError::ValidationError(format!(
                "'{}' is listed as both flat and ranked",
                name
            )));
        }
        if let Some((name, _)) = self.stats.iter().find(|(_, value)| **value < 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "stat '{}' is negative",
                name
            )));
        }
        Ok(())
    }

    pub fn stat_snapshot(&self) -> Result<StatSnapshot, ConfigError> {
        let mut snapshot = StatSnapshot::new();
        for (name, value) in &self.stats {
            let stat: Stat = name.parse()?;
            snapshot.set(stat, *value);
        }
        Ok(snapshot)
    }

    pub fn cycle_inputs(&self) -> CycleInputs {
        let flat = self
            .cycle
            .frequencies
            .iter()
            .map(|(name, value)| (name.clone(), Frequency::Flat(*value)));
        let ranked = self
            .cycle
            .ranked_frequencies
            .iter()
            .map(|(name, per_rank)| (name.clone(), Frequency::Ranked(*per_rank)));

        let mut frequencies: AttackFrequencyMap = flat.chain(ranked).collect();
        frequencies.openers_per_second = self.cycle.openers_per_second;

        let crit_rates: CritRateMap = self
            .cycle
            .crit_rates
            .iter()
            .map(|(name, rate)| (name.clone(), *rate))
            .collect();

        CycleInputs {
            frequencies,
            crit_rates,
            procs: self.procs.clone(),
        }
    }

    pub fn fixed_cycle(&self) -> FixedCycle {
        let cycle = FixedCycle::new(self.cycle_inputs());
        if self.cycle.crit_from_rating {
            cycle.with_rating_crit()
        } else {
            cycle
        }
    }

    /// Assemble a calculator for this build
    pub fn calculator(&self, constants: GameConstants) -> Result<RogueCalculator, ConfigError> {
        let stats = CharacterStats::new(
            self.main_hand.clone(),
            self.off_hand.clone(),
            &constants,
            self.level,
        )?;
        let gear = GearBuffs::new(&self.gear_buffs)?.with_on_use(self.on_use.clone())?;
        let build = CharacterBuild {
            stats: Box::new(stats),
            talents: TalentConfiguration::decode(&self.talents, &self.class, self.level)?,
            buffs: Box::new(Buffs::new(&self.buffs)?),
            race: Box::new(Race::new(&self.race)?),
            gear: Box::new(gear),
            settings: self.settings.clone(),
        };

        let calculator = RogueCalculator::new(build, constants, self.level)?;
        Ok(match self.target_armor {
            Some(armor) => calculator.with_target_armor(armor),
            None => calculator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcError;
    use crate::types::{Spec, WeaponKind};

    const BUILD: &str = r#"
level = 100
race = "night_elf"
talents = "2000012"
buffs = ["attack_power_buff", "crit_chance_buff"]
gear_buffs = ["chaotic_metagem"]

[settings]
spec = "assassination"
opener_name = "mutilate"

[stats]
agi = 3500
ap = 0
str = 80
mastery = 1200
multistrike = 600

[main_hand]
damage = 1250.5
speed = 1.8
type = "dagger"

[off_hand]
damage = 1250.5
speed = 1.8
type = "dagger"

[[procs]]
name = "mark_of_the_frostwolf"
type = "physical"
ap_coefficient = 0.5

[cycle]
openers_per_second = 0.01

[cycle.frequencies]
mutilate = 0.3
deadly_poison = 0.5

[cycle.ranked_frequencies]
envenom = [0, 0, 0, 0.02, 0.15]

[cycle.crit_rates]
mutilate = 0.3
deadly_poison = 0.25
envenom = 0.3
"#;

    #[test]
    fn test_parse_build() {
        let build = BuildConfig::parse(BUILD).unwrap();
        assert_eq!(build.class, "rogue");
        assert_eq!(build.settings.spec, Spec::Assassination);
        assert_eq!(build.main_hand.kind, WeaponKind::Dagger);
        assert_eq!(build.procs.len(), 1);

        let stats = build.stat_snapshot().unwrap();
        assert_eq!(stats.get(Stat::Agi), Some(3500.0));

        let inputs = build.cycle_inputs();
        assert_eq!(inputs.frequencies.len(), 3);
        assert!((inputs.frequencies.openers_per_second - 0.01).abs() < f64::EPSILON);
        assert_eq!(
            inputs.frequencies.get("envenom"),
            Some(&Frequency::Ranked([0.0, 0.0, 0.0, 0.02, 0.15]))
        );
    }

    #[test]
    fn test_build_calculator() {
        let build = BuildConfig::parse(BUILD).unwrap();
        let mut calc = build.calculator(GameConstants::default()).unwrap();
        assert_eq!(calc.level(), 100);
        assert!(calc.talents().is_active("subterfuge"));

        let inputs = build.cycle_inputs();
        let breakdown = calc
            .compute_breakdown(
                &build.stat_snapshot().unwrap(),
                &inputs.frequencies,
                &inputs.crit_rates,
                &inputs.procs,
            )
            .unwrap();
        assert!(breakdown.get("mutilate").unwrap() > 0.0);
        assert!(breakdown.get("envenom").unwrap() > 0.0);
        assert!(breakdown.get("deadly_poison").unwrap() > 0.0);
        // No frequency entry for the enchant proc
        assert!(!breakdown.contains("mark_of_the_frostwolf"));
    }

    #[test]
    fn test_bad_builds() {
        let unknown_stat = BUILD.replace("str = 80", "spirit = 80");
        let build = BuildConfig::parse(&unknown_stat).unwrap();
        assert!(matches!(
            build.stat_snapshot(),
            Err(ConfigError::Build(CalcError::InvalidInput(_)))
        ));

        let bad_talents = BUILD.replace("2000012", "2000019");
        let build = BuildConfig::parse(&bad_talents).unwrap();
        assert!(matches!(
            build.calculator(GameConstants::default()),
            Err(ConfigError::Build(CalcError::InvalidInput(_)))
        ));

        let negative = BUILD.replace("mutilate = 0.3\n", "mutilate = -0.3\n");
        assert!(matches!(
            BuildConfig::parse(&negative),
            Err(ConfigError::ValidationError(_))
        ));

        let missing_race = BUILD.replace("race = \"night_elf\"\n", "");
        assert!(matches!(
            BuildConfig::parse(&missing_race),
            Err(ConfigError::ParseError(_))
        ));
    }
}
