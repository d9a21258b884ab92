//! RogueCalculator - turns a rotation's frequencies into per-ability DPS

use super::inputs::{AttackFrequencyMap, CritRateMap, Frequency};
use super::result::{expected_value, DamageBreakdown};
use crate::ability::{base_cooldown, readiness_affected, Ability};
use crate::config::{GameConstants, LevelConstants, SpecProfile};
use crate::error::{CalcError, Result};
use crate::formula::{FormulaRegistry, WeaponContext, MAX_RANK, MIN_RANK};
use crate::modifiers::{ModifierCache, ModifierPair, RaidContext};
use crate::procs::{DamageProc, ProcEffect};
use crate::settings::Settings;
use crate::source::{BreakdownSink, BuffsProvider, GearBonusProvider, RaceProvider, StatsProvider};
use crate::stats::{Stat, StatSnapshot};
use crate::talents::{TalentConfiguration, MAX_LEVEL};
use crate::types::{DamageKind, Hand};
use tracing::{debug, trace};

/// Weapon strikes using the physical modifier, in evaluation order
const STRIKES: &[Ability] = &[
    Ability::Hemorrhage,
    Ability::Backstab,
    Ability::SinisterStrike,
    Ability::RevealingStrike,
    Ability::MainGauche,
    Ability::Ambush,
    Ability::Dispatch,
    Ability::ShurikenToss,
    Ability::FanOfKnives,
    Ability::Shiv,
    Ability::Throw,
];

/// Poison and poison-like damage using the spell modifier
const POISONS: &[Ability] = &[
    Ability::VenomousWounds,
    Ability::DeadlyPoison,
    Ability::WoundPoison,
    Ability::DeadlyInstantPoison,
    Ability::InstantPoison,
];

/// Everything a character build contributes to the calculator
pub struct CharacterBuild {
    pub stats: Box<dyn StatsProvider>,
    pub talents: TalentConfiguration,
    pub buffs: Box<dyn BuffsProvider>,
    pub race: Box<dyn RaceProvider>,
    pub gear: Box<dyn GearBonusProvider>,
    pub settings: Settings,
}

#[derive(Debug, Clone, Copy)]
struct Modifiers {
    physical: ModifierPair,
    spell: ModifierPair,
    bleed: ModifierPair,
    executioner: f64,
    potent_poisons: f64,
}

/// Per-call state shared by the breakdown steps
#[derive(Clone, Copy)]
struct Pass<'a> {
    weapons: WeaponContext<'a>,
    ap: f64,
    frequencies: &'a AttackFrequencyMap,
    crit_rates: &'a CritRateMap,
    mods: Modifiers,
}

/// Damage model for one rogue at one level
pub struct RogueCalculator {
    stats: Box<dyn StatsProvider>,
    talents: TalentConfiguration,
    buffs: Box<dyn BuffsProvider>,
    race: Box<dyn RaceProvider>,
    gear: Box<dyn GearBonusProvider>,
    settings: Settings,
    constants: GameConstants,
    level: u32,
    level_constants: LevelConstants,
    registry: FormulaRegistry,
    cache: ModifierCache,
    target_armor: Option<f64>,
    sink: Option<Box<dyn BreakdownSink>>,
}

impl RogueCalculator {
    pub fn new(build: CharacterBuild, constants: GameConstants, level: u32) -> Result<Self> {
        let level_constants = constants.for_level(level)?.clone();
        let damage_modifier = constants.spec(build.settings.spec).damage_modifier;
        let mut calculator = RogueCalculator {
            stats: build.stats,
            talents: build.talents,
            buffs: build.buffs,
            race: build.race,
            gear: build.gear,
            settings: build.settings,
            constants,
            level,
            level_constants,
            registry: FormulaRegistry::rogue(),
            cache: ModifierCache::new(damage_modifier),
            target_armor: None,
            sink: None,
        };
        calculator.set_level(level)?;
        Ok(calculator)
    }

    pub fn with_registry(mut self, registry: FormulaRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn BreakdownSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Target armor instead of the level's boss armor
    pub fn with_target_armor(mut self, armor: f64) -> Self {
        self.target_armor = Some(armor);
        self.cache.clear(self.spec_profile().damage_modifier);
        self
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn talents(&self) -> &TalentConfiguration {
        &self.talents
    }

    /// Mutable talents for build-search sweeps
    pub fn talents_mut(&mut self) -> &mut TalentConfiguration {
        &mut self.talents
    }

    pub fn registry(&self) -> &FormulaRegistry {
        &self.registry
    }

    pub fn level_constants(&self) -> &LevelConstants {
        &self.level_constants
    }

    pub fn modifier_cache(&self) -> &ModifierCache {
        &self.cache
    }

    /// Move to another level
    ///
    /// Level-dependent constants, the stats provider's tables and the talent
    /// gating all follow, and the modifier cache is emptied.
    pub fn set_level(&mut self, level: u32) -> Result<()> {
        if level == 0 || level > MAX_LEVEL {
            return Err(CalcError::InvalidInput(format!(
                "level {} outside 1..={}",
                level, MAX_LEVEL
            )));
        }
        self.level_constants = self.constants.for_level(level)?.clone();
        self.stats.set_level(level)?;
        self.talents.set_level(level)?;
        self.level = level;
        self.cache.clear(self.spec_profile().damage_modifier);
        debug!(level, "calculator level set");
        Ok(())
    }

    fn spec_profile(&self) -> &SpecProfile {
        self.constants.spec(self.settings.spec)
    }

    pub fn off_hand_penalty(&self) -> f64 {
        if self.settings.is_combat_rogue() {
            self.constants.melee.combat_off_hand_penalty
        } else {
            self.constants.melee.off_hand_penalty
        }
    }

    pub fn weapon_context(&self) -> WeaponContext<'_> {
        WeaponContext::new(
            self.stats.weapon(Hand::MainHand),
            self.stats.weapon(Hand::OffHand),
            self.off_hand_penalty(),
        )
    }

    /// Modifier pair for a damage type, memoized per level
    pub fn modifiers(&mut self, kind: DamageKind, executioner: f64, potent_poisons: f64) -> ModifierPair {
        let ctx = RaidContext {
            buffs: self.buffs.as_ref(),
            gear: self.gear.as_ref(),
            level: &self.level_constants,
            base_crit_multiplier: self.constants.crit.base_multiplier,
        };
        self.cache
            .modifiers(kind, self.target_armor, executioner, potent_poisons, &ctx)
    }

    /// Melee crit chance for a crit rating
    pub fn melee_crit_rate(&self, crit_rating: f64) -> f64 {
        self.crit_rate(crit_rating) - self.level_constants.melee_crit_suppression
    }

    /// Spell crit chance for a crit rating
    pub fn spell_crit_rate(&self, crit_rating: f64) -> f64 {
        self.crit_rate(crit_rating) - self.level_constants.spell_crit_suppression
    }

    fn crit_rate(&self, crit_rating: f64) -> f64 {
        self.constants.crit.base_chance
            + self.stats.crit_from_rating(crit_rating)
            + self.buffs.crit_chance_bonus()
            + self.race.racial_crit(self.settings.is_day)
    }

    /// Cooldown of an ability after readiness
    pub fn spell_cooldown(&self, name: &str, readiness_rating: f64) -> Result<f64> {
        let cooldown = base_cooldown(name)?;
        if readiness_affected(self.settings.spec).iter().any(|&n| n == name) {
            let conversion = self.spec_profile().readiness_conversion;
            Ok(cooldown
                * self
                    .stats
                    .readiness_multiplier_from_rating(readiness_rating, conversion))
        } else {
            Ok(cooldown)
        }
    }

    /// Sum of a freshly computed breakdown
    pub fn total_dps(
        &mut self,
        stats: &StatSnapshot,
        frequencies: &AttackFrequencyMap,
        crit_rates: &CritRateMap,
        procs: &[DamageProc],
    ) -> Result<f64> {
        Ok(self
            .compute_breakdown(stats, frequencies, crit_rates, procs)?
            .total())
    }

    /// Per-ability DPS for one set of stats and one rotation
    pub fn compute_breakdown(
        &mut self,
        stats: &StatSnapshot,
        frequencies: &AttackFrequencyMap,
        crit_rates: &CritRateMap,
        procs: &[DamageProc],
    ) -> Result<DamageBreakdown> {
        // Step 1: Average attack power
        let mut average_ap = (stats.require(Stat::Ap)?
            + stats.require(Stat::Agi)?
            + stats.require(Stat::Str)?)
            * self.buffs.attack_power_multiplier();
        if self.settings.is_combat_rogue() {
            average_ap *= self.constants.melee.combat_ap_bonus;
        }
        let mastery = stats.require(Stat::Mastery)?;
        let multistrike = stats.require(Stat::Multistrike)?;

        // Step 2: Mastery multipliers, computed once per call
        let mastery_points = self.stats.mastery_from_rating(mastery);
        let conversion = self.spec_profile().mastery_conversion;
        let executioner = if self.settings.is_subtlety_rogue() {
            1.0 + conversion * mastery_points
        } else {
            1.0
        };
        let potent_poisons = if self.settings.is_assassination_rogue() {
            1.0 + conversion * mastery_points
        } else {
            1.0
        };

        // Step 3: Modifier pairs
        let mods = Modifiers {
            physical: self.modifiers(DamageKind::Physical, 1.0, 1.0),
            spell: self.modifiers(DamageKind::Spell, 1.0, 1.0),
            bleed: self.modifiers(DamageKind::Bleed, 1.0, 1.0),
            executioner,
            potent_poisons,
        };

        let mut breakdown = DamageBreakdown::new();
        let pass = Pass {
            weapons: self.weapon_context(),
            ap: average_ap,
            frequencies,
            crit_rates,
            mods,
        };

        // Step 4: White swings, before zero entries are dropped
        self.add_autoattacks(&pass, &mut breakdown)?;

        // Step 5: Drop zero-frequency entries
        let trimmed = frequencies.without_zero_entries();
        self.check_frequency_keys(&trimmed, procs)?;
        let pass = Pass {
            frequencies: &trimmed,
            ..pass
        };

        // Step 6: Abilities
        self.add_dual_hand(&pass, &mut breakdown)?;
        self.add_strikes(&pass, &mut breakdown)?;
        self.add_poisons(&pass, &mut breakdown)?;
        self.add_ticks(&pass, &mut breakdown)?;
        self.add_finishers(&pass, &mut breakdown)?;

        // Step 7: Procs, then on-use items
        for proc in procs {
            if breakdown.contains(&proc.name) {
                continue;
            }
            if let Some(frequency) = trimmed.get(&proc.name) {
                let dps = self.proc_dps(&pass, proc, frequency.total(), &breakdown)?;
                breakdown.insert(&proc.name, dps);
            }
        }
        for (name, dps) in self.gear.on_use_damage(average_ap, stats) {
            breakdown.add(&name, dps);
        }

        // Step 8: Opener bonus
        if self.talents.is_active("nightstalker") {
            self.apply_nightstalker(&trimmed, &mut breakdown)?;
        }

        // Step 9: Multistrike is a flat share of every entry
        let multistrike_chance = self.stats.multistrike_from_rating(multistrike);
        breakdown.scale_all(1.0 + self.constants.melee.multistrike_damage * multistrike_chance);

        for (name, dps) in breakdown.iter() {
            trace!(entry = name, dps, "breakdown entry");
        }
        debug!(
            total = breakdown.total(),
            entries = breakdown.len(),
            "computed damage breakdown"
        );

        if let Some(sink) = self.sink.as_mut() {
            sink.export(&breakdown);
        }
        Ok(breakdown)
    }

    /// Every frequency key must be an ability the engine handles or a proc
    fn check_frequency_keys(&self, frequencies: &AttackFrequencyMap, procs: &[DamageProc]) -> Result<()> {
        for key in frequencies.keys() {
            let is_proc = procs.iter().any(|proc| proc.name == key);
            let known = match Ability::from_name(key) {
                Some(ability) if ability.is_frequency_key() => {
                    ability == Ability::Mutilate || self.registry.contains(ability)
                }
                _ => false,
            };
            if !known && !is_proc {
                return Err(CalcError::UnknownAbility(key.to_string()));
            }
        }
        Ok(())
    }

    fn add_hand_pair(&self, breakdown: &mut DamageBreakdown, name: &str, main_hand: f64, off_hand: f64) {
        if self.settings.merge_damage {
            breakdown.insert(name, main_hand + off_hand);
        } else {
            breakdown.insert(&format!("mh_{}", name), main_hand);
            breakdown.insert(&format!("oh_{}", name), off_hand);
        }
    }

    fn add_autoattacks(&self, pass: &Pass<'_>, breakdown: &mut DamageBreakdown) -> Result<()> {
        if !pass.frequencies.contains(Ability::MhAutoattacks.name()) {
            return reject_orphan_off_hand(pass.frequencies, Ability::OhAutoattacks, Ability::MhAutoattacks);
        }
        let hit_chance = 1.0 - self.constants.melee.dual_wield_miss_chance;
        let physical = pass.mods.physical;

        let mut per_hand = [0.0; 2];
        for (slot, ability) in [Ability::MhAutoattacks, Ability::OhAutoattacks]
            .into_iter()
            .enumerate()
        {
            let frequency = pass.frequencies.flat_or_zero(ability.name())?;
            let crit_rate = pass.crit_rates.rate(ability.name())?;
            let base = self.registry.damage(ability, &pass.weapons, pass.ap)? * physical.damage;
            let hit_rate = (hit_chance - crit_rate).max(0.0);
            per_hand[slot] = (hit_rate * base + crit_rate * base * physical.crit) * frequency;
        }
        self.add_hand_pair(breakdown, "autoattack", per_hand[0], per_hand[1]);
        Ok(())
    }

    /// Mutilate and killing spree hit with both hands
    fn add_dual_hand(&self, pass: &Pass<'_>, breakdown: &mut DamageBreakdown) -> Result<()> {
        let physical = pass.mods.physical;

        if pass.frequencies.contains(Ability::Mutilate.name()) {
            let frequency = pass.frequencies.flat(Ability::Mutilate.name())?;
            let crit_rate = pass.crit_rates.rate(Ability::Mutilate.name())?;
            let mh = self.registry.damage(Ability::MhMutilate, &pass.weapons, pass.ap)? * physical.damage;
            let oh = self.registry.damage(Ability::OhMutilate, &pass.weapons, pass.ap)? * physical.damage;
            self.add_hand_pair(
                breakdown,
                "mutilate",
                expected_value(mh, crit_rate, frequency, physical.crit),
                expected_value(oh, crit_rate, frequency, physical.crit),
            );
        }

        if pass.frequencies.contains(Ability::MhKillingSpree.name()) {
            let mh_frequency = pass.frequencies.flat(Ability::MhKillingSpree.name())?;
            let oh_frequency = pass.frequencies.flat_or_zero(Ability::OhKillingSpree.name())?;
            let crit_rate = pass.crit_rates.rate("killing_spree")?;
            let mh = self.registry.damage(Ability::MhKillingSpree, &pass.weapons, pass.ap)?
                * physical.damage;
            let oh = self.registry.damage(Ability::OhKillingSpree, &pass.weapons, pass.ap)?
                * physical.damage;
            self.add_hand_pair(
                breakdown,
                "killing_spree",
                expected_value(mh, crit_rate, mh_frequency, physical.crit),
                expected_value(oh, crit_rate, oh_frequency, physical.crit),
            );
        } else {
            reject_orphan_off_hand(pass.frequencies, Ability::OhKillingSpree, Ability::MhKillingSpree)?;
        }
        Ok(())
    }

    fn add_strikes(&self, pass: &Pass<'_>, breakdown: &mut DamageBreakdown) -> Result<()> {
        let physical = pass.mods.physical;
        for &ability in STRIKES {
            if !pass.frequencies.contains(ability.name()) {
                continue;
            }
            let base = self.registry.damage(ability, &pass.weapons, pass.ap)? * physical.damage;
            let dps = expected_value(
                base,
                pass.crit_rates.rate(ability.name())?,
                pass.frequencies.flat(ability.name())?,
                physical.crit,
            ) * self.gear.set_bonus_multiplier(ability);
            breakdown.insert(ability.name(), dps);
        }
        Ok(())
    }

    fn add_poisons(&self, pass: &Pass<'_>, breakdown: &mut DamageBreakdown) -> Result<()> {
        let spell = pass.mods.spell;
        for &ability in POISONS {
            if !pass.frequencies.contains(ability.name()) {
                continue;
            }
            let base = self.registry.damage(ability, &pass.weapons, pass.ap)?
                * spell.damage
                * pass.mods.potent_poisons;
            let dps = expected_value(
                base,
                pass.crit_rates.rate(ability.name())?,
                pass.frequencies.flat(ability.name())?,
                spell.crit,
            ) * self.gear.set_bonus_multiplier(ability);
            breakdown.insert(ability.name(), dps);
        }
        Ok(())
    }

    fn add_ticks(&self, pass: &Pass<'_>, breakdown: &mut DamageBreakdown) -> Result<()> {
        let bleed = pass.mods.bleed;

        if pass.frequencies.contains(Ability::GarroteTicks.name()) {
            let base = self.registry.damage(Ability::GarroteTicks, &pass.weapons, pass.ap)? * bleed.damage;
            let dps = expected_value(
                base,
                pass.crit_rates.rate("garrote")?,
                pass.frequencies.flat(Ability::GarroteTicks.name())?,
                pass.mods.physical.crit,
            );
            breakdown.insert("garrote", dps);
        }

        // Hemorrhage ticks snapshot whether the applying strike crit
        if pass.frequencies.contains(Ability::HemorrhageTicks.name()) {
            let tick = self.registry.damage(Ability::HemorrhageTicks, &pass.weapons, pass.ap)? * bleed.damage;
            let crit_rate = pass.crit_rates.rate(Ability::Hemorrhage.name())?;
            let frequency = pass.frequencies.flat(Ability::HemorrhageTicks.name())?;
            let from_hits = expected_value(tick, crit_rate, frequency * (1.0 - crit_rate), bleed.crit);
            let from_crits = expected_value(tick * bleed.crit, crit_rate, frequency * crit_rate, bleed.crit);
            breakdown.insert("hemorrhage_dot", from_hits + from_crits);
        }
        Ok(())
    }

    fn add_finishers(&self, pass: &Pass<'_>, breakdown: &mut DamageBreakdown) -> Result<()> {
        let Modifiers {
            physical,
            spell,
            bleed,
            executioner,
            potent_poisons,
        } = pass.mods;

        // (ability, breakdown key, crit key, damage modifier, crit multiplier)
        let finishers = [
            (
                Ability::RuptureTicks,
                "rupture",
                "rupture_ticks",
                bleed.damage * executioner,
                physical.crit,
            ),
            (
                Ability::Envenom,
                "envenom",
                "envenom",
                spell.damage * potent_poisons,
                spell.crit,
            ),
            (
                Ability::Eviscerate,
                "eviscerate",
                "eviscerate",
                physical.damage * executioner,
                physical.crit,
            ),
            (
                Ability::CrimsonTempest,
                "crimson_tempest",
                "crimson_tempest",
                physical.damage,
                physical.crit,
            ),
            (
                Ability::CrimsonTempestTicks,
                "crimson_tempest_dot",
                "crimson_tempest_ticks",
                bleed.damage * executioner,
                physical.crit,
            ),
        ];

        for (ability, key, crit_key, modifier, crit_multiplier) in finishers {
            if !pass.frequencies.contains(ability.name()) {
                continue;
            }
            let per_rank = pass.frequencies.ranked(ability.name())?;
            let crit_rate = pass.crit_rates.rate(crit_key)?;
            let mut dps = 0.0;
            for (rank, frequency) in (MIN_RANK..=MAX_RANK).zip(per_rank) {
                let base = self.registry.ranked_damage(ability, &pass.weapons, pass.ap, rank)? * modifier;
                dps += expected_value(base, crit_rate, frequency, crit_multiplier);
            }
            breakdown.insert(key, dps);
        }
        Ok(())
    }

    fn proc_dps(
        &self,
        pass: &Pass<'_>,
        proc: &DamageProc,
        frequency: f64,
        breakdown: &DamageBreakdown,
    ) -> Result<f64> {
        let crit_rate = pass.crit_rates.get(&proc.name)?.unwrap_or(0.0);
        let dps = match &proc.effect {
            ProcEffect::Spell {
                damage,
                ap_coefficient,
            } => {
                let base = (damage + ap_coefficient * pass.ap) * pass.mods.spell.damage;
                expected_value(base, crit_rate, frequency, pass.mods.spell.crit)
            }
            ProcEffect::Physical {
                damage,
                ap_coefficient,
            } => {
                let base = (damage + ap_coefficient * pass.ap) * pass.mods.physical.damage;
                expected_value(base, crit_rate, frequency, pass.mods.physical.crit)
            }
            ProcEffect::WeaponStrike { hand, coefficient } => {
                let mut weapon_damage = self.stats.weapon_damage(*hand, pass.ap, true);
                if *hand == Hand::OffHand {
                    weapon_damage *= pass.weapons.off_hand_penalty;
                }
                let base = coefficient * weapon_damage * pass.mods.physical.damage;
                expected_value(base, crit_rate, frequency, pass.mods.physical.crit)
            }
            ProcEffect::Echo { source, fraction } => {
                fraction * breakdown.get(source).unwrap_or(0.0)
            }
        };
        Ok(dps)
    }

    fn apply_nightstalker(&self, frequencies: &AttackFrequencyMap, breakdown: &mut DamageBreakdown) -> Result<()> {
        let opener = match self.settings.opener_name.as_deref() {
            Some(opener) => opener,
            None => return Ok(()),
        };
        let opener_frequency = match frequencies.get(opener) {
            Some(Frequency::Ranked(per_rank)) => per_rank[usize::from(MAX_RANK - 1)],
            Some(Frequency::Flat(per_second)) => *per_second,
            None => 0.0,
        };
        if opener_frequency <= 0.0 {
            return Err(CalcError::InvalidInput(format!(
                "opener '{}' has no frequency to spread nightstalker over",
                opener
            )));
        }
        let modifier = 1.0
            + self.constants.melee.nightstalker_bonus * (frequencies.openers_per_second / opener_frequency);
        if !breakdown.scale(opener, modifier) {
            return Err(CalcError::InvalidInput(format!(
                "opener '{}' is not a breakdown entry",
                opener
            )));
        }
        Ok(())
    }
}

/// An off-hand frequency only counts alongside its main-hand key
fn reject_orphan_off_hand(frequencies: &AttackFrequencyMap, off_hand: Ability, main_hand: Ability) -> Result<()> {
    if frequencies.flat_or_zero(off_hand.name())? > 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "'{}' has a frequency but '{}' does not",
            off_hand.name(),
            main_hand.name()
        )));
    }
    Ok(())
}
