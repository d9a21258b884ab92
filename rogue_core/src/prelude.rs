//! Prelude module for convenient imports
//!
//! ```rust
//! use rogue_core::prelude::*;
//! ```

// Inputs
pub use crate::stats::{Stat, StatSnapshot, Weapon};
pub use crate::types::{DamageKind, Hand, Spec, WeaponKind};
pub use crate::settings::Settings;
pub use crate::talents::TalentConfiguration;

// Breakdown
pub use crate::breakdown::{
    AttackFrequencyMap, CharacterBuild, CritRateMap, DamageBreakdown, RogueCalculator,
};
pub use crate::procs::{DamageProc, ProcEffect};

// EP
pub use crate::ep::{CycleModel, EpEstimator, FixedCycle};

// Sources
pub use crate::source::{BreakdownSink, BuffsProvider, GearBonusProvider, RaceProvider, StatsProvider};

// Config
pub use crate::config::{BuildConfig, GameConstants};

pub use crate::error::{CalcError, Result};
