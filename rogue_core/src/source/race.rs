//! Race - racial crit by time of day

use crate::error::{CalcError, Result};
use crate::source::RaceProvider;

/// (race, crit by day, crit by night)
const RACES: &[(&str, f64, f64)] = &[
    ("human", 0.0, 0.0),
    ("dwarf", 0.0, 0.0),
    ("night_elf", 0.0, 0.01),
    ("gnome", 0.0, 0.0),
    ("draenei", 0.0, 0.0),
    ("worgen", 0.01, 0.01),
    ("pandaren", 0.0, 0.0),
    ("orc", 0.0, 0.0),
    ("undead", 0.0, 0.0),
    ("troll", 0.0, 0.0),
    ("blood_elf", 0.0, 0.0),
    ("goblin", 0.0, 0.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Race {
    pub name: String,
    crit_day: f64,
    crit_night: f64,
}

impl Race {
    pub fn new(name: &str) -> Result<Self> {
        RACES
            .iter()
            .find(|(race, _, _)| *race == name)
            .map(|&(race, crit_day, crit_night)| Race {
                name: race.to_string(),
                crit_day,
                crit_night,
            })
            .ok_or_else(|| CalcError::InvalidInput(format!("unknown race '{}'", name)))
    }
}

impl RaceProvider for Race {
    fn racial_crit(&self, is_day: bool) -> f64 {
        if is_day {
            self.crit_day
        } else {
            self.crit_night
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_elf_crit_at_night_only() {
        let race = Race::new("night_elf").unwrap();
        assert!(race.racial_crit(true).abs() < f64::EPSILON);
        assert!((race.racial_crit(false) - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_worgen_always() {
        let race = Race::new("worgen").unwrap();
        assert!((race.racial_crit(true) - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_race() {
        assert!(Race::new("murloc").is_err());
    }
}
