//! Calculator settings

use crate::types::Spec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub spec: Spec,
    /// Report dual-hand attacks as one entry instead of mh/oh pairs
    #[serde(default = "default_true")]
    pub merge_damage: bool,
    /// Breakdown key of the ability used to open from stealth
    #[serde(default)]
    pub opener_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_day: bool,
    /// Seconds; consumed by rotation models
    #[serde(default = "default_response_time")]
    pub response_time: f64,
    /// Seconds; consumed by rotation models
    #[serde(default = "default_latency")]
    pub latency: f64,
}

fn default_true() -> bool {
    true
}
fn default_response_time() -> f64 {
    0.5
}
fn default_latency() -> f64 {
    0.03
}

impl Settings {
    pub fn new(spec: Spec) -> Self {
        Settings {
            spec,
            merge_damage: true,
            opener_name: None,
            is_day: true,
            response_time: default_response_time(),
            latency: default_latency(),
        }
    }

    pub fn with_merge_damage(mut self, merge: bool) -> Self {
        self.merge_damage = merge;
        self
    }

    pub fn with_opener(mut self, opener: &str) -> Self {
        self.opener_name = Some(opener.to_string());
        self
    }

    pub fn with_time_of_day(mut self, is_day: bool) -> Self {
        self.is_day = is_day;
        self
    }

    pub fn is_assassination_rogue(&self) -> bool {
        self.spec == Spec::Assassination
    }

    pub fn is_combat_rogue(&self) -> bool {
        self.spec == Spec::Combat
    }

    pub fn is_subtlety_rogue(&self) -> bool {
        self.spec == Spec::Subtlety
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_toml() {
        let settings: Settings = toml::from_str(r#"spec = "subtlety""#).unwrap();
        assert!(settings.is_subtlety_rogue());
        assert!(settings.merge_damage);
        assert!(settings.is_day);
        assert_eq!(settings.opener_name, None);
        assert!((settings.latency - 0.03).abs() < f64::EPSILON);
    }

    #[test]
    fn test_builders() {
        let settings = Settings::new(Spec::Assassination)
            .with_merge_damage(false)
            .with_opener("envenom")
            .with_time_of_day(false);
        assert!(settings.is_assassination_rogue());
        assert!(!settings.is_combat_rogue());
        assert!(!settings.merge_damage);
        assert_eq!(settings.opener_name.as_deref(), Some("envenom"));
        assert!(!settings.is_day);
    }
}
