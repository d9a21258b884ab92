//! Configuration loading from TOML files

mod build;
mod constants;

pub use build::{BuildConfig, CycleConfig};
pub use constants::{
    CritConstants, GameConstants, LevelConstants, MeleeConstants, RatingConversions, SpecConstants,
    SpecProfile,
};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
    #[error("Invalid build: {0}")]
    Build(#[from] crate::error::CalcError),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load model constants, falling back to defaults for anything omitted
pub fn load_constants(path: &Path) -> Result<GameConstants, ConfigError> {
    let constants: GameConstants = load_toml(path)?;
    validate_constants(&constants)?;
    Ok(constants)
}

fn validate_constants(constants: &GameConstants) -> Result<(), ConfigError> {
    if constants.levels.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one [[levels]] table is required".to_string(),
        ));
    }
    for entry in &constants.levels {
        let ratings = &entry.ratings;
        let all_positive = [
            ratings.crit,
            ratings.haste,
            ratings.mastery,
            ratings.multistrike,
            ratings.readiness,
            ratings.versatility,
        ]
        .iter()
        .all(|&r| r > 0.0);
        if !all_positive || entry.armor_constant <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "level {} conversions must be positive",
                entry.level
            )));
        }
    }
    Ok(())
}
