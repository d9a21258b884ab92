//! Error types for damage model computations

use thiserror::Error;

/// Errors raised while decoding a build or computing a breakdown
///
/// Every variant is terminal for the computation that raised it. The model is
/// deterministic, so recovery means fixing the input and recomputing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Malformed talent encoding, out-of-range level, symbol or rank
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The frequency map or a caller asked for an ability with no registered formula
    #[error("Unknown ability: {0}")]
    UnknownAbility(String),
    /// A required stat (or crit rate) was absent from the input
    #[error("Missing stat: {0}")]
    MissingStat(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CalcError::UnknownAbility("hemorrhage".to_string());
        assert_eq!(err.to_string(), "Unknown ability: hemorrhage");

        let err = CalcError::MissingStat("mastery".to_string());
        assert!(err.to_string().contains("mastery"));
    }
}
