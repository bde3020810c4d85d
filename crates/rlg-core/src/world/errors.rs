//! Error types for generation, population, configuration and loading

use thiserror::Error;

use crate::dungeon::Position;

/// Dungeon generation failures
///
/// Always fatal to the generation call; no partial dungeon is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("dungeon generation gave up after {attempts} attempts")]
    AttemptsExhausted { attempts: usize },

    #[error("no corridor route from {from} to {to}")]
    Unreachable { from: Position, to: Position },

    #[error("invalid generation parameters: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Actor population failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("no free cell for monster {placed} after {attempts} attempts")]
    Exhausted { attempts: usize, placed: usize },

    #[error("level has no rooms to place actors in")]
    NoRooms,
}

/// Persisted layout failures
///
/// Raised before any level is built, so a failed load never leaves a
/// half-populated grid behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveFormatError {
    #[error("record truncated: needed {needed} bytes, found {len}")]
    Truncated { needed: usize, len: usize },

    #[error("bad format tag")]
    BadTag,

    #[error("unsupported format version {found}")]
    UnsupportedVersion { found: u32 },

    #[error("declared size {declared} does not match record length {actual}")]
    SizeMismatch { declared: u32, actual: usize },

    #[error("{what} count {count} overflows the record")]
    CountOverflow { what: &'static str, count: usize },

    #[error("{what} at ({x}, {y}) lies outside the grid interior")]
    OutOfBounds { what: &'static str, x: usize, y: usize },

    #[error("level cannot be encoded: {reason}")]
    Unencodable { reason: String },
}

/// Configuration validation and parsing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("could not read config: {0}")]
    Io(String),

    #[error("could not parse config: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_mentions_budget() {
        let err = GenerationError::AttemptsExhausted { attempts: 100 };
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: GenerationError = ConfigError::invalid("min_rooms", "must be positive").into();
        assert_eq!(
            err.to_string(),
            "invalid generation parameters: min_rooms: must be positive"
        );
    }
}
