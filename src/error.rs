//! Crate error types.
//!
//! Only the edges of the game return errors: loading tuning files and talking
//! to the best-score store. The simulation itself treats every odd situation
//! as a policy decision and never fails.

use std::fmt;

/// Top-level error enum for Bottle Climb.
#[derive(Debug)]
pub enum GameError {
    /// Reading or writing a file failed.
    Io(std::io::Error),

    /// A JSON document (tuning or score store) could not be parsed or written.
    Parse(serde_json::Error),

    /// A tuning value is outside the range the simulation can work with.
    InvalidTuning {
        /// Name of the tuning field.
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Io(err) => write!(f, "i/o error: {}", err),
            GameError::Parse(err) => write!(f, "json error: {}", err),
            GameError::InvalidTuning {
                name,
                value,
                expected,
            } => write!(
                f,
                "tuning value '{}' = {} is outside accepted range {}",
                name, value, expected
            ),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io(err) => Some(err),
            GameError::Parse(err) => Some(err),
            GameError::InvalidTuning { .. } => None,
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        GameError::Io(err)
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Parse(err)
    }
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_tuning_message_names_field() {
        let err = GameError::InvalidTuning {
            name: "safe_gap",
            value: -1.0,
            expected: "[0, ∞)",
        };
        let msg = err.to_string();
        assert!(msg.contains("safe_gap"));
        assert!(msg.contains("-1"));
    }

    #[test]
    fn test_parse_error_converts() {
        let parse = serde_json::from_str::<u64>("not a number").unwrap_err();
        let err: GameError = parse.into();
        assert!(matches!(err, GameError::Parse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
