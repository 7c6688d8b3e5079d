//! Error types for position setup and notation parsing.
//!
//! The search itself never fails; these errors only surface while building a
//! position to search.

use std::fmt;

/// Error type for position construction and move application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// FEN string could not be parsed
    InvalidFen { fen: String, reason: String },
    /// Move is well-formed but not legal in the current position
    IllegalMove { notation: String },
    /// Move string is not valid UCI notation
    InvalidMove { notation: String },
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::InvalidFen { fen, reason } => {
                write!(f, "Invalid FEN '{fen}': {reason}")
            }
            PositionError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
            PositionError::InvalidMove { notation } => {
                write!(f, "Invalid move notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for PositionError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Not a file letter a-h followed by a rank digit 1-8
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

impl From<SquareError> for PositionError {
    fn from(err: SquareError) -> Self {
        match err {
            SquareError::InvalidNotation { notation } => PositionError::InvalidMove { notation },
        }
    }
}
