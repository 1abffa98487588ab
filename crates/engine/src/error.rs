use thiserror::Error;

use crate::config::ConfigError;
use crate::core::{GenerateError, GridError};
use crate::types::{CascadeState, Pos};

/// Errors surfaced by [`CascadeEngine`](crate::CascadeEngine) and
/// [`GameSession`](crate::GameSession).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Swap requested while a cascade is running. Rejected, not queued.
    #[error("swap rejected while engine is {state}")]
    InvalidSwap { state: CascadeState },

    #[error("cells {a} and {b} are not adjacent")]
    NotAdjacent { a: Pos, b: Pos },

    #[error("position {pos} is outside the board")]
    OutOfBounds { pos: Pos },

    /// Board reset requested outside `Idle`.
    #[error("engine is busy ({state})")]
    Busy { state: CascadeState },

    #[error("round is over")]
    GameOver,

    /// The grid refused a mutation the state machine believed valid.
    #[error("internal consistency failure: {0}")]
    Internal(GridError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<GridError> for EngineError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::OutOfBounds { pos, .. } => EngineError::OutOfBounds { pos },
            GridError::NotAdjacent { a, b } => EngineError::NotAdjacent { a, b },
            other => EngineError::Internal(other),
        }
    }
}
