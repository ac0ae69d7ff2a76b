use thiserror::Error;

use crate::daily::DailyError;
use crate::engine::EngineError;
use crate::games::GameError;
use crate::model::{ExerciseDraftError, GameTaskDraftError, ProfileUpdateError, TokenError};

/// Any failure raised by the pure domain layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Daily(#[from] DailyError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Rejected user input for a backend write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error(transparent)]
    Exercise(#[from] ExerciseDraftError),
    #[error(transparent)]
    Task(#[from] GameTaskDraftError),
    #[error(transparent)]
    Profile(#[from] ProfileUpdateError),
}
