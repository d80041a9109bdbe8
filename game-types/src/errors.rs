use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Every way a guess or lifecycle operation can be refused.
///
/// None of these are fatal: the session is left exactly as it was and the
/// active player may try again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    #[error("Please enter a word")]
    EmptyGuess,
    #[error("'{word}' has already been guessed")]
    DuplicateGuess { word: String },
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Game is already over")]
    GameAlreadyOver,
    #[error("'{word}' is not a known word")]
    UnknownWord { word: String },
    #[error("Oracle request failed: {message}")]
    Transport { message: String },
    #[error("This action needs confirmation")]
    ConfirmationRequired,
    #[error("No game has been started")]
    NoActiveSession,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::EmptyGuess => ErrorKind::EmptyGuess,
            GameError::DuplicateGuess { .. } => ErrorKind::DuplicateGuess,
            GameError::NotYourTurn => ErrorKind::NotYourTurn,
            GameError::GameAlreadyOver => ErrorKind::GameAlreadyOver,
            GameError::UnknownWord { .. } => ErrorKind::UnknownWord,
            GameError::Transport { .. } => ErrorKind::Transport,
            GameError::ConfirmationRequired => ErrorKind::ConfirmationRequired,
            GameError::NoActiveSession => ErrorKind::NoActiveSession,
        }
    }

    /// Errors raised before the oracle is ever contacted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            GameError::EmptyGuess
                | GameError::DuplicateGuess { .. }
                | GameError::NotYourTurn
                | GameError::GameAlreadyOver
                | GameError::ConfirmationRequired
                | GameError::NoActiveSession
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ErrorKind {
    EmptyGuess,
    DuplicateGuess,
    NotYourTurn,
    GameAlreadyOver,
    UnknownWord,
    Transport,
    ConfirmationRequired,
    NoActiveSession,
}
