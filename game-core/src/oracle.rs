use async_trait::async_trait;
use game_types::{GameError, GameStats, Player};

/// Opaque handle naming a target word on the oracle side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetSelector(String);

impl TargetSelector {
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What the oracle handed back on session start; echoed on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedGuess {
    pub rank: u32,
    pub game_over: bool,
    pub winner: Option<Player>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiGuess {
    pub word: String,
    pub rank: u32,
    pub game_over: bool,
    pub winner: Option<Player>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub revealed_word: String,
    pub total_guesses: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("Unknown word: {word}")]
    UnknownWord { word: String },
    #[error("Oracle says it is not your turn")]
    NotYourTurn,
    #[error("Oracle says the game is over")]
    GameOver,
    #[error("Transport failure: {message}")]
    Transport { message: String },
}

impl From<OracleError> for GameError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::UnknownWord { word } => GameError::UnknownWord { word },
            OracleError::NotYourTurn => GameError::NotYourTurn,
            OracleError::GameOver => GameError::GameAlreadyOver,
            OracleError::Transport { message } => GameError::Transport { message },
        }
    }
}

/// The server that knows the target word and ranks guesses against it.
///
/// No timeouts are imposed here; a transport that wants one reports its
/// expiry as `OracleError::Transport`.
#[async_trait]
pub trait RankingOracle: Send + Sync {
    async fn start_session(
        &self,
        target: Option<&TargetSelector>,
    ) -> Result<SessionContext, OracleError>;

    async fn submit_guess(
        &self,
        word: &str,
        session: &SessionContext,
    ) -> Result<RankedGuess, OracleError>;

    /// `Ok(None)` means the AI could not produce a usable word this turn.
    async fn request_ai_guess(
        &self,
        session: &SessionContext,
    ) -> Result<Option<AiGuess>, OracleError>;

    async fn give_up(&self, session: &SessionContext) -> Result<Reveal, OracleError>;

    async fn fetch_stats(&self) -> Result<GameStats, OracleError>;
}
