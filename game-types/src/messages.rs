use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Player;

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StartSessionRequest {
    pub target: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StartSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRequest {
    pub session_id: String,
    pub guess: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessResponse {
    pub rank: u32,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub winner: Option<Player>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionRequest {
    pub session_id: String,
}

/// `ai_guess` and `ai_rank` are both absent when the AI could not come up
/// with a usable word.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AiGuessResponse {
    pub ai_guess: Option<String>,
    pub ai_rank: Option<u32>,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub winner: Option<Player>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GiveUpResponse {
    pub target_word: String,
    #[serde(default)]
    pub total_guesses: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    UnknownWord,
    NotYourTurn,
    GameOver,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default = "default_error_code")]
    pub code: ApiErrorCode,
    pub message: String,
}

fn default_error_code() -> ApiErrorCode {
    ApiErrorCode::Other
}

/// Envelope every oracle endpoint answers with, tagged by `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse<T> {
    Success(T),
    Error(ApiError),
}
