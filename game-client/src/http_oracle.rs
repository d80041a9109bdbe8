use std::time::Duration;

use async_trait::async_trait;
use game_core::{
    AiGuess, OracleError, RankedGuess, RankingOracle, Reveal, SessionContext, TargetSelector,
};
use game_types::{
    AiGuessResponse, ApiErrorCode, ApiResponse, GameStats, GiveUpResponse, GuessRequest,
    GuessResponse, SessionRequest, StartSessionRequest, StartSessionResponse,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Ranking oracle reached over the JSON HTTP API.
pub struct HttpOracle {
    client: Client,
    base_url: String,
}

impl HttpOracle {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, OracleError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `request` and unwraps the response envelope. `guess` is the
    /// word being ranked, if any; an `unknown_word` answer without one is a
    /// transport failure.
    async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
        guess: Option<&str>,
    ) -> Result<T, OracleError> {
        let response = request.send().await.map_err(|e| {
            warn!("Request to {} failed: {:?}", path, e);
            transport(e)
        })?;

        let status = response.status();
        let body: ApiResponse<T> = match response.json().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                warn!("Failed to parse response from {}: {:?}", path, e);
                return Err(transport(e));
            }
            Err(_) => {
                warn!("{} returned status: {}", path, status);
                return Err(OracleError::Transport {
                    message: format!("{} returned {}", path, status),
                });
            }
        };

        match body {
            ApiResponse::Success(body) if status.is_success() => Ok(body),
            ApiResponse::Success(_) => Err(OracleError::Transport {
                message: format!("{} returned {}", path, status),
            }),
            ApiResponse::Error(error) => {
                debug!("{} answered with {:?}: {}", path, error.code, error.message);
                Err(match error.code {
                    ApiErrorCode::UnknownWord => match guess {
                        Some(word) => OracleError::UnknownWord {
                            word: word.to_string(),
                        },
                        None => OracleError::Transport {
                            message: error.message,
                        },
                    },
                    ApiErrorCode::NotYourTurn => OracleError::NotYourTurn,
                    ApiErrorCode::GameOver => OracleError::GameOver,
                    ApiErrorCode::Other => OracleError::Transport {
                        message: error.message,
                    },
                })
            }
        }
    }
}

fn transport(err: reqwest::Error) -> OracleError {
    OracleError::Transport {
        message: err.to_string(),
    }
}

#[async_trait]
impl RankingOracle for HttpOracle {
    async fn start_session(
        &self,
        target: Option<&TargetSelector>,
    ) -> Result<SessionContext, OracleError> {
        let request = StartSessionRequest {
            target: target.map(|t| t.as_str().to_string()),
        };
        let response: StartSessionResponse = self
            .call(
                "/api/start",
                self.client.post(self.url("/api/start")).json(&request),
                None,
            )
            .await?;

        debug!("Oracle session {} started", response.session_id);
        Ok(SessionContext {
            session_id: response.session_id,
        })
    }

    async fn submit_guess(
        &self,
        word: &str,
        session: &SessionContext,
    ) -> Result<RankedGuess, OracleError> {
        let request = GuessRequest {
            session_id: session.session_id.clone(),
            guess: word.to_string(),
        };
        let response: GuessResponse = self
            .call(
                "/api/guess",
                self.client.post(self.url("/api/guess")).json(&request),
                Some(word),
            )
            .await?;

        Ok(RankedGuess {
            rank: response.rank,
            game_over: response.game_over,
            winner: response.winner,
        })
    }

    async fn request_ai_guess(
        &self,
        session: &SessionContext,
    ) -> Result<Option<AiGuess>, OracleError> {
        let request = SessionRequest {
            session_id: session.session_id.clone(),
        };
        let response: AiGuessResponse = self
            .call(
                "/api/ai-guess",
                self.client.post(self.url("/api/ai-guess")).json(&request),
                None,
            )
            .await?;

        Ok(match (response.ai_guess, response.ai_rank) {
            (Some(word), Some(rank)) => Some(AiGuess {
                word,
                rank,
                game_over: response.game_over,
                winner: response.winner,
            }),
            _ => None,
        })
    }

    async fn give_up(&self, session: &SessionContext) -> Result<Reveal, OracleError> {
        let request = SessionRequest {
            session_id: session.session_id.clone(),
        };
        let response: GiveUpResponse = self
            .call(
                "/api/give-up",
                self.client.post(self.url("/api/give-up")).json(&request),
                None,
            )
            .await?;

        Ok(Reveal {
            revealed_word: response.target_word,
            total_guesses: response.total_guesses,
        })
    }

    async fn fetch_stats(&self) -> Result<GameStats, OracleError> {
        self.call("/api/stats", self.client.get(self.url("/api/stats")), None)
            .await
    }
}
