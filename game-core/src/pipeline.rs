use game_types::{GameError, GuessRecord, Player, TurnState};
use tracing::{debug, info, warn};

use crate::{AiGuess, GameSession, OracleError, RankedGuess};

/// Trims and lower-cases raw input, rejecting what is left if empty.
pub fn normalize_guess(raw: &str) -> Result<String, GameError> {
    let word = raw.trim().to_lowercase();
    if word.is_empty() {
        return Err(GameError::EmptyGuess);
    }
    Ok(word)
}

/// A claimed human turn awaiting the oracle's rank.
///
/// Carries the generation it was issued under; completing it against any
/// other generation is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGuess {
    pub generation: u64,
    pub word: String,
}

/// A claimed AI turn; the oracle picks the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAiTurn {
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// A record was appended and the turn moved on.
    Recorded { record: GuessRecord, turn: TurnState },
    /// The AI had no usable word; the turn went back to the human.
    Passed { turn: TurnState },
    /// The session was replaced while the oracle was thinking.
    Discarded,
}

/// Ranks start at 1; anything else means the oracle is misbehaving.
fn invalid_rank(word: &str) -> GameError {
    GameError::Transport {
        message: format!("oracle sent an invalid rank for '{}'", word),
    }
}

impl GameSession {
    /// Runs the local checks in order (empty, over, turn, duplicate) and
    /// claims the human turn. Nothing is mutated on failure.
    pub fn begin_human_guess(&mut self, raw: &str) -> Result<PendingGuess, GameError> {
        let word = normalize_guess(raw)?;
        self.turn.ensure_turn(Player::Human)?;

        if self.store.has_guessed(Player::Human, &word) {
            debug!("Rejected duplicate human guess '{}'", word);
            return Err(GameError::DuplicateGuess { word });
        }

        self.turn.reserve(Player::Human)?;
        Ok(PendingGuess {
            generation: self.generation,
            word,
        })
    }

    /// Claims the AI turn. The word is chosen by the oracle, so duplicates
    /// are checked when the answer comes back.
    pub fn begin_ai_turn(&mut self) -> Result<PendingAiTurn, GameError> {
        self.turn.reserve(Player::Ai)?;
        Ok(PendingAiTurn {
            generation: self.generation,
        })
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// True when `generation` is current and the AI's turn is open but
    /// not yet claimed, i.e. a scheduled reply still has work to do.
    pub fn awaits_ai_reply(&self, generation: u64) -> bool {
        self.is_current(generation)
            && self.turn.active_player() == Some(Player::Ai)
            && self.turn.in_flight().is_none()
    }

    /// True when the oracle picked a word the AI already tried this session.
    pub fn is_repeat_ai_guess(&self, guess: &AiGuess) -> bool {
        let word = guess.word.trim().to_lowercase();
        self.store.has_guessed(Player::Ai, &word)
    }

    pub fn complete_human_guess(
        &mut self,
        pending: PendingGuess,
        reply: Result<RankedGuess, OracleError>,
    ) -> Result<GuessOutcome, GameError> {
        if !self.is_current(pending.generation) {
            warn!(
                "Discarding human guess reply for generation {} (current {})",
                pending.generation, self.generation
            );
            return Ok(GuessOutcome::Discarded);
        }

        let word = pending.word;

        match reply {
            Ok(ranked) if ranked.rank == 0 => {
                warn!("Oracle sent rank 0 for human guess '{}'", word);
                self.turn.release();
                Err(invalid_rank(&word))
            }
            Ok(ranked) => Ok(self.append_guess(
                Player::Human,
                word,
                ranked.rank,
                ranked.game_over,
                ranked.winner,
            )),
            Err(err) => {
                warn!("Oracle rejected human guess '{}': {}", word, err);
                self.turn.release();
                Err(err.into())
            }
        }
    }

    pub fn complete_ai_turn(
        &mut self,
        pending: PendingAiTurn,
        reply: Result<Option<AiGuess>, OracleError>,
    ) -> Result<GuessOutcome, GameError> {
        if !self.is_current(pending.generation) {
            warn!(
                "Discarding AI reply for generation {} (current {})",
                pending.generation, self.generation
            );
            return Ok(GuessOutcome::Discarded);
        }

        match reply {
            Ok(Some(guess)) => {
                let word = match normalize_guess(&guess.word) {
                    Ok(word) => word,
                    Err(_) => return Ok(self.pass_ai_turn()),
                };
                if guess.rank == 0 {
                    warn!("Oracle sent rank 0 for AI guess '{}'", word);
                    self.turn.release();
                    return Err(invalid_rank(&word));
                }
                if self.store.has_guessed(Player::Ai, &word) {
                    self.turn.release();
                    return Err(GameError::DuplicateGuess { word });
                }
                Ok(self.append_guess(Player::Ai, word, guess.rank, guess.game_over, guess.winner))
            }
            Ok(None) => Ok(self.pass_ai_turn()),
            Err(err) => {
                warn!("AI guess request failed: {}", err);
                self.turn.release();
                Err(err.into())
            }
        }
    }

    fn pass_ai_turn(&mut self) -> GuessOutcome {
        info!("AI produced no usable guess; turn returns to human");
        GuessOutcome::Passed {
            turn: self.turn.pass(Player::Ai),
        }
    }

    fn append_guess(
        &mut self,
        player: Player,
        word: String,
        rank: u32,
        oracle_over: bool,
        oracle_winner: Option<Player>,
    ) -> GuessOutcome {
        let record = GuessRecord::new(word, rank, player, chrono::Utc::now().to_rfc3339());
        self.store.append(record.clone());
        let turn = self.turn.record_guess(player, rank, oracle_over, oracle_winner);

        info!(
            "Session {}: {} guessed '{}' (rank {}), {} records",
            self.id,
            player,
            record.word,
            rank,
            self.store.len()
        );

        GuessOutcome::Recorded { record, turn }
    }
}
