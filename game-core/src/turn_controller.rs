use game_types::{EXACT_RANK, GameError, Player, TurnState};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    HumanTurn,
    AiTurn,
    GameOver { winner: Option<Player> },
}

impl TurnPhase {
    fn turn_of(player: Player) -> Self {
        match player {
            Player::Human => TurnPhase::HumanTurn,
            Player::Ai => TurnPhase::AiTurn,
        }
    }
}

/// Whose turn it is, plus the gate that keeps a player to one oracle
/// request at a time.
///
/// A player "holds" the turn from `reserve` until the matching
/// `record_guess`, `pass` or `release`. While held, every other attempt,
/// including a second one by the same player, is refused.
#[derive(Debug, Clone)]
pub struct TurnController {
    phase: TurnPhase,
    in_flight: Option<Player>,
    last_player: Player,
}

impl TurnController {
    pub fn new() -> Self {
        Self {
            phase: TurnPhase::HumanTurn,
            in_flight: None,
            last_player: Player::Human,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, TurnPhase::GameOver { .. })
    }

    pub fn active_player(&self) -> Option<Player> {
        match self.phase {
            TurnPhase::HumanTurn => Some(Player::Human),
            TurnPhase::AiTurn => Some(Player::Ai),
            TurnPhase::GameOver { .. } => None,
        }
    }

    pub fn in_flight(&self) -> Option<Player> {
        self.in_flight
    }

    pub fn state(&self) -> TurnState {
        match self.phase {
            TurnPhase::HumanTurn => TurnState::turn_of(Player::Human),
            TurnPhase::AiTurn => TurnState::turn_of(Player::Ai),
            TurnPhase::GameOver { winner } => TurnState::finished(self.last_player, winner),
        }
    }

    /// Checks that `player` may start a guess right now, without claiming the turn.
    pub fn ensure_turn(&self, player: Player) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        if self.active_player() != Some(player) || self.in_flight.is_some() {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    pub fn reserve(&mut self, player: Player) -> Result<(), GameError> {
        self.ensure_turn(player)?;
        self.in_flight = Some(player);
        Ok(())
    }

    /// Gives the turn back unchanged, e.g. after an oracle failure.
    pub fn release(&mut self) {
        self.in_flight = None;
    }

    /// Applies a ranked guess by `player` and moves to the next phase.
    ///
    /// Rank 1 always wins for the guesser. The oracle may also end the game
    /// on its own authority (`oracle_over`), in which case its winner is used.
    pub fn record_guess(
        &mut self,
        player: Player,
        rank: u32,
        oracle_over: bool,
        oracle_winner: Option<Player>,
    ) -> TurnState {
        self.in_flight = None;
        self.last_player = player;

        self.phase = if rank == EXACT_RANK {
            TurnPhase::GameOver {
                winner: Some(player),
            }
        } else if oracle_over {
            TurnPhase::GameOver {
                winner: oracle_winner,
            }
        } else {
            TurnPhase::turn_of(player.opponent())
        };

        debug!("Turn after {} guess (rank {}): {:?}", player, rank, self.phase);
        self.state()
    }

    /// `player` yields without a guess.
    pub fn pass(&mut self, player: Player) -> TurnState {
        self.in_flight = None;
        self.last_player = player;
        self.phase = TurnPhase::turn_of(player.opponent());
        self.state()
    }

    pub fn forfeit(&mut self) -> TurnState {
        self.in_flight = None;
        self.phase = TurnPhase::GameOver { winner: None };
        self.state()
    }
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_human() {
        let turn = TurnController::new();
        assert_eq!(turn.phase(), TurnPhase::HumanTurn);
        assert_eq!(turn.state(), TurnState::turn_of(Player::Human));
    }

    #[test]
    fn test_strict_alternation() {
        let mut turn = TurnController::new();
        let mut expected = Player::Human;

        for rank in [40, 30, 20, 10, 5] {
            turn.reserve(expected).unwrap();
            let state = turn.record_guess(expected, rank, false, None);
            expected = expected.opponent();
            assert_eq!(state.active_player, expected);
            assert!(!state.game_over);
        }
    }

    #[test]
    fn test_exact_rank_ends_game() {
        let mut turn = TurnController::new();
        turn.reserve(Player::Human).unwrap();
        let state = turn.record_guess(Player::Human, 1, false, None);

        assert!(state.game_over);
        assert_eq!(state.winner, Some(Player::Human));
        assert_eq!(turn.ensure_turn(Player::Human), Err(GameError::GameAlreadyOver));
        assert_eq!(turn.ensure_turn(Player::Ai), Err(GameError::GameAlreadyOver));
    }

    #[test]
    fn test_oracle_can_end_game() {
        let mut turn = TurnController::new();
        turn.reserve(Player::Human).unwrap();
        let state = turn.record_guess(Player::Human, 17, true, Some(Player::Ai));

        assert!(state.game_over);
        assert_eq!(state.winner, Some(Player::Ai));
    }

    #[test]
    fn test_wrong_player_is_refused() {
        let mut turn = TurnController::new();
        assert_eq!(turn.reserve(Player::Ai), Err(GameError::NotYourTurn));
        assert_eq!(turn.in_flight(), None);
    }

    #[test]
    fn test_second_reservation_is_refused() {
        let mut turn = TurnController::new();
        turn.reserve(Player::Human).unwrap();
        assert_eq!(turn.reserve(Player::Human), Err(GameError::NotYourTurn));

        turn.release();
        assert_eq!(turn.phase(), TurnPhase::HumanTurn);
        assert!(turn.reserve(Player::Human).is_ok());
    }

    #[test]
    fn test_pass_hands_turn_over() {
        let mut turn = TurnController::new();
        turn.reserve(Player::Human).unwrap();
        turn.record_guess(Player::Human, 50, false, None);
        turn.reserve(Player::Ai).unwrap();

        let state = turn.pass(Player::Ai);
        assert_eq!(state.active_player, Player::Human);
        assert_eq!(turn.in_flight(), None);
    }

    #[test]
    fn test_forfeit_from_any_phase() {
        let mut turn = TurnController::new();
        turn.reserve(Player::Human).unwrap();
        turn.record_guess(Player::Human, 50, false, None);

        let state = turn.forfeit();
        assert!(state.game_over);
        assert_eq!(state.winner, None);
        assert_eq!(turn.in_flight(), None);
    }
}
