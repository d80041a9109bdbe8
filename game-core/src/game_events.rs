use game_types::{ErrorKind, GameError, GameStats, GuessRecord, Player, SessionId, Severity, Tier, TurnState};

use crate::{GuessOutcome, RankScale};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SessionStarted {
        session_id: SessionId,
    },
    GuessAdded {
        record: GuessRecord,
        tier: Tier,
        severity: Severity,
    },
    TurnChanged {
        turn: TurnState,
    },
    GameOver {
        winner: Option<Player>,
        revealed_word: Option<String>,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
    StatsUpdated {
        stats: GameStats,
    },
}

impl SessionEvent {
    pub fn error(err: &GameError) -> Self {
        SessionEvent::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// Events a presenter should see for a completed guess, in order.
    pub fn for_outcome(outcome: &GuessOutcome, scale: &RankScale) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let turn = match outcome {
            GuessOutcome::Recorded { record, turn } => {
                let (tier, severity) = scale.classify(record.rank);
                events.push(SessionEvent::GuessAdded {
                    record: record.clone(),
                    tier,
                    severity,
                });
                *turn
            }
            GuessOutcome::Passed { turn } => *turn,
            GuessOutcome::Discarded => return events,
        };

        events.push(SessionEvent::TurnChanged { turn });
        if turn.game_over {
            events.push(SessionEvent::GameOver {
                winner: turn.winner,
                revealed_word: None,
            });
        }
        events
    }

    pub fn dispatch(&self, presenter: &dyn Presenter) {
        match self {
            SessionEvent::SessionStarted { session_id } => presenter.on_session_started(*session_id),
            SessionEvent::GuessAdded {
                record,
                tier,
                severity,
            } => presenter.on_guess_added(record, *tier, *severity),
            SessionEvent::TurnChanged { turn } => presenter.on_turn_changed(turn),
            SessionEvent::GameOver {
                winner,
                revealed_word,
            } => presenter.on_game_over(*winner, revealed_word.as_deref()),
            SessionEvent::Error { kind, message } => presenter.on_error(*kind, message),
            SessionEvent::StatsUpdated { stats } => presenter.on_stats(stats),
        }
    }
}

/// View-side callbacks, invoked after every state change.
///
/// Calls arrive outside the controller's lock, so a presenter may read
/// back from the controller while handling one.
pub trait Presenter: Send + Sync {
    fn on_guess_added(&self, record: &GuessRecord, tier: Tier, severity: Severity);

    fn on_turn_changed(&self, turn: &TurnState);

    /// `winner` is `None` after a give-up, which is also the only case
    /// with a revealed word.
    fn on_game_over(&self, winner: Option<Player>, revealed_word: Option<&str>);

    fn on_error(&self, kind: ErrorKind, message: &str);

    fn on_session_started(&self, _session_id: SessionId) {}

    fn on_stats(&self, _stats: &GameStats) {}
}

pub fn publish(presenter: &dyn Presenter, events: &[SessionEvent]) {
    for event in events {
        event.dispatch(presenter);
    }
}
