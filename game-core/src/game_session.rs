use game_types::{GuessRecord, OrderedView, SessionId, TurnState};
use tracing::info;
use uuid::Uuid;

use crate::{GuessRecordStore, RankScale, SessionContext, TargetSelector, TurnController};

/// One game from start to a terminal state.
///
/// Sessions are never reused: start, restart, target change and give-up
/// each install a new generation, and replies addressed to an older
/// generation are dropped on arrival.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) id: SessionId,
    pub(crate) generation: u64,
    pub(crate) context: SessionContext,
    pub(crate) target: Option<TargetSelector>,
    pub(crate) store: GuessRecordStore,
    pub(crate) turn: TurnController,
    pub(crate) revealed_word: Option<String>,
}

impl GameSession {
    pub fn new(generation: u64, context: SessionContext, target: Option<TargetSelector>) -> Self {
        let id = Uuid::new_v4();
        info!(
            "Session {} started (generation {}, oracle session {})",
            id, generation, context.session_id
        );

        Self {
            id,
            generation,
            context,
            target,
            store: GuessRecordStore::new(),
            turn: TurnController::new(),
            revealed_word: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn target(&self) -> Option<&TargetSelector> {
        self.target.as_ref()
    }

    pub fn records(&self) -> &GuessRecordStore {
        &self.store
    }

    pub fn turn(&self) -> &TurnController {
        &self.turn
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn.state()
    }

    pub fn is_over(&self) -> bool {
        self.turn.is_over()
    }

    pub fn revealed_word(&self) -> Option<&str> {
        self.revealed_word.as_deref()
    }

    pub fn best_so_far(&self) -> Option<&GuessRecord> {
        self.store.best_so_far()
    }

    pub fn view(&self, scale: &RankScale) -> OrderedView {
        self.store.view(scale)
    }

    /// Guesses exist and nobody has won yet, so switching targets would
    /// throw work away.
    pub fn has_unfinished_guesses(&self) -> bool {
        !self.store.is_empty() && !self.is_over()
    }

    /// Ends the session with no winner and moves it to `generation` so
    /// that requests still in flight are discarded when they return.
    pub fn forfeit(&mut self, generation: u64) -> TurnState {
        self.generation = generation;
        let state = self.turn.forfeit();
        info!(
            "Session {} given up after {} guesses",
            self.id,
            self.store.len()
        );
        state
    }

    pub fn set_revealed_word(&mut self, word: String) {
        self.revealed_word = Some(word);
    }
}
