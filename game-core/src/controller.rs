use std::sync::Arc;

use game_types::{GameError, GameStats, GuessRecord, OrderedView, Player, TurnState};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    GameConfig, GameSession, GuessOutcome, Presenter, RankingOracle, Reveal, SessionEvent,
    TargetSelector, publish,
};

#[derive(Debug)]
struct AiReplyTask {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug, Default)]
struct ControllerState {
    session: Option<GameSession>,
    generation: u64,
    ai_task: Option<AiReplyTask>,
}

impl ControllerState {
    /// Invalidates everything issued so far and returns the new generation.
    fn next_generation(&mut self) -> u64 {
        self.cancel_ai_reply();
        self.generation += 1;
        self.generation
    }

    fn cancel_ai_reply(&mut self) {
        if let Some(task) = self.ai_task.take() {
            debug!("Cancelling AI reply for generation {}", task.generation);
            task.handle.abort();
        }
    }
}

/// Drives one player's games against a ranking oracle.
///
/// Every operation validates and claims the turn under the lock, releases
/// the lock for the oracle round trip, then re-takes it to apply the answer.
/// Presenter callbacks run after the lock is dropped.
pub struct GameController {
    oracle: Arc<dyn RankingOracle>,
    presenter: Arc<dyn Presenter>,
    config: GameConfig,
    state: RwLock<ControllerState>,
}

impl GameController {
    pub fn new(
        oracle: Arc<dyn RankingOracle>,
        presenter: Arc<dyn Presenter>,
        config: GameConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            oracle,
            presenter,
            config,
            state: RwLock::new(ControllerState::default()),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Starts a fresh session on whatever target the oracle picks.
    pub async fn start(&self) -> Result<TurnState, GameError> {
        let result = self.replace_session(None).await;
        self.report(result)
    }

    /// Starts over on the current target.
    pub async fn restart(&self) -> Result<TurnState, GameError> {
        let target = {
            let state = self.state.read().await;
            state.session.as_ref().and_then(|s| s.target().cloned())
        };
        let result = self.replace_session(target).await;
        self.report(result)
    }

    /// Switches to a new target. Abandoning a game in progress needs `confirmed`.
    pub async fn set_target(
        &self,
        selector: TargetSelector,
        confirmed: bool,
    ) -> Result<TurnState, GameError> {
        let needs_confirmation = {
            let state = self.state.read().await;
            state
                .session
                .as_ref()
                .is_some_and(GameSession::has_unfinished_guesses)
        };

        let result = if needs_confirmation && !confirmed {
            Err(GameError::ConfirmationRequired)
        } else {
            self.replace_session(Some(selector)).await
        };
        self.report(result)
    }

    /// Ends the session with no winner and asks the oracle for the word.
    ///
    /// Irreversible once confirmed: the session stays over even if the
    /// reveal request fails.
    pub async fn give_up(&self, confirmed: bool) -> Result<Reveal, GameError> {
        let result = self.run_give_up(confirmed).await;
        self.report(result)
    }

    pub async fn submit_guess(self: &Arc<Self>, raw: &str) -> Result<GuessOutcome, GameError> {
        let result = self.run_human_guess(raw).await;
        self.report(result)
    }

    /// Runs the AI's turn now, cancelling any scheduled reply. Also the way
    /// to retry after the oracle failed an AI request.
    pub async fn request_ai_turn(&self) -> Result<GuessOutcome, GameError> {
        let result = self.run_ai_turn(None).await;
        self.report(result)
    }

    pub async fn refresh_stats(&self) -> Result<GameStats, GameError> {
        let result = self.oracle.fetch_stats().await.map_err(GameError::from);
        if let Ok(stats) = &result {
            publish(
                self.presenter.as_ref(),
                &[SessionEvent::StatsUpdated {
                    stats: stats.clone(),
                }],
            );
        }
        self.report(result)
    }

    pub async fn turn_state(&self) -> Option<TurnState> {
        let state = self.state.read().await;
        state.session.as_ref().map(GameSession::turn_state)
    }

    pub async fn records(&self) -> Vec<GuessRecord> {
        let state = self.state.read().await;
        state
            .session
            .as_ref()
            .map(|s| s.records().all().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn ordered_view(&self) -> OrderedView {
        let state = self.state.read().await;
        state
            .session
            .as_ref()
            .map(|s| s.view(&self.config.rank_scale))
            .unwrap_or_default()
    }

    pub async fn session(&self) -> Option<GameSession> {
        self.state.read().await.session.clone()
    }

    pub async fn has_pending_ai_reply(&self) -> bool {
        let state = self.state.read().await;
        state
            .ai_task
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Drops any scheduled AI reply; the session itself is left as is.
    pub async fn shutdown(&self) {
        self.state.write().await.cancel_ai_reply();
    }

    fn report<T>(&self, result: Result<T, GameError>) -> Result<T, GameError> {
        if let Err(err) = &result {
            debug!("Reporting error to presenter: {}", err);
            SessionEvent::error(err).dispatch(self.presenter.as_ref());
        }
        result
    }

    async fn replace_session(&self, target: Option<TargetSelector>) -> Result<TurnState, GameError> {
        let context = self
            .oracle
            .start_session(target.as_ref())
            .await
            .map_err(|err| {
                warn!("Oracle failed to start a session: {}", err);
                GameError::from(err)
            })?;

        let (session_id, turn) = {
            let mut state = self.state.write().await;
            let generation = state.next_generation();
            let session = GameSession::new(generation, context, target);
            let started = (session.id(), session.turn_state());
            state.session = Some(session);
            started
        };

        publish(
            self.presenter.as_ref(),
            &[
                SessionEvent::SessionStarted { session_id },
                SessionEvent::TurnChanged { turn },
            ],
        );
        Ok(turn)
    }

    async fn run_give_up(&self, confirmed: bool) -> Result<Reveal, GameError> {
        if !confirmed {
            return Err(GameError::ConfirmationRequired);
        }

        let (generation, context, turn) = {
            let mut state = self.state.write().await;
            match state.session.as_ref() {
                None => return Err(GameError::NoActiveSession),
                Some(session) if session.is_over() => return Err(GameError::GameAlreadyOver),
                Some(_) => {}
            }
            let generation = state.next_generation();
            let session = state.session.as_mut().ok_or(GameError::NoActiveSession)?;
            let turn = session.forfeit(generation);
            (generation, session.context().clone(), turn)
        };

        publish(self.presenter.as_ref(), &[SessionEvent::TurnChanged { turn }]);

        match self.oracle.give_up(&context).await {
            Ok(reveal) => {
                let current = {
                    let mut state = self.state.write().await;
                    match state.session.as_mut() {
                        Some(session) if session.is_current(generation) => {
                            session.set_revealed_word(reveal.revealed_word.clone());
                            true
                        }
                        _ => false,
                    }
                };

                info!(
                    "Target revealed after give-up ({} guesses in total)",
                    reveal.total_guesses
                );
                if current {
                    publish(
                        self.presenter.as_ref(),
                        &[SessionEvent::GameOver {
                            winner: None,
                            revealed_word: Some(reveal.revealed_word.clone()),
                        }],
                    );
                }
                Ok(reveal)
            }
            Err(err) => {
                warn!("Oracle failed to reveal the target: {}", err);
                publish(
                    self.presenter.as_ref(),
                    &[SessionEvent::GameOver {
                        winner: None,
                        revealed_word: None,
                    }],
                );
                Err(err.into())
            }
        }
    }

    async fn run_human_guess(self: &Arc<Self>, raw: &str) -> Result<GuessOutcome, GameError> {
        let (pending, context) = {
            let mut state = self.state.write().await;
            let session = state.session.as_mut().ok_or(GameError::NoActiveSession)?;
            let pending = session.begin_human_guess(raw)?;
            (pending, session.context().clone())
        };

        let generation = pending.generation;
        debug!("Submitting '{}' to the oracle", pending.word);
        let reply = self.oracle.submit_guess(&pending.word, &context).await;

        let outcome = {
            let mut state = self.state.write().await;
            match state.session.as_mut() {
                Some(session) => session.complete_human_guess(pending, reply)?,
                None => GuessOutcome::Discarded,
            }
        };

        publish(
            self.presenter.as_ref(),
            &SessionEvent::for_outcome(&outcome, &self.config.rank_scale),
        );

        if let GuessOutcome::Recorded { turn, .. } = &outcome {
            if self.config.auto_ai_reply && !turn.game_over && turn.active_player == Player::Ai {
                let mut state = self.state.write().await;
                // A manual AI turn may have run since the lock was dropped.
                let open = state
                    .session
                    .as_ref()
                    .is_some_and(|s| s.awaits_ai_reply(generation));
                if state.generation == generation && open {
                    self.schedule_ai_reply(&mut state, generation);
                }
            }
        }

        Ok(outcome)
    }

    fn schedule_ai_reply(self: &Arc<Self>, state: &mut ControllerState, generation: u64) {
        state.cancel_ai_reply();

        let controller = Arc::clone(self);
        let delay = self.config.ai_think_delay;
        debug!(
            "AI reply scheduled in {:?} for generation {}",
            delay, generation
        );

        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let result = controller.run_ai_turn(Some(generation)).await;
            // Errors from a scheduled reply have nowhere else to go.
            controller.report(result).ok();
        });

        state.ai_task = Some(AiReplyTask { generation, handle });
    }

    /// `scheduled` is the generation a timer was armed for; `None` for a
    /// manual request.
    async fn run_ai_turn(&self, scheduled: Option<u64>) -> Result<GuessOutcome, GameError> {
        let (pending, context) = {
            let mut state = self.state.write().await;
            match scheduled {
                Some(generation) if generation != state.generation => {
                    debug!("Dropping AI reply armed for generation {}", generation);
                    return Ok(GuessOutcome::Discarded);
                }
                // The running task is the one stored; dropping its handle only detaches it.
                Some(_) => state.ai_task = None,
                None => state.cancel_ai_reply(),
            }
            let session = state.session.as_mut().ok_or(GameError::NoActiveSession)?;
            let pending = session.begin_ai_turn()?;
            (pending, session.context().clone())
        };

        let max_attempts = self.config.ai_max_attempts.max(1);
        let mut attempt = 0;
        let reply = loop {
            attempt += 1;
            let reply = self.oracle.request_ai_guess(&context).await;

            let repeated = match &reply {
                Ok(Some(guess)) => {
                    let state = self.state.read().await;
                    state.session.as_ref().is_some_and(|s| {
                        s.is_current(pending.generation) && s.is_repeat_ai_guess(guess)
                    })
                }
                _ => false,
            };

            if !repeated {
                break reply;
            }
            if attempt >= max_attempts {
                warn!("AI repeated itself {} times; passing the turn", attempt);
                break Ok(None);
            }
            debug!("AI repeated a word, asking again ({}/{})", attempt, max_attempts);
        };

        let outcome = {
            let mut state = self.state.write().await;
            match state.session.as_mut() {
                Some(session) => session.complete_ai_turn(pending, reply)?,
                None => GuessOutcome::Discarded,
            }
        };

        publish(
            self.presenter.as_ref(),
            &SessionEvent::for_outcome(&outcome, &self.config.rank_scale),
        );
        Ok(outcome)
    }
}
