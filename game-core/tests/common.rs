#![allow(dead_code)]

use async_trait::async_trait;
use game_core::{
    AiGuess, GameConfig, GameController, OracleError, Presenter, RankedGuess, RankingOracle,
    Reveal, SessionContext, SessionEvent, TargetSelector,
};
use game_types::{ErrorKind, GameStats, GuessRecord, Player, SessionId, Severity, Tier, TurnState};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, mpsc};

pub const TARGET_WORD: &str = "sea";

/// Creates an AI reply the oracle will hand out on its next AI request
pub fn ai_reply(word: &str, rank: u32) -> Result<Option<AiGuess>, OracleError> {
    Ok(Some(AiGuess {
        word: word.to_string(),
        rank,
        game_over: rank == 1,
        winner: if rank == 1 { Some(Player::Ai) } else { None },
    }))
}

/// In-memory oracle with scripted ranks and AI replies.
///
/// Human words not in the rank table are reported as unknown. AI requests
/// with an empty script answer "no guess".
#[derive(Default)]
pub struct ScriptedOracle {
    ranks: Mutex<HashMap<String, u32>>,
    ai_replies: Mutex<VecDeque<Result<Option<AiGuess>, OracleError>>>,
    guess_failures: Mutex<VecDeque<OracleError>>,
    guess_gate: Mutex<Option<Arc<Notify>>>,
    ai_gate: Mutex<Option<Arc<Notify>>>,
    submitted: Mutex<Vec<String>>,
    targets: Mutex<Vec<Option<String>>>,
    ai_requests: Mutex<u32>,
    give_ups: Mutex<u32>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        let oracle = Self::default();
        oracle.rank("ocean", 42).rank("sea", 1).rank("lamp", 50)
    }

    pub fn rank(self, word: &str, rank: u32) -> Self {
        self.ranks.lock().unwrap().insert(word.to_string(), rank);
        self
    }

    pub fn with_ranks(self, ranks: &[(&str, u32)]) -> Self {
        ranks.iter().fold(self, |oracle, (word, rank)| oracle.rank(word, *rank))
    }

    pub fn queue_ai(&self, reply: Result<Option<AiGuess>, OracleError>) {
        self.ai_replies.lock().unwrap().push_back(reply);
    }

    pub fn fail_next_guess(&self, error: OracleError) {
        self.guess_failures.lock().unwrap().push_back(error);
    }

    /// Holds every human guess request until the returned gate is notified.
    pub fn hold_guesses(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.guess_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Holds every AI request until the returned gate is notified.
    pub fn hold_ai(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.ai_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn ai_requests(&self) -> u32 {
        *self.ai_requests.lock().unwrap()
    }

    pub fn targets(&self) -> Vec<Option<String>> {
        self.targets.lock().unwrap().clone()
    }

    pub fn give_ups(&self) -> u32 {
        *self.give_ups.lock().unwrap()
    }
}

#[async_trait]
impl RankingOracle for ScriptedOracle {
    async fn start_session(
        &self,
        target: Option<&TargetSelector>,
    ) -> Result<SessionContext, OracleError> {
        let mut targets = self.targets.lock().unwrap();
        targets.push(target.map(|t| t.as_str().to_string()));
        Ok(SessionContext {
            session_id: format!("session-{}", targets.len()),
        })
    }

    async fn submit_guess(
        &self,
        word: &str,
        _session: &SessionContext,
    ) -> Result<RankedGuess, OracleError> {
        self.submitted.lock().unwrap().push(word.to_string());

        let gate = self.guess_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(error) = self.guess_failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        let rank = self.ranks.lock().unwrap().get(word).copied();
        match rank {
            Some(rank) => Ok(RankedGuess {
                rank,
                game_over: rank == 1,
                winner: if rank == 1 { Some(Player::Human) } else { None },
            }),
            None => Err(OracleError::UnknownWord {
                word: word.to_string(),
            }),
        }
    }

    async fn request_ai_guess(
        &self,
        _session: &SessionContext,
    ) -> Result<Option<AiGuess>, OracleError> {
        *self.ai_requests.lock().unwrap() += 1;

        let gate = self.ai_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.ai_replies.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    async fn give_up(&self, _session: &SessionContext) -> Result<Reveal, OracleError> {
        *self.give_ups.lock().unwrap() += 1;
        Ok(Reveal {
            revealed_word: TARGET_WORD.to_string(),
            total_guesses: self.submitted.lock().unwrap().len() as u32,
        })
    }

    async fn fetch_stats(&self) -> Result<GameStats, OracleError> {
        Ok(GameStats {
            daily_number: 290,
            total_players: 7,
        })
    }
}

/// Presenter that keeps every event and streams them to the test.
pub struct RecordingPresenter {
    events: Mutex<Vec<SessionEvent>>,
    sender: mpsc::UnboundedSender<SessionEvent>,
    receiver: tokio::sync::Mutex<mpsc::UnboundedReceiver<SessionEvent>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            events: Mutex::new(Vec::new()),
            sender,
            receiver: tokio::sync::Mutex::new(receiver),
        }
    }

    fn push(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event.clone());
        self.sender.send(event).ok();
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<ErrorKind> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::Error { kind, .. } => Some(kind),
                _ => None,
            })
            .collect()
    }

    pub fn has_event(&self, check_fn: impl Fn(&SessionEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }

    /// Waits (up to ten seconds of possibly paused time) for a matching event.
    pub async fn wait_for(&self, check_fn: impl Fn(&SessionEvent) -> bool) -> SessionEvent {
        let mut receiver = self.receiver.lock().await;
        tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                match receiver.recv().await {
                    Some(event) if check_fn(&event) => return event,
                    Some(_) => continue,
                    None => panic!("Presenter channel closed"),
                }
            }
        })
        .await
        .expect("Timed out waiting for presenter event")
    }

    pub async fn wait_for_ai_guess(&self) -> GuessRecord {
        match self
            .wait_for(|e| matches!(e, SessionEvent::GuessAdded { record, .. } if record.player == Player::Ai))
            .await
        {
            SessionEvent::GuessAdded { record, .. } => record,
            other => panic!("Expected GuessAdded, got {:?}", other),
        }
    }
}

impl Presenter for RecordingPresenter {
    fn on_guess_added(&self, record: &GuessRecord, tier: Tier, severity: Severity) {
        self.push(SessionEvent::GuessAdded {
            record: record.clone(),
            tier,
            severity,
        });
    }

    fn on_turn_changed(&self, turn: &TurnState) {
        self.push(SessionEvent::TurnChanged { turn: *turn });
    }

    fn on_game_over(&self, winner: Option<Player>, revealed_word: Option<&str>) {
        self.push(SessionEvent::GameOver {
            winner,
            revealed_word: revealed_word.map(str::to_string),
        });
    }

    fn on_error(&self, kind: ErrorKind, message: &str) {
        self.push(SessionEvent::Error {
            kind,
            message: message.to_string(),
        });
    }

    fn on_session_started(&self, session_id: SessionId) {
        self.push(SessionEvent::SessionStarted { session_id });
    }

    fn on_stats(&self, stats: &GameStats) {
        self.push(SessionEvent::StatsUpdated {
            stats: stats.clone(),
        });
    }
}

/// Default configuration with the AI answering immediately
pub fn instant_config() -> GameConfig {
    GameConfig::default().with_think_delay(Duration::ZERO)
}

/// Configuration where the AI only moves when asked
pub fn manual_config() -> GameConfig {
    instant_config().with_auto_ai_reply(false)
}

pub struct TestGame {
    pub controller: Arc<GameController>,
    pub oracle: Arc<ScriptedOracle>,
    pub presenter: Arc<RecordingPresenter>,
}

impl TestGame {
    pub fn new(oracle: ScriptedOracle, config: GameConfig) -> Self {
        let oracle = Arc::new(oracle);
        let presenter = Arc::new(RecordingPresenter::new());
        let controller = GameController::new(oracle.clone(), presenter.clone(), config);
        Self {
            controller,
            oracle,
            presenter,
        }
    }

    /// Creates a game and starts its first session
    pub async fn started(oracle: ScriptedOracle, config: GameConfig) -> Self {
        let game = Self::new(oracle, config);
        game.controller.start().await.unwrap();
        game
    }

    pub async fn record_words(&self) -> Vec<String> {
        self.controller
            .records()
            .await
            .into_iter()
            .map(|r| r.word)
            .collect()
    }

    pub async fn ordered_words(&self) -> Vec<String> {
        self.controller
            .ordered_view()
            .await
            .entries
            .into_iter()
            .map(|e| e.record.word)
            .collect()
    }
}

/// Polls `condition` every millisecond, failing after two seconds.
pub async fn until(condition: impl Fn() -> bool) {
    for _ in 0..2_000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("Condition never became true");
}
