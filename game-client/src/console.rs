use std::io::{self, Write};
use std::sync::Mutex;

use game_core::Presenter;
use game_types::{
    ErrorKind, GameStats, GuessRecord, Player, RankedEntry, SessionId, Severity, Tier, TurnState,
};

pub fn tier_label(tier: Tier) -> String {
    match tier {
        Tier::Exact => "exact".to_string(),
        Tier::Band(band) => format!("{:>3}%", band),
    }
}

pub fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Exact => "!!",
        Severity::Close => "hot",
        Severity::Far => "cold",
    }
}

fn player_label(player: Player) -> &'static str {
    match player {
        Player::Human => "you",
        Player::Ai => "AI",
    }
}

pub fn render_entry(entry: &RankedEntry) -> String {
    format!(
        "{:>6}  {:<20} {:>5} {:<4} ({})",
        entry.record.rank,
        entry.record.word,
        tier_label(entry.tier),
        severity_label(entry.severity),
        player_label(entry.record.player),
    )
}

/// Renders the guess list, closest first.
pub fn render_board(entries: &[RankedEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&render_entry(entry));
        out.push('\n');
    }
    out
}

pub fn render_turn(turn: &TurnState) -> String {
    match (turn.game_over, turn.winner) {
        (true, Some(Player::Human)) => "You found the word!".to_string(),
        (true, Some(Player::Ai)) => "The AI found the word.".to_string(),
        (true, None) => "Game over.".to_string(),
        (false, _) if turn.active_player == Player::Human => "Your turn.".to_string(),
        (false, _) => "AI is thinking...".to_string(),
    }
}

/// Presenter that keeps its own copy of the board and prints to a writer.
pub struct ConsolePresenter {
    out: Mutex<Box<dyn Write + Send>>,
    board: Mutex<Vec<RankedEntry>>,
}

impl ConsolePresenter {
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            board: Mutex::new(Vec::new()),
        }
    }

    pub fn board(&self) -> Vec<RankedEntry> {
        self.board
            .lock()
            .map(|board| board.clone())
            .unwrap_or_default()
    }

    fn print(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            // Nothing sensible to do if stdout is gone.
            writeln!(out, "{}", text).ok();
            out.flush().ok();
        }
    }

    fn insert(&self, entry: RankedEntry) -> String {
        match self.board.lock() {
            Ok(mut board) => {
                let index = board.partition_point(|e| e.record.rank <= entry.record.rank);
                board.insert(index, entry);
                render_board(&board)
            }
            Err(_) => String::new(),
        }
    }
}

impl Presenter for ConsolePresenter {
    fn on_session_started(&self, _session_id: SessionId) {
        if let Ok(mut board) = self.board.lock() {
            board.clear();
        }
        self.print("--- New game ---");
    }

    fn on_guess_added(&self, record: &GuessRecord, tier: Tier, severity: Severity) {
        let entry = RankedEntry {
            record: record.clone(),
            tier,
            severity,
        };
        self.print(&format!(
            "{} guessed '{}': rank {}",
            player_label(record.player),
            record.word,
            record.rank
        ));
        let board = self.insert(entry);
        self.print(board.trim_end());
    }

    fn on_turn_changed(&self, turn: &TurnState) {
        self.print(&render_turn(turn));
    }

    fn on_game_over(&self, winner: Option<Player>, revealed_word: Option<&str>) {
        match (winner, revealed_word) {
            (_, Some(word)) => {
                self.print(&format!("The word was '{}'.", word));
                self.print(&format!("{:>6}  {:<20} {:>5}", 1, word, tier_label(Tier::Exact)));
            }
            (Some(player), None) => {
                self.print(&format!("Winner: {}", player_label(player)));
            }
            (None, None) => self.print("Game over. The word could not be revealed."),
        }
    }

    fn on_error(&self, kind: ErrorKind, message: &str) {
        match kind {
            // The front end asks the question itself.
            ErrorKind::ConfirmationRequired => {}
            _ => self.print(&format!("! {}", message)),
        }
    }

    fn on_stats(&self, stats: &GameStats) {
        self.print(&format!(
            "Daily #{} - {} players today",
            stats.daily_number, stats.total_players
        ));
    }
}
