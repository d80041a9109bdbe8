use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub type SessionId = Uuid;

/// Rank reported for an exact match.
pub const EXACT_RANK: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Player {
    Human,
    Ai,
}

impl Player {
    /// The player who moves after this one.
    pub fn opponent(self) -> Self {
        match self {
            Player::Human => Player::Ai,
            Player::Ai => Player::Human,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Human => write!(f, "human"),
            Player::Ai => write!(f, "ai"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRecord {
    pub word: String, // Normalized: trimmed and lower-cased
    pub rank: u32,
    pub player: Player,
    pub is_correct: bool,
    pub submitted_at: String, // ISO 8601 string
}

impl GuessRecord {
    pub fn new(word: String, rank: u32, player: Player, submitted_at: String) -> Self {
        Self {
            word,
            rank,
            player,
            is_correct: rank == EXACT_RANK,
            submitted_at,
        }
    }
}

/// Client view of whose turn it is.
///
/// `active_player` carries no meaning once `game_over` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TurnState {
    pub active_player: Player,
    pub game_over: bool,
    pub winner: Option<Player>,
}

impl TurnState {
    pub fn turn_of(player: Player) -> Self {
        Self {
            active_player: player,
            game_over: false,
            winner: None,
        }
    }

    pub fn finished(last_player: Player, winner: Option<Player>) -> Self {
        Self {
            active_player: last_player,
            game_over: true,
            winner,
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::turn_of(Player::Human)
    }
}

/// Discrete colour band derived from a rank.
///
/// Ordering follows closeness: `Exact` sorts before every band and bands
/// sort by their lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Tier {
    Exact,
    Band(u8),
}

/// Coarse feedback class used for sounds and highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Severity {
    Exact,
    Close,
    Far,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameStats {
    pub daily_number: i64,
    pub total_players: u64,
}

/// One row of the presentation ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RankedEntry {
    pub record: GuessRecord,
    pub tier: Tier,
    pub severity: Severity,
}

/// Guess list as a presenter should draw it: best rank first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderedView {
    pub entries: Vec<RankedEntry>,
    pub best: Option<GuessRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_alternation() {
        assert_eq!(Player::Human.opponent(), Player::Ai);
        assert_eq!(Player::Ai.opponent(), Player::Human);
    }

    #[test]
    fn test_exact_record_is_correct() {
        assert!(GuessRecord::new("sea".to_string(), 1, Player::Human, String::new()).is_correct);
        assert!(!GuessRecord::new("ocean".to_string(), 42, Player::Human, String::new()).is_correct);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Exact < Tier::Band(0));
        assert!(Tier::Band(10) < Tier::Band(90));
    }

    #[test]
    fn test_player_wire_names() {
        assert_eq!(serde_json::to_string(&Player::Ai).unwrap(), "\"ai\"");
        assert_eq!(
            serde_json::from_str::<Player>("\"human\"").unwrap(),
            Player::Human
        );
    }
}
