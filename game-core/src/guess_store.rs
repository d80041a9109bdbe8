use game_types::{GuessRecord, OrderedView, Player, RankedEntry};

use crate::RankScale;

/// Append-only guess history for one session.
///
/// Alongside insertion order the store keeps the presentation ordering
/// (ascending rank, ties by insertion), refreshed on every append.
#[derive(Debug, Clone, Default)]
pub struct GuessRecordStore {
    records: Vec<GuessRecord>,
    ranked: Vec<usize>,
}

impl GuessRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validation happens upstream; this never refuses a record.
    pub fn append(&mut self, record: GuessRecord) {
        let index = self.records.len();
        // Everything with an equal rank was inserted earlier, so it stays ahead.
        let position = self
            .ranked
            .partition_point(|&i| self.records[i].rank <= record.rank);
        self.records.push(record);
        self.ranked.insert(position, index);
    }

    /// Records in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &GuessRecord> + '_ {
        self.records.iter()
    }

    /// Records best rank first.
    pub fn presentation_order(&self) -> impl Iterator<Item = &GuessRecord> + '_ {
        self.ranked.iter().map(|&i| &self.records[i])
    }

    pub fn best_so_far(&self) -> Option<&GuessRecord> {
        self.ranked.first().map(|&i| &self.records[i])
    }

    pub fn by_player(&self, player: Player) -> impl Iterator<Item = &GuessRecord> + '_ {
        self.records.iter().filter(move |r| r.player == player)
    }

    /// `word` must already be normalized.
    pub fn has_guessed(&self, player: Player, word: &str) -> bool {
        self.by_player(player).any(|r| r.word == word)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn view(&self, scale: &RankScale) -> OrderedView {
        let entries = self
            .presentation_order()
            .map(|record| {
                let (tier, severity) = scale.classify(record.rank);
                RankedEntry {
                    record: record.clone(),
                    tier,
                    severity,
                }
            })
            .collect();

        OrderedView {
            entries,
            best: self.best_so_far().cloned(),
        }
    }
}
