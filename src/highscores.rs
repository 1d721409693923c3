//! High score leaderboard system
//!
//! Persisted under a single storage key, tracks the top 10 scores.
//! Entries are decoded one by one, so a single malformed entry written by an
//! older page does not cost the rest of the board.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::consts::{LEADERBOARD_KEY, MAX_HIGH_SCORES};
use crate::difficulty::Difficulty;
use crate::platform::storage::{self, KvStore, StorageError};

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's name (`null` from a cancelled prompt reads as empty)
    #[serde(default, deserialize_with = "name_or_empty")]
    pub name: String,
    /// Computed round score; negative or fractional stored values are clamped
    #[serde(deserialize_with = "clamped_score")]
    pub score: u64,
    /// Elapsed time in seconds
    pub time: f64,
    /// Number of elements sorted
    pub elements: u32,
    /// Tier the round was played at
    pub difficulty: Difficulty,
}

fn name_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn clamped_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    if raw.is_finite() && raw > 0.0 {
        Ok(raw.round() as u64)
    } else {
        Ok(0)
    }
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "Vec<Value>", into = "Vec<HighScoreEntry>")]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl From<Vec<Value>> for HighScores {
    fn from(values: Vec<Value>) -> Self {
        let mut scores = Self::new();
        for value in values {
            match serde_json::from_value(value) {
                Ok(entry) => scores.entries.push(entry),
                Err(e) => log::warn!("Dropping malformed high score entry: {}", e),
            }
        }
        scores.normalize();
        scores
    }
}

impl From<HighScores> for Vec<HighScoreEntry> {
    fn from(scores: HighScores) -> Self {
        scores.entries
    }
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make it onto the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry still on the board
        self.entries
            .get(MAX_HIGH_SCORES - 1)
            .map(|e| score > e.score)
            .unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    ///
    /// Ties rank below the entries already on the board.
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        let rank = rank.unwrap_or(self.entries.len()) + 1;
        (rank <= MAX_HIGH_SCORES).then_some(rank)
    }

    /// Append an entry, re-sort and trim to the maximum size.
    /// Returns the rank achieved (1-indexed) or None if it fell off the board.
    pub fn add_score(&mut self, entry: HighScoreEntry) -> Option<usize> {
        self.normalize();
        let rank = self.potential_rank(entry.score);

        self.entries.push(entry);
        self.normalize();

        rank
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Stable sort, so equal scores keep their insertion order, then trim
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Load the leaderboard; missing or corrupt data is an empty board
    pub fn load<S: KvStore + ?Sized>(store: &S) -> Result<Self, StorageError> {
        match storage::load_json::<Self, _>(store, LEADERBOARD_KEY)? {
            Some(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                Ok(scores)
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Ok(Self::new())
            }
        }
    }

    pub fn save<S: KvStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        storage::save_json(store, LEADERBOARD_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Load, insert and persist a score in one step
pub fn record_score<S: KvStore + ?Sized>(
    store: &S,
    entry: HighScoreEntry,
) -> Result<Option<usize>, StorageError> {
    let mut scores = HighScores::load(store)?;
    let rank = scores.add_score(entry);
    scores.save(store)?;
    Ok(rank)
}

/// Read the persisted leaderboard
pub fn leaderboard<S: KvStore + ?Sized>(store: &S) -> Result<HighScores, StorageError> {
    HighScores::load(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;
    use proptest::prelude::*;

    fn entry(name: &str, score: u64) -> HighScoreEntry {
        HighScoreEntry {
            name: name.to_string(),
            score,
            time: 12.5,
            elements: 10,
            difficulty: Difficulty::Medium,
        }
    }

    fn scores(board: &HighScores) -> Vec<u64> {
        board.entries.iter().map(|e| e.score).collect()
    }

    #[test]
    fn test_eleven_increasing_scores_drop_lowest() {
        let store = MemoryStore::new();
        for score in 1..=11 {
            record_score(&store, entry("p", score)).unwrap();
        }
        let board = leaderboard(&store).unwrap();
        assert_eq!(scores(&board), (2..=11).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_rank_reporting() {
        let mut board = HighScores::new();
        assert_eq!(board.add_score(entry("a", 100)), Some(1));
        assert_eq!(board.add_score(entry("b", 300)), Some(1));
        assert_eq!(board.add_score(entry("c", 200)), Some(2));
        assert_eq!(board.top_score(), Some(300));

        for i in 0..7 {
            board.add_score(entry("filler", 400 + i));
        }
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        // Lowest on the board is 100; a tie does not qualify
        assert!(!board.qualifies(100));
        assert_eq!(board.add_score(entry("late", 100)), None);
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.potential_rank(250), Some(9));
    }

    #[test]
    fn test_ties_keep_earlier_entry_first() {
        let mut board = HighScores::new();
        board.add_score(entry("first", 50));
        assert_eq!(board.add_score(entry("second", 50)), Some(2));
        assert_eq!(board.entries[0].name, "first");
        assert_eq!(board.entries[1].name, "second");
    }

    #[test]
    fn test_stored_format() {
        let store = MemoryStore::new();
        record_score(
            &store,
            HighScoreEntry {
                name: "Ana".to_string(),
                score: 1200,
                time: 5.0,
                elements: 10,
                difficulty: Difficulty::Hard,
            },
        )
        .unwrap();
        let raw = store.get_item(LEADERBOARD_KEY).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"name":"Ana","score":1200,"time":5.0,"elements":10,"difficulty":999}]"#
        );
    }

    #[test]
    fn test_reads_page_written_data() {
        let store = MemoryStore::new();
        store
            .set_item(
                LEADERBOARD_KEY,
                r#"[{"name":"Zoé","score":80,"time":12,"elements":5,"difficulty":50}]"#,
            )
            .unwrap();
        let board = leaderboard(&store).unwrap();
        assert_eq!(board.entries[0].name, "Zoé");
        assert_eq!(board.entries[0].difficulty, Difficulty::Easy);
        assert_eq!(board.entries[0].time, 12.0);
    }

    #[test]
    fn test_corrupt_data_is_empty_and_gets_replaced() {
        let store = MemoryStore::new();
        store.set_item(LEADERBOARD_KEY, "oops").unwrap();
        assert!(leaderboard(&store).unwrap().is_empty());

        record_score(&store, entry("a", 10)).unwrap();
        assert_eq!(scores(&leaderboard(&store).unwrap()), vec![10]);
    }

    #[test]
    fn test_quota_failure_is_reported() {
        let store = MemoryStore::with_quota(16);
        let err = record_score(&store, entry("a", 10)).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert!(leaderboard(&store).unwrap().is_empty());
    }

    #[test]
    fn test_unsorted_stored_board_is_normalized() {
        let store = MemoryStore::new();
        let unsorted = HighScores {
            entries: vec![entry("low", 1), entry("high", 9)],
        };
        storage::save_json(&store, LEADERBOARD_KEY, &unsorted).unwrap();
        assert_eq!(record_score(&store, entry("mid", 5)).unwrap(), Some(2));
        assert_eq!(scores(&leaderboard(&store).unwrap()), vec![9, 5, 1]);
    }

    #[test]
    fn test_reads_are_idempotent() {
        let store = MemoryStore::new();
        record_score(&store, entry("a", 3)).unwrap();
        record_score(&store, entry("b", 7)).unwrap();
        assert_eq!(leaderboard(&store).unwrap(), leaderboard(&store).unwrap());
    }

    #[test]
    fn test_bad_entry_does_not_cost_the_board() {
        let store = MemoryStore::new();
        store
            .set_item(
                LEADERBOARD_KEY,
                r#"[{"name":"Ana","score":900,"time":4,"elements":12,"difficulty":999},
                    {"name":null,"score":50,"time":9,"elements":5,"difficulty":50},
                    {"name":"Neg","score":-40,"time":30,"elements":3,"difficulty":100},
                    {"score":"lots"}]"#,
            )
            .unwrap();

        let before = leaderboard(&store).unwrap();
        assert_eq!(scores(&before), vec![900, 50, 0]);
        assert_eq!(before.entries[1].name, "");

        assert_eq!(record_score(&store, entry("Bo", 10)).unwrap(), Some(3));
        let after = leaderboard(&store).unwrap();
        assert_eq!(scores(&after), vec![900, 50, 10, 0]);
        assert_eq!(after.entries[0].name, "Ana");
    }

    #[test]
    fn test_oversized_stored_board_is_trimmed() {
        let store = MemoryStore::new();
        let oversized = HighScores {
            entries: (1..=12).rev().map(|i| entry("old", i * 10)).collect(),
        };
        storage::save_json(&store, LEADERBOARD_KEY, &oversized).unwrap();

        let board = leaderboard(&store).unwrap();
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(30));

        // 15 would have ranked 12th on the untrimmed board
        assert_eq!(record_score(&store, entry("x", 15)).unwrap(), None);
        let board = leaderboard(&store).unwrap();
        assert!(board.entries.iter().all(|e| e.name != "x"));
        assert_eq!(board.len(), MAX_HIGH_SCORES);
    }

    #[test]
    fn test_oversized_board_in_memory_reports_no_rank() {
        let mut board = HighScores {
            entries: (1..=12).rev().map(|i| entry("old", i * 10)).collect(),
        };
        assert_eq!(board.potential_rank(15), None);
        assert_eq!(board.add_score(entry("x", 15)), None);
        assert_eq!(board.add_score(entry("y", 35)), Some(10));
        assert_eq!(board.len(), MAX_HIGH_SCORES);
    }

    proptest! {
        #[test]
        fn prop_bounded_and_sorted(pushes in proptest::collection::vec(0u64..10_000, 0..40)) {
            let store = MemoryStore::new();
            for score in pushes {
                record_score(&store, entry("p", score)).unwrap();
                let board = leaderboard(&store).unwrap();
                prop_assert!(board.len() <= MAX_HIGH_SCORES);
                prop_assert!(board.entries.windows(2).all(|w| w[0].score >= w[1].score));
            }
        }
    }
}
