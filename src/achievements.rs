//! Achievement flags and counters
//!
//! Flags only ever flip on and counters only ever grow; the only mutation is
//! [`Achievements::record_round`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::{ACHIEVEMENTS_KEY, FAST_ROUND_SECONDS, FAST_ROUNDS_FOR_BADGE};
use crate::difficulty::Difficulty;
use crate::platform::storage::{self, KvStore, StorageError};

/// Unlockable badge, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    FirstPerfect,
    FastRounds,
    MaxDifficulty,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::FirstPerfect => "🏅 First perfect round",
            Badge::FastRounds => "⏱ 5 rounds under 10s",
            Badge::MaxDifficulty => "🔥 Max difficulty completed",
        }
    }
}

/// Persisted achievement mapping
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Achievements {
    #[serde(rename = "firstPerfect", default)]
    first_perfect: bool,
    #[serde(rename = "fiveUnder10", default)]
    fast_rounds: u32,
    #[serde(rename = "maxDifficulty", default)]
    max_difficulty: bool,
    /// Keys written by other versions of the pages, kept as-is
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Achievements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_perfect(&self) -> bool {
        self.first_perfect
    }

    /// Rounds finished within the fast-round time limit
    pub fn fast_rounds(&self) -> u32 {
        self.fast_rounds
    }

    pub fn max_difficulty(&self) -> bool {
        self.max_difficulty
    }

    /// Update flags and counters for a finished round.
    ///
    /// `firstPerfect` is set on every recorded round, whether or not the
    /// round was perfect.
    pub fn record_round(&mut self, elapsed_seconds: f64, difficulty: Difficulty) {
        self.first_perfect = true;
        if elapsed_seconds <= FAST_ROUND_SECONDS {
            self.fast_rounds = self.fast_rounds.saturating_add(1);
        }
        if difficulty.is_hardest() {
            self.max_difficulty = true;
        }
    }

    /// Badges unlocked so far
    pub fn badges(&self) -> Vec<Badge> {
        let mut badges = Vec::new();
        if self.first_perfect {
            badges.push(Badge::FirstPerfect);
        }
        if self.fast_rounds >= FAST_ROUNDS_FOR_BADGE {
            badges.push(Badge::FastRounds);
        }
        if self.max_difficulty {
            badges.push(Badge::MaxDifficulty);
        }
        badges
    }

    /// Load achievements; missing or corrupt data is the default mapping
    pub fn load<S: KvStore + ?Sized>(store: &S) -> Result<Self, StorageError> {
        Ok(storage::load_json(store, ACHIEVEMENTS_KEY)?.unwrap_or_default())
    }

    pub fn save<S: KvStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        storage::save_json(store, ACHIEVEMENTS_KEY, self)
    }
}

/// Load, update and persist achievements for a finished round
pub fn record_round<S: KvStore + ?Sized>(
    store: &S,
    elapsed_seconds: f64,
    difficulty: Difficulty,
) -> Result<Achievements, StorageError> {
    let mut achievements = Achievements::load(store)?;
    achievements.record_round(elapsed_seconds, difficulty);
    achievements.save(store)?;
    log::info!(
        "Achievements updated ({} fast rounds, {} badges)",
        achievements.fast_rounds,
        achievements.badges().len()
    );
    Ok(achievements)
}

/// Read the persisted achievements
pub fn achievements<S: KvStore + ?Sized>(store: &S) -> Result<Achievements, StorageError> {
    Achievements::load(store)
}
