//! BrainSort - shared helpers for the sorting/memory game pages
//!
//! Core modules:
//! - `scoring`: Round score from time, element count and difficulty
//! - `highscores`: Top-10 leaderboard
//! - `achievements`: Milestone flags and counters
//! - `preferences`: Saved UI toggle state
//! - `theme`: Light/dark/random color themes
//! - `controls`: Settings controls, next badge and hint highlighting
//! - `render`: Leaderboard/achievement lists behind a view trait
//! - `cache`: Offline asset cache worker
//! - `platform`: Storage abstraction and browser implementations

pub mod achievements;
pub mod cache;
pub mod controls;
pub mod difficulty;
pub mod highscores;
pub mod platform;
pub mod preferences;
pub mod render;
pub mod scoring;
pub mod theme;

#[cfg(target_arch = "wasm32")]
mod bindings;

pub use achievements::{Achievements, Badge, achievements, record_round};
pub use difficulty::Difficulty;
pub use highscores::{HighScoreEntry, HighScores, leaderboard, record_score};
pub use platform::{KvStore, MemoryStore, StorageError};
pub use preferences::{Preferences, load_preferences, save_preferences};
pub use scoring::compute_score;
pub use theme::{Theme, ThemeMode, compute_theme};

/// Configuration constants
pub mod consts {
    /// LocalStorage keys shared with the game pages
    pub const PREFERENCES_KEY: &str = "brainSortPrefs";
    pub const LEADERBOARD_KEY: &str = "brainSortLeaderboard";
    pub const ACHIEVEMENTS_KEY: &str = "brainSortAchievements";

    /// Maximum number of high scores to keep
    pub const MAX_HIGH_SCORES: usize = 10;

    /// Score formula
    pub const BASE_SCORE: f64 = 100.0;
    /// Element count that scores a 1x multiplier
    pub const REFERENCE_ELEMENTS: f64 = 5.0;
    /// Round time that scores a 1x multiplier
    pub const REFERENCE_SECONDS: f64 = 10.0;
    /// Shorter (or invalid) times are clamped to this
    pub const MIN_ELAPSED_SECONDS: f64 = 0.1;

    /// A round at or under this many seconds counts as fast
    pub const FAST_ROUND_SECONDS: f64 = 10.0;
    /// Fast rounds needed for the badge
    pub const FAST_ROUNDS_FOR_BADGE: u32 = 5;
}
