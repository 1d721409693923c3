//! A page's view of a few rounds against one shared store

use brainsort::consts::{ACHIEVEMENTS_KEY, LEADERBOARD_KEY, PREFERENCES_KEY};
use brainsort::{
    Badge, Difficulty, HighScoreEntry, KvStore, MemoryStore, Preferences, achievements,
    compute_score, leaderboard, load_preferences, record_round, record_score, save_preferences,
};

fn finish_round(store: &MemoryStore, name: &str, time: f64, elements: u32, difficulty: Difficulty) -> u64 {
    let score = compute_score(time, elements, difficulty);
    record_score(
        store,
        HighScoreEntry {
            name: name.to_string(),
            score,
            time,
            elements,
            difficulty,
        },
    )
    .unwrap();
    record_round(store, time, difficulty).unwrap();
    score
}

#[test]
fn test_rounds_update_board_and_badges() {
    let store = MemoryStore::new();
    let first = finish_round(&store, "Ana", 10.0, 5, Difficulty::Easy);
    let second = finish_round(&store, "Ana", 5.0, 10, Difficulty::Hard);
    assert_eq!((first, second), (100, 1200));

    let board = leaderboard(&store).unwrap();
    assert_eq!(board.top_score(), Some(1200));
    assert_eq!(board.entries[1].difficulty, Difficulty::Easy);

    let ach = achievements(&store).unwrap();
    assert_eq!(ach.fast_rounds(), 2);
    assert_eq!(ach.badges(), vec![Badge::FirstPerfect, Badge::MaxDifficulty]);
}

#[test]
fn test_records_are_stored_independently() {
    let store = MemoryStore::new();
    save_preferences(
        &store,
        &Preferences {
            helper_enabled: Some(true),
            ..Default::default()
        },
    )
    .unwrap();
    finish_round(&store, "Léo", 30.0, 8, Difficulty::Medium);

    // Corrupting one record leaves the others readable
    store.set_item(LEADERBOARD_KEY, "not json").unwrap();
    assert!(leaderboard(&store).unwrap().is_empty());
    assert!(achievements(&store).unwrap().first_perfect());
    assert_eq!(load_preferences(&store).unwrap().unwrap().helper_enabled, Some(true));

    for key in [PREFERENCES_KEY, ACHIEVEMENTS_KEY] {
        assert!(store.get_item(key).unwrap().is_some());
    }
}
