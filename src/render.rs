//! List rendering for the leaderboard and achievement panels
//!
//! The page supplies a [`ListView`]; this module only decides what lines go
//! into it.

use crate::achievements::Achievements;
use crate::highscores::{HighScoreEntry, HighScores};

/// A list element on the page plus its (optionally hidden) container
pub trait ListView {
    fn clear(&mut self);
    fn append_item(&mut self, text: &str);
    /// Un-hide the surrounding container, if there is one
    fn reveal(&mut self);
}

/// One leaderboard line, e.g. `Ana - 1200 pts (5s, 10 éléments, Difficile)`
pub fn leaderboard_line(entry: &HighScoreEntry) -> String {
    format!(
        "{} - {} pts ({}s, {} éléments, {})",
        entry.name,
        entry.score,
        entry.time,
        entry.elements,
        entry.difficulty.label()
    )
}

pub fn render_leaderboard<V: ListView + ?Sized>(view: &mut V, scores: &HighScores) {
    view.clear();
    for entry in &scores.entries {
        view.append_item(&leaderboard_line(entry));
    }
    view.reveal();
}

pub fn render_achievements<V: ListView + ?Sized>(view: &mut V, achievements: &Achievements) {
    view.clear();
    for badge in achievements.badges() {
        view.append_item(badge.label());
    }
    view.reveal();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;

    #[derive(Default)]
    struct RecordingView {
        items: Vec<String>,
        revealed: bool,
    }

    impl ListView for RecordingView {
        fn clear(&mut self) {
            self.items.clear();
        }

        fn append_item(&mut self, text: &str) {
            self.items.push(text.to_string());
        }

        fn reveal(&mut self) {
            self.revealed = true;
        }
    }

    #[test]
    fn test_leaderboard_lines() {
        let mut scores = HighScores::new();
        scores.add_score(HighScoreEntry {
            name: "Ana".to_string(),
            score: 1200,
            time: 5.0,
            elements: 10,
            difficulty: Difficulty::Hard,
        });
        scores.add_score(HighScoreEntry {
            name: "Léo".to_string(),
            score: 80,
            time: 12.5,
            elements: 5,
            difficulty: Difficulty::Easy,
        });

        let mut view = RecordingView {
            items: vec!["stale".to_string()],
            revealed: false,
        };
        render_leaderboard(&mut view, &scores);
        assert_eq!(
            view.items,
            vec![
                "Ana - 1200 pts (5s, 10 éléments, Difficile)".to_string(),
                "Léo - 80 pts (12.5s, 5 éléments, Facile)".to_string(),
            ]
        );
        assert!(view.revealed);
    }

    #[test]
    fn test_achievement_lines() {
        let mut ach = Achievements::new();
        let mut view = RecordingView::default();
        render_achievements(&mut view, &ach);
        assert!(view.items.is_empty());

        ach.record_round(30.0, Difficulty::Hard);
        render_achievements(&mut view, &ach);
        assert_eq!(
            view.items,
            vec!["🏅 First perfect round", "🔥 Max difficulty completed"]
        );
    }
}
