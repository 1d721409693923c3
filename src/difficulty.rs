//! Difficulty tiers
//!
//! Stored as the numeric codes the game pages use (50, 100, 999).

use serde::{Deserialize, Serialize};

/// Game difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(from = "u16", into = "u16")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Score multiplier for this tier
    pub fn multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 2.0,
            Difficulty::Hard => 3.0,
        }
    }

    /// Numeric code persisted in storage
    pub fn code(self) -> u16 {
        match self {
            Difficulty::Easy => 50,
            Difficulty::Medium => 100,
            Difficulty::Hard => 999,
        }
    }

    /// Label shown on the difficulty buttons
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Facile",
            Difficulty::Medium => "Moyen",
            Difficulty::Hard => "Difficile",
        }
    }

    /// Parse a button label; anything unrecognized is the hardest tier
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Facile" => Difficulty::Easy,
            "Moyen" => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }

    pub fn is_hardest(self) -> bool {
        self == Difficulty::Hard
    }
}

impl From<u16> for Difficulty {
    fn from(code: u16) -> Self {
        match code {
            50 => Difficulty::Easy,
            100 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }
}

impl From<Difficulty> for u16 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_json() {
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "999");
        let d: Difficulty = serde_json::from_str("100").unwrap();
        assert_eq!(d, Difficulty::Medium);
    }

    #[test]
    fn test_unknown_code_is_hard() {
        assert_eq!(Difficulty::from(7), Difficulty::Hard);
        assert_eq!(Difficulty::from_label("Expert"), Difficulty::Hard);
        assert_eq!(Difficulty::from_label(" Moyen "), Difficulty::Medium);
    }

    #[test]
    fn test_multipliers_increase() {
        assert!(Difficulty::Easy.multiplier() < Difficulty::Medium.multiplier());
        assert!(Difficulty::Medium.multiplier() < Difficulty::Hard.multiplier());
    }
}
