//! Player preferences
//!
//! One record shared by all game pages. Every field is optional because each
//! page only saves the controls it has; saving replaces the whole record.

use serde::{Deserialize, Serialize};

use crate::consts::PREFERENCES_KEY;
use crate::difficulty::Difficulty;
use crate::platform::storage::{self, KvStore, StorageError};

/// How numbers are interleaved in odd/even mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum OddEvenOrder {
    #[default]
    OddsThenEvens,
    Alternate,
}

/// Which parity goes first in odd/even mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    Odd,
    Even,
}

/// Saved UI toggle state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Highlight the next expected element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odd_even_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invert_pairs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascending_order: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odd_even_mode_type: Option<OddEvenOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odd_even_start: Option<Parity>,
    /// Lowercase theme card name ("light", "dark", "random")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_theme: Option<String>,
    /// Label of the selected element-count button
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_num: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_diff: Option<Difficulty>,
}

impl Preferences {
    /// Label for the order toggle
    pub fn order_label(&self) -> Option<&'static str> {
        self.ascending_order
            .map(|asc| if asc { "Ascendant" } else { "Descendant" })
    }

    /// Load the last saved record, if any
    pub fn load<S: KvStore + ?Sized>(store: &S) -> Result<Option<Self>, StorageError> {
        let prefs = storage::load_json(store, PREFERENCES_KEY)?;
        if prefs.is_some() {
            log::info!("Loaded preferences");
        }
        Ok(prefs)
    }

    /// Replace the stored record
    pub fn save<S: KvStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        storage::save_json(store, PREFERENCES_KEY, self)?;
        log::info!("Preferences saved");
        Ok(())
    }
}

pub fn save_preferences<S: KvStore + ?Sized>(
    store: &S,
    prefs: &Preferences,
) -> Result<(), StorageError> {
    prefs.save(store)
}

pub fn load_preferences<S: KvStore + ?Sized>(store: &S) -> Result<Option<Preferences>, StorageError> {
    Preferences::load(store)
}
