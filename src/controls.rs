//! Page control synchronization
//!
//! Maps [`Preferences`] to and from the settings controls shared by the game
//! pages, and drives the "next element" badge and hint highlighting. The page
//! supplies a [`PageControls`]; controls a page does not have are skipped.

use crate::difficulty::Difficulty;
use crate::preferences::{OddEvenOrder, Parity, Preferences};

/// Element ids and selectors of the shared controls
pub mod ids {
    pub const HELPER_TOGGLE: &str = "helperToggle";
    pub const ODD_EVEN_TOGGLE: &str = "oddEvenToggle";
    pub const INVERT_PAIRS_TOGGLE: &str = "invertPairsToggle";
    pub const ORDER_TOGGLE: &str = "orderToggle";
    pub const ORDER_LABEL: &str = "orderLabel";
    pub const MODE_ODDS_THEN_EVENS: &str = "oddEvenMode_oddsThenEvens";
    pub const MODE_ALTERNATE: &str = "oddEvenMode_alternate";
    pub const START_ODD: &str = "oddEvenStart_odd";
    pub const START_EVEN: &str = "oddEvenStart_even";

    pub const THEME_CARDS: &str = ".theme-card";
    pub const NUMBER_OPTIONS: &str = ".option-btn";
    pub const DIFFICULTY_BUTTONS: &str = ".difficulty-btn";
    /// Default selector for the sortable element buttons
    pub const ELEMENT_BUTTONS: &str = ".number";
}

/// Classes marking the selected theme card
pub const THEME_SELECTED: &[&str] = &["ring-4", "ring-blue-500"];
/// Classes marking a selected option button
pub const OPTION_SELECTED: &[&str] = &["ring-2", "ring-blue-500"];
/// Classes marking the expected next element
pub const HINT_HIGHLIGHT: &[&str] = &["ring-4", "ring-yellow-400", "animate-pulse"];

/// The page's form controls
pub trait PageControls {
    fn exists(&self, id: &str) -> bool;
    /// Checked state of a checkbox or radio, `None` if the page lacks it
    fn checked(&self, id: &str) -> Option<bool>;
    fn set_checked(&mut self, id: &str, checked: bool);
    fn set_text(&mut self, id: &str, text: &str);
    fn set_hidden(&mut self, id: &str, hidden: bool);
    /// Trimmed text of the first `selector` element carrying any of `marks`
    fn marked_text(&self, selector: &str, marks: &[&str]) -> Option<String>;
    /// Remove `marks` from every `selector` element, then add them to those
    /// whose trimmed text satisfies `matches`
    fn mark_where(&mut self, selector: &str, marks: &[&str], matches: &dyn Fn(&str) -> bool);
}

/// Push saved preferences into the page's controls
pub fn apply_preferences<P: PageControls + ?Sized>(page: &mut P, prefs: &Preferences) {
    let toggles = [
        (ids::HELPER_TOGGLE, prefs.helper_enabled),
        (ids::ODD_EVEN_TOGGLE, prefs.odd_even_mode),
        (ids::INVERT_PAIRS_TOGGLE, prefs.invert_pairs),
        (ids::ORDER_TOGGLE, prefs.ascending_order),
    ];
    for (id, value) in toggles {
        if let Some(value) = value {
            if page.exists(id) {
                page.set_checked(id, value);
            }
        }
    }
    if page.exists(ids::ORDER_TOGGLE) {
        if let Some(label) = prefs.order_label() {
            page.set_text(ids::ORDER_LABEL, label);
        }
    }

    // Radio pairs are only touched when both halves are present
    if let Some(order) = prefs.odd_even_mode_type {
        if page.exists(ids::MODE_ODDS_THEN_EVENS) && page.exists(ids::MODE_ALTERNATE) {
            page.set_checked(ids::MODE_ODDS_THEN_EVENS, order == OddEvenOrder::OddsThenEvens);
            page.set_checked(ids::MODE_ALTERNATE, order == OddEvenOrder::Alternate);
        }
    }
    if let Some(start) = prefs.odd_even_start {
        if page.exists(ids::START_ODD) && page.exists(ids::START_EVEN) {
            page.set_checked(ids::START_ODD, start == Parity::Odd);
            page.set_checked(ids::START_EVEN, start == Parity::Even);
        }
    }

    if let Some(theme) = &prefs.selected_theme {
        page.mark_where(ids::THEME_CARDS, THEME_SELECTED, &|text| {
            text.to_lowercase() == *theme
        });
    }
}

/// Read the current state of the page's controls
pub fn collect_preferences<P: PageControls + ?Sized>(page: &P) -> Preferences {
    let odd_even_mode_type = (page.exists(ids::MODE_ODDS_THEN_EVENS) || page.exists(ids::MODE_ALTERNATE))
        .then(|| match page.checked(ids::MODE_ALTERNATE) {
            Some(true) => OddEvenOrder::Alternate,
            _ => OddEvenOrder::OddsThenEvens,
        });
    let odd_even_start = (page.exists(ids::START_ODD) || page.exists(ids::START_EVEN))
        .then(|| match page.checked(ids::START_EVEN) {
            Some(true) => Parity::Even,
            _ => Parity::Odd,
        });

    Preferences {
        helper_enabled: page.checked(ids::HELPER_TOGGLE),
        odd_even_mode: page.checked(ids::ODD_EVEN_TOGGLE),
        invert_pairs: page.checked(ids::INVERT_PAIRS_TOGGLE),
        ascending_order: page.checked(ids::ORDER_TOGGLE),
        odd_even_mode_type,
        odd_even_start,
        selected_theme: page
            .marked_text(ids::THEME_CARDS, THEME_SELECTED)
            .map(|t| t.to_lowercase()),
        selected_num: page.marked_text(ids::NUMBER_OPTIONS, OPTION_SELECTED),
        selected_diff: page
            .marked_text(ids::DIFFICULTY_BUTTONS, OPTION_SELECTED)
            .map(|label| Difficulty::from_label(&label)),
    }
}

/// Show the "next" badge with `value`; needs both elements on the page
pub fn show_next_badge<P: PageControls + ?Sized>(page: &mut P, badge_id: &str, number_id: &str, value: &str) {
    if !page.exists(badge_id) || !page.exists(number_id) {
        return;
    }
    page.set_text(number_id, value);
    page.set_hidden(badge_id, false);
}

pub fn hide_next_badge<P: PageControls + ?Sized>(page: &mut P, badge_id: &str) {
    if page.exists(badge_id) {
        page.set_hidden(badge_id, true);
    }
}

/// Label of the element expected at `expected_index` in the sorted order
pub fn expected_label(expected_index: i64, sorted: &[String]) -> Option<&str> {
    let index = usize::try_from(expected_index).ok()?;
    sorted.get(index).map(String::as_str)
}

/// Highlight the buttons showing the next expected element, clearing any
/// previous highlight. An out-of-range index only clears.
pub fn highlight_expected<P: PageControls + ?Sized>(
    page: &mut P,
    button_selector: Option<&str>,
    expected_index: i64,
    sorted: &[String],
) {
    let selector = button_selector.unwrap_or(ids::ELEMENT_BUTTONS);
    let target = expected_label(expected_index, sorted);
    page.mark_where(selector, HINT_HIGHLIGHT, &|text| Some(text) == target);
}
