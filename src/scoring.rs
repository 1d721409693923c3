//! Round score calculation

use crate::consts::{BASE_SCORE, MIN_ELAPSED_SECONDS, REFERENCE_ELEMENTS, REFERENCE_SECONDS};
use crate::difficulty::Difficulty;

/// Score for a finished round.
///
/// `round(100 × difficulty × (1 + (n − 5)/5) × 10 / max(t, 0.1))`, floored
/// at zero for very small element counts.
pub fn compute_score(elapsed_seconds: f64, element_count: u32, difficulty: Difficulty) -> u64 {
    let elapsed = if elapsed_seconds.is_finite() {
        elapsed_seconds.max(MIN_ELAPSED_SECONDS)
    } else {
        MIN_ELAPSED_SECONDS
    };

    let element_multiplier = 1.0 + (element_count as f64 - REFERENCE_ELEMENTS) / REFERENCE_ELEMENTS;
    let speed_multiplier = REFERENCE_SECONDS / elapsed;
    let raw = BASE_SCORE * difficulty.multiplier() * element_multiplier * speed_multiplier;

    if raw <= 0.0 {
        return 0;
    }
    raw.round() as u64
}

/// Element count from an untyped number (JS callers).
///
/// Negative and NaN inputs become 0, fractions are dropped, and huge values
/// saturate.
pub fn element_count_from_f64(value: f64) -> u32 {
    // Float-to-int `as` saturates and maps NaN to 0
    value.trunc() as u32
}
