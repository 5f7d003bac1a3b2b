//! Lag prediction estimate (SP 800-90B 6.3.8).
//!
//! 128 subpredictors: the d-th one always guesses the symbol seen d steps
//! ago. All start at index 128 so their prediction ranges coincide; the
//! reported estimate is the worst case over d.

use super::predictor::{predictor_entropy, PredictorScore};

/// Largest lag tried, and the shared start index.
const MAX_LAG: usize = 128;

/// Lag estimate over any alphabet; worst case across lags 1..=128.
pub fn lag_estimate(symbols: &[u8], alph_size: usize) -> Option<f64> {
    let n = symbols.len();
    if n <= MAX_LAG || alph_size < 2 {
        return None;
    }

    let mut scores = [PredictorScore::default(); MAX_LAG];
    for i in MAX_LAG..n {
        let s = symbols[i];
        for (d, score) in scores.iter_mut().enumerate() {
            score.record(symbols[i - d - 1] == s);
        }
    }

    scores
        .iter()
        .filter_map(|score| predictor_entropy(score, alph_size))
        .min_by(|a, b| a.total_cmp(b))
}
