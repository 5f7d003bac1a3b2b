//! Shared bookkeeping for the prediction-based estimators (SP 800-90B
//! 6.3.7 through 6.3.10).
//!
//! Every predictor variant walks the sequence emitting one prediction per
//! step and records whether it was right. The conversion to min-entropy is
//! identical for all of them: take the larger of the global hit-rate upper
//! confidence bound and the local bound implied by the longest streak of
//! correct predictions, floor it at chance level, and return its negative
//! log.

use std::collections::HashMap;

use super::upper_probability_bound;
use crate::numeric::bisect_monotone;

/// Successor frequency cell: occurrence count and the step of the latest
/// update, for the model-based predictors' recency tie-break.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SuccessorCell {
    pub count: u64,
    pub last: u64,
}

/// Most frequent successor, ties to the most recently updated.
pub(crate) fn most_frequent(successors: &HashMap<u8, SuccessorCell>) -> Option<u8> {
    successors
        .iter()
        .max_by_key(|(_, cell)| (cell.count, cell.last))
        .map(|(&s, _)| s)
}

/// Hit accounting for one predictor over its prediction range.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PredictorScore {
    pub predictions: u64,
    pub correct: u64,
    pub longest_run: u64,
    run: u64,
}

impl PredictorScore {
    pub fn record(&mut self, correct: bool) {
        self.predictions += 1;
        if correct {
            self.correct += 1;
            self.run += 1;
            if self.run > self.longest_run {
                self.longest_run = self.run;
            }
        } else {
            self.run = 0;
        }
    }
}

/// Convert a score to a min-entropy estimate over a `alph_size`-symbol
/// alphabet.
pub(crate) fn predictor_entropy(score: &PredictorScore, alph_size: usize) -> Option<f64> {
    let n = score.predictions;
    if n < 2 || alph_size < 2 {
        return None;
    }

    let p_global = score.correct as f64 / n as f64;
    let p_global = upper_probability_bound(p_global, n as usize);

    // A solver miss here means the streak carries no usable signal (for
    // example a perfect streak, where the global bound already saturates).
    let p_local = local_bound(score.longest_run, n).unwrap_or(0.0);

    let p = p_global.max(p_local).max(1.0 / alph_size as f64);
    Some(-p.log2())
}

/// Largest per-step success probability consistent with the observed longest
/// run: solves `P[no run of length maxrun + 1 in n steps] = 0.99` for `p`.
///
/// The no-run probability comes from the generating-function closed form
/// `(1 - p x) / ((r + 1 - r x) q) * x^-(n+1)` with `x` the root of
/// `x = 1 + q p^r x^(r+1)` near 1.
fn local_bound(longest_run: u64, n: u64) -> Option<f64> {
    let r = (longest_run + 1) as f64;
    let n = n as f64;
    let target = 0.99f64.ln();

    let ln_no_run = move |p: f64| {
        let q = 1.0 - p;
        let mut x = 1.0f64;
        for _ in 0..64 {
            x = 1.0 + q * p.powf(r) * x.powf(r + 1.0);
        }
        let numerator = 1.0 - p * x;
        if numerator <= 0.0 {
            return f64::NEG_INFINITY;
        }
        numerator.ln() - ((r + 1.0 - r * x) * q).ln() - (n + 1.0) * x.ln()
    };

    bisect_monotone(ln_no_run, 1e-9, 1.0 - 1e-9, target, 1e-10, 200)
}
