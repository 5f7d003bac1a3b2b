//! MultiMMC prediction estimate (SP 800-90B 6.3.9).
//!
//! Sixteen Markov-model-with-counting subpredictors of orders 1 through 16.
//! Each maps every observed context of its order to a successor frequency
//! table and predicts the most frequent successor (ties to the most recently
//! updated). The reported estimate is the worst case over the orders.

use std::collections::HashMap;

use super::predictor::{most_frequent, predictor_entropy, PredictorScore, SuccessorCell};

/// Highest context order tried.
const MAX_ORDER: usize = 16;
/// Cap on tracked contexts per order; new contexts beyond it are ignored.
const MAX_CONTEXTS: usize = 1_000_000;

/// MultiMMC estimate over any alphabet; worst case across orders 1..=16.
pub fn multi_mmc_estimate(symbols: &[u8], alph_size: usize) -> Option<f64> {
    if alph_size < 2 {
        return None;
    }
    (1..=MAX_ORDER)
        .filter_map(|order| order_score(symbols, order))
        .filter_map(|score| predictor_entropy(&score, alph_size))
        .min_by(|a, b| a.total_cmp(b))
}

/// Run one fixed-order MMC predictor; `None` when the sequence is not
/// longer than the order.
fn order_score(symbols: &[u8], order: usize) -> Option<PredictorScore> {
    let n = symbols.len();
    if n <= order {
        return None;
    }

    // Contexts are at most 16 symbols of 8 bits: a rolling u128 key.
    let mask: u128 = if order == MAX_ORDER {
        u128::MAX
    } else {
        (1u128 << (8 * order)) - 1
    };
    let mut ctx: u128 = 0;
    for &s in &symbols[..order] {
        ctx = (ctx << 8) | u128::from(s);
    }
    ctx &= mask;

    let mut model: HashMap<u128, HashMap<u8, SuccessorCell>> = HashMap::new();
    let mut score = PredictorScore::default();

    for i in order..n {
        let s = symbols[i];

        let predicted = model.get(&ctx).and_then(most_frequent);
        score.record(predicted == Some(s));

        match model.get_mut(&ctx) {
            Some(successors) => {
                let cell = successors
                    .entry(s)
                    .or_insert(SuccessorCell { count: 0, last: 0 });
                cell.count += 1;
                cell.last = i as u64;
            }
            None => {
                if model.len() < MAX_CONTEXTS {
                    let mut successors = HashMap::new();
                    successors.insert(s, SuccessorCell { count: 1, last: i as u64 });
                    model.insert(ctx, successors);
                }
            }
        }

        ctx = ((ctx << 8) | u128::from(s)) & mask;
    }
    Some(score)
}
