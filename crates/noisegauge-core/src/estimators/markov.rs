//! Markov estimate (SP 800-90B 6.3.3, binary sequences only).
//!
//! Fits a first-order two-state chain by maximum likelihood, then finds the
//! most probable 128-symbol path through it; the per-symbol min-entropy is
//! the path's negative log-probability divided by 128, clamped to one bit.

/// Number of symbols on the scored path.
const PATH_LENGTH: usize = 128;

/// Markov estimate over a binary sequence.
pub fn markov_estimate(bits: &[u8]) -> Option<f64> {
    let n = bits.len();
    if n < 2 {
        return None;
    }

    let ones = bits.iter().map(|&b| u64::from(b)).sum::<u64>();
    let init = [
        (n as u64 - ones) as f64 / n as f64,
        ones as f64 / n as f64,
    ];

    let mut pair = [[0u64; 2]; 2];
    for w in bits.windows(2) {
        pair[w[0] as usize][w[1] as usize] += 1;
    }
    let mut trans = [[0.0f64; 2]; 2];
    for i in 0..2 {
        let row = pair[i][0] + pair[i][1];
        if row > 0 {
            trans[i][0] = pair[i][0] as f64 / row as f64;
            trans[i][1] = pair[i][1] as f64 / row as f64;
        }
    }

    // Highest-probability path, log2 domain; -inf marks impossible branches.
    let log2 = |p: f64| if p > 0.0 { p.log2() } else { f64::NEG_INFINITY };
    let mut best = [log2(init[0]), log2(init[1])];
    for _ in 1..PATH_LENGTH {
        best = [
            (best[0] + log2(trans[0][0])).max(best[1] + log2(trans[1][0])),
            (best[0] + log2(trans[0][1])).max(best[1] + log2(trans[1][1])),
        ];
    }

    let max_log = best[0].max(best[1]);
    if !max_log.is_finite() {
        return None;
    }
    Some((-max_log / PATH_LENGTH as f64).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lcg_bits(n: usize, seed: u64) -> Vec<u8> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) & 1) as u8
            })
            .collect()
    }

    #[test]
    fn alternating_sequence_is_fully_predictable() {
        let data: Vec<u8> = (0..100_000).map(|i| (i % 2) as u8).collect();
        let h = markov_estimate(&data).unwrap();
        // P(0->1) = P(1->0) = 1; only the initial symbol costs anything.
        assert!(h < 0.01, "h = {h}");
    }

    #[test]
    fn unbiased_bits_score_near_one() {
        let h = markov_estimate(&lcg_bits(200_000, 3)).unwrap();
        assert!(h > 0.95 && h <= 1.0, "h = {h}");
    }

    #[test]
    fn sticky_chain_scores_low() {
        // Long runs: stay in the same state 95% of the time.
        let mut state = 0xabcdefu64;
        let mut bit = 0u8;
        let data: Vec<u8> = (0..100_000)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                if (state >> 33) % 100 < 5 {
                    bit ^= 1;
                }
                bit
            })
            .collect();
        let h = markov_estimate(&data).unwrap();
        assert!(h < 0.2, "h = {h}");
    }

    #[test]
    fn deterministic_on_identical_input() {
        let bits = lcg_bits(10_000, 44);
        assert_eq!(markov_estimate(&bits), markov_estimate(&bits.clone()));
    }

    #[test]
    fn too_short_input_gives_nothing() {
        assert!(markov_estimate(&[1]).is_none());
    }
}
