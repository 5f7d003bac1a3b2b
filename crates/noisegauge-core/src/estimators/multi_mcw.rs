//! MultiMCW prediction estimate (SP 800-90B 6.3.7).
//!
//! Four sliding-window predictors, each guessing the most common symbol in
//! its trailing window (ties to the most recently seen). The reported
//! estimate is the worst case: the window size that makes the source look
//! most predictable.

use super::predictor::{predictor_entropy, PredictorScore};

/// Window sizes of the four subpredictors.
const WINDOWS: [usize; 4] = [63, 255, 1023, 4095];

/// MultiMCW estimate over any alphabet; worst case across the four windows.
pub fn multi_mcw_estimate(symbols: &[u8], alph_size: usize) -> Option<f64> {
    if alph_size < 2 {
        return None;
    }
    WINDOWS
        .iter()
        .filter_map(|&w| window_score(symbols, w, alph_size))
        .filter_map(|score| predictor_entropy(&score, alph_size))
        .min_by(|a, b| a.total_cmp(b))
}

/// Run one most-common-in-window predictor; `None` when the sequence does
/// not outlast the window.
fn window_score(symbols: &[u8], window: usize, alph_size: usize) -> Option<PredictorScore> {
    let n = symbols.len();
    if n <= window {
        return None;
    }

    let mut counts = vec![0u32; alph_size];
    let mut last_seen = vec![0usize; alph_size];
    for (i, &s) in symbols[..window].iter().enumerate() {
        counts[s as usize] += 1;
        last_seen[s as usize] = i;
    }
    let mut leader = rescan(&counts, &last_seen);

    let mut score = PredictorScore::default();
    for i in window..n {
        let s = symbols[i];
        score.record(s == leader);

        // Slide the window: admit symbols[i], evict symbols[i - window].
        counts[s as usize] += 1;
        last_seen[s as usize] = i;
        if counts[s as usize] >= counts[leader as usize] {
            // Ties go to the newest arrival.
            leader = s;
        }
        let evicted = symbols[i - window];
        counts[evicted as usize] -= 1;
        if evicted == leader {
            leader = rescan(&counts, &last_seen);
        }
    }
    Some(score)
}

/// Most common symbol, ties broken by most recent occurrence.
fn rescan(counts: &[u32], last_seen: &[usize]) -> u8 {
    let mut best = 0usize;
    for s in 1..counts.len() {
        if counts[s] > counts[best]
            || (counts[s] == counts[best] && last_seen[s] > last_seen[best])
        {
            best = s;
        }
    }
    best as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lcg_bytes(n: usize, alph: u64, seed: u64) -> Vec<u8> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) % alph) as u8
            })
            .collect()
    }

    #[test]
    fn constant_tail_is_fully_predicted() {
        let data = vec![3u8; 50_000];
        let mut with_noise = lcg_bytes(100, 4, 5);
        with_noise.extend_from_slice(&data);
        let h = multi_mcw_estimate(&with_noise, 4).unwrap();
        assert!(h < 0.01, "h = {h}");
    }

    #[test]
    fn uniform_bytes_score_high() {
        let data = lcg_bytes(60_000, 256, 21);
        let h = multi_mcw_estimate(&data, 256).unwrap();
        assert!(h > 7.0, "h = {h}");
    }

    #[test]
    fn mostly_constant_with_bursts_scores_low() {
        // A heavy mode the window predictor locks onto.
        let data: Vec<u8> = lcg_bytes(50_000, 100, 9)
            .into_iter()
            .map(|v| if v < 90 { 0 } else { v })
            .collect();
        let h = multi_mcw_estimate(&data, 100).unwrap();
        assert!(h < 0.4, "h = {h}");
    }

    #[test]
    fn window_shorter_sequences_are_skipped() {
        // 100 symbols: only the 63-window subpredictor can run.
        let data = lcg_bytes(100, 2, 2);
        assert!(multi_mcw_estimate(&data, 2).is_some());
        assert!(multi_mcw_estimate(&data[..50], 2).is_none());
    }

    #[test]
    fn recency_breaks_count_ties() {
        let counts = [2u32, 2, 1];
        let last_seen = [10usize, 20, 5];
        assert_eq!(rescan(&counts, &last_seen), 1);
    }
}
