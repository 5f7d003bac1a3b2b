//! Most Common Value estimate (SP 800-90B 6.3.1).
//!
//! The frequency of the modal symbol, pushed up to its 99.5% upper
//! confidence bound, gives a conservative ceiling on the most likely
//! symbol's probability; min-entropy is its negative log.

use super::upper_probability_bound;

/// Most Common Value estimate over any alphabet.
pub fn mcv_estimate(symbols: &[u8], alph_size: usize) -> Option<f64> {
    let n = symbols.len();
    if n < 2 || alph_size < 2 {
        return None;
    }

    let mut counts = vec![0u64; alph_size];
    for &s in symbols {
        counts[s as usize] += 1;
    }
    let mode = counts.iter().copied().max().unwrap_or(0);

    let p_hat = mode as f64 / n as f64;
    let p_upper = upper_probability_bound(p_hat, n);
    Some(-p_upper.log2())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_binary_is_close_to_one_bit() {
        let data: Vec<u8> = (0..100_000).map(|i| (i / 3 % 2) as u8).collect();
        let h = mcv_estimate(&data, 2).unwrap();
        assert!(h > 0.95 && h <= 1.0, "h = {h}");
    }

    #[test]
    fn skewed_source_scores_low() {
        // 90% zeros.
        let data: Vec<u8> = (0..10_000).map(|i| u8::from(i % 10 == 0)).collect();
        let h = mcv_estimate(&data, 2).unwrap();
        assert!(h < 0.2, "h = {h}");
    }

    #[test]
    fn stays_within_alphabet_ceiling() {
        let data: Vec<u8> = (0..65_536u32).map(|i| (i % 256) as u8).collect();
        let h = mcv_estimate(&data, 256).unwrap();
        assert!(h >= 0.0 && h <= 8.0);
        // Exactly uniform counts; the confidence bound costs ~0.2 bits here.
        assert!(h > 7.75, "h = {h}");
    }

    #[test]
    fn tiny_input_gives_nothing() {
        assert!(mcv_estimate(&[0], 2).is_none());
    }
}
