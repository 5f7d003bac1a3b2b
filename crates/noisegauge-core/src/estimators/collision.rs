//! Collision estimate (SP 800-90B 6.3.2, binary sequences only).
//!
//! Walks the bit sequence recording the distance to each first repeated
//! value, lower-bounds the mean collision time, and inverts the expected
//! collision-time curve of the biased-coin family to recover the most
//! likely bit's probability.

use super::Z_ALPHA;
use crate::numeric::bisect_monotone;

/// Expected mean collision time for a binary source whose most likely bit
/// has probability `p`.
///
/// This is Eq. 6.3.2 with the incomplete-gamma factor reduced in closed
/// form: `F(q) = Gamma(3, 1/q) * q^-3 * e^(1/q) = 2q^3 + 2q^2 + q`.
/// Decreasing from 2.5 at p = 1/2 towards 2 as p -> 1.
fn expected_collision_time(p: f64) -> f64 {
    let q = 1.0 - p;
    if q <= 0.0 {
        return 2.0;
    }
    let f_q = q * (2.0 * q * q + 2.0 * q + 1.0);
    let diff = 1.0 / p - 1.0 / q;
    p * f_q / (q * q) * (1.0 + 0.5 * diff) - p / q * 0.5 * diff
}

/// Collision estimate over a binary sequence.
///
/// `None` when too few collisions occur or when the confidence-adjusted
/// mean falls outside the range of the expectation curve.
pub fn collision_estimate(bits: &[u8]) -> Option<f64> {
    let n = bits.len();

    // Each collision window over {0,1} closes after two or three samples.
    let mut distances: Vec<f64> = Vec::with_capacity(n / 2);
    let mut i = 0;
    while i + 1 < n {
        if bits[i] == bits[i + 1] {
            distances.push(2.0);
            i += 2;
        } else if i + 2 < n {
            distances.push(3.0);
            i += 3;
        } else {
            break;
        }
    }

    let v = distances.len();
    if v < 2 {
        return None;
    }

    let mean = distances.iter().sum::<f64>() / v as f64;
    let var = distances.iter().map(|&t| (t - mean).powi(2)).sum::<f64>() / (v as f64 - 1.0);
    let x_bar = mean - Z_ALPHA * var.sqrt() / (v as f64).sqrt();

    let p = bisect_monotone(
        expected_collision_time,
        0.5,
        1.0 - 1e-12,
        x_bar,
        1e-8,
        200,
    )?;
    Some(-p.log2())
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

    fn biased_bits(n: usize, p_one_percent: u64, seed: u64) -> Vec<u8> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                u8::from((state >> 33) % 100 < p_one_percent)
            })
            .collect()
    }

    #[test]
    fn curve_anchors() {
        assert!((expected_collision_time(0.5) - 2.5).abs() < 1e-12);
        assert!(expected_collision_time(0.999) < 2.01);
        // Monotone decreasing on the search interval.
        assert!(expected_collision_time(0.6) < expected_collision_time(0.55));
    }

    #[test]
    fn unbiased_bits_score_high() {
        let h = collision_estimate(&lcg_bits(200_000, 1)).unwrap();
        assert!(h > 0.8 && h <= 1.0, "h = {h}");
    }

    #[test]
    fn biased_bits_score_lower() {
        let h_fair = collision_estimate(&lcg_bits(200_000, 7)).unwrap();
        let h_biased = collision_estimate(&biased_bits(200_000, 80, 7)).unwrap();
        assert!(h_biased < h_fair, "{h_biased} vs {h_fair}");
        assert!(h_biased < 0.8);
    }

    #[test]
    fn deterministic_on_identical_input() {
        let bits = lcg_bits(50_000, 99);
        assert_eq!(collision_estimate(&bits), collision_estimate(&bits.clone()));
    }

    #[test]
    fn too_short_input_gives_nothing() {
        assert!(collision_estimate(&[0, 1]).is_none());
        assert!(collision_estimate(&[]).is_none());
    }
}
