//! Compression estimate (SP 800-90B 6.3.4, Maurer/Coron universal statistic).
//!
//! The bit sequence is regrouped into 6-bit blocks; the first 1000 blocks
//! seed a last-occurrence dictionary and each remaining block contributes
//! the log-distance to its previous occurrence. The confidence-adjusted mean
//! statistic is then inverted against the expectation under the near-uniform
//! family, where one block value has probability `p` and the other 63 share
//! the remainder.

use super::Z_ALPHA;
use crate::numeric::bisect_monotone;

/// Block width in bits.
const BLOCK_BITS: usize = 6;
/// Number of dictionary-priming blocks.
const DICT_BLOCKS: usize = 1000;
/// Block alphabet size.
const BLOCK_SPAN: usize = 1 << BLOCK_BITS;
/// Standard-deviation correction constant from the reference formulation.
const C_CORRECTION: f64 = 0.5907;

/// Compression estimate over a binary sequence; the result is per input bit.
///
/// `None` when fewer than two test blocks exist or the adjusted statistic
/// cannot be inverted.
pub fn compression_estimate(bits: &[u8]) -> Option<f64> {
    let num_blocks = bits.len() / BLOCK_BITS;
    if num_blocks <= DICT_BLOCKS + 1 {
        return None;
    }
    let v = num_blocks - DICT_BLOCKS;

    let blocks: Vec<u8> = bits
        .chunks_exact(BLOCK_BITS)
        .map(|c| c.iter().fold(0u8, |acc, &b| (acc << 1) | b))
        .collect();

    // last[b] = 1-based index of the most recent occurrence, 0 = unseen.
    let mut last = [0usize; BLOCK_SPAN];
    for (i, &b) in blocks[..DICT_BLOCKS].iter().enumerate() {
        last[b as usize] = i + 1;
    }

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for (offset, &b) in blocks[DICT_BLOCKS..num_blocks].iter().enumerate() {
        let i = DICT_BLOCKS + offset + 1;
        let prev = last[b as usize];
        let distance = if prev > 0 { i - prev } else { i };
        let log_d = (distance as f64).log2();
        sum += log_d;
        sum_sq += log_d * log_d;
        last[b as usize] = i;
    }

    let x_bar = sum / v as f64;
    let sigma = C_CORRECTION * (sum_sq / v as f64 - x_bar * x_bar).max(0.0).sqrt();
    let x_bar_adj = x_bar - Z_ALPHA * sigma / (v as f64).sqrt();

    let p = bisect_monotone(
        |p| expected_statistic(p, num_blocks),
        1.0 / BLOCK_SPAN as f64,
        1.0 - 1e-9,
        x_bar_adj,
        1e-8,
        200,
    )?;
    Some(-p.log2() / BLOCK_BITS as f64)
}

/// Expected value of the per-block statistic under the near-uniform family
/// with modal block probability `p`.
fn expected_statistic(p: f64, num_blocks: usize) -> f64 {
    let q = (1.0 - p) / (BLOCK_SPAN - 1) as f64;
    let v = num_blocks - DICT_BLOCKS;
    p * big_g(p, num_blocks, v) + (BLOCK_SPAN - 1) as f64 * q * big_g(q, num_blocks, v)
}

/// `G(z)` of 6.3.4: the expected log-distance contribution of a block value
/// with probability `z`, averaged over the test positions.
///
/// The reference double sum over (test position t, source distance u) is
/// folded into one pass over u by counting how many test positions admit
/// each distance:
///
/// ```text
/// G(z) = (1/v) [ sum_{t=d+1}^{L} log2(t) z (1-z)^(t-1)
///              + z^2 sum_{u=1}^{L-1} log2(u) (1-z)^(u-1) (L - max(d, u)) ]
/// ```
fn big_g(z: f64, num_blocks: usize, v: usize) -> f64 {
    let d = DICT_BLOCKS;
    let l = num_blocks;
    let mut first = 0.0f64;
    let mut second = 0.0f64;
    let mut pow = 1.0f64; // (1 - z)^(u - 1)
    let one_minus_z = 1.0 - z;
    for u in 1..=l {
        if pow < 1e-320 {
            break;
        }
        let log_u = (u as f64).log2();
        if u > d {
            first += log_u * z * pow;
        }
        if u < l {
            second += log_u * pow * (l - d.max(u)) as f64;
        }
        pow *= one_minus_z;
    }
    (first + z * z * second) / v as f64
}
