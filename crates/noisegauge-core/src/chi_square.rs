//! Chi-square independence and goodness-of-fit health tests (SP 800-90B
//! section 5.2), with the alpha = 0.001 critical-value table.
//!
//! Both tests bin low-expectation cells greedily until every bin expects at
//! least 5 observations, accumulate the usual `(O - E)^2 / E` statistic, and
//! compare it against the tabulated critical value (Wilson-Hilferty above
//! df = 100). A sample passes when the statistic does not exceed the cutoff.
//!
//! The binary branch of these tests is intentionally absent: for a 2-symbol
//! alphabet the driver skips the chi-square battery entirely.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Critical values of the chi-squared distribution at alpha = 0.001 for
/// degrees of freedom 1..=100.
const CRITICAL_VALUE: [f64; 100] = [
    10.828, 13.816, 16.266, 18.467, 20.515, 22.458, 24.322, 26.125, 27.877, 29.588, 31.264, 32.91,
    34.528, 36.123, 37.697, 39.252, 40.79, 42.312, 43.82, 45.315, 46.797, 48.268, 49.728, 51.179,
    52.62, 54.052, 55.476, 56.892, 58.301, 59.703, 61.098, 62.487, 63.87, 65.247, 66.619, 67.985,
    69.347, 70.703, 72.055, 73.402, 74.745, 76.084, 77.419, 78.75, 80.077, 81.4, 82.72, 84.037,
    85.351, 86.661, 87.968, 89.272, 90.573, 91.872, 93.168, 94.461, 95.751, 97.039, 98.324,
    99.607, 100.888, 102.166, 103.442, 104.716, 105.988, 107.258, 108.526, 109.791, 111.055,
    112.317, 113.577, 114.835, 116.092, 117.346, 118.599, 119.85, 121.1, 122.348, 123.594,
    124.839, 126.083, 127.324, 128.565, 129.804, 131.041, 132.277, 133.512, 134.746, 135.978,
    137.208, 138.438, 139.666, 140.893, 142.119, 143.344, 144.567, 145.789, 147.01, 148.23,
    149.449,
];

/// Critical value at alpha = 0.001 for the given degrees of freedom.
///
/// Tabulated through df = 100; beyond that, the Wilson-Hilferty cube-root
/// approximation with the standard small-correction term.
pub fn chi_square_cutoff(df: usize) -> f64 {
    if df == 0 {
        return 0.0;
    }
    if df <= 100 {
        return CRITICAL_VALUE[df - 1];
    }
    let df = df as f64;
    let x_p = 3.090;
    let h_v = (60.0 / df) * 0.0048;
    let term = 2.0 / (9.0 * df);
    df * (1.0 - term + (x_p - h_v) * term.sqrt()).powi(3)
}

/// Outcome of a single chi-square test.
#[derive(Debug, Clone, Serialize)]
pub struct ChiSquareResult {
    /// The `sum (O - E)^2 / E` statistic.
    pub statistic: f64,
    /// Degrees of freedom after binning.
    pub df: usize,
    /// Critical value at alpha = 0.001.
    pub cutoff: f64,
    /// Survival probability of the statistic under the null.
    pub p_value: f64,
    /// True when `statistic <= cutoff`.
    pub passed: bool,
}

/// Combined verdict of the section 5.2 battery.
#[derive(Debug, Clone, Serialize)]
pub struct IidVerdict {
    pub independence: ChiSquareResult,
    /// Only run when independence passes.
    pub goodness_of_fit: Option<ChiSquareResult>,
    pub passed: bool,
}

impl ChiSquareResult {
    fn from_statistic(statistic: f64, df: usize) -> Self {
        let cutoff = chi_square_cutoff(df);
        let p_value = ChiSquared::new(df as f64)
            .map(|d| 1.0 - d.cdf(statistic))
            .unwrap_or(0.0);
        Self {
            statistic,
            df,
            cutoff,
            p_value,
            passed: statistic <= cutoff,
        }
    }
}

// ---------------------------------------------------------------------------
// Binning
// ---------------------------------------------------------------------------

/// Greedy allocation of expectation-sorted cells into bins of expected
/// count >= 5; an underfull trailing bin is merged into its predecessor.
struct Bins<K> {
    members: Vec<Vec<K>>,
    expected: Vec<f64>,
}

fn allocate_bins<K: Copy>(sorted: &[(f64, K)]) -> Bins<K> {
    let mut members: Vec<Vec<K>> = Vec::new();
    let mut expected: Vec<f64> = Vec::new();
    for &(e, key) in sorted {
        match (expected.last_mut(), members.last_mut()) {
            (Some(last), Some(bin)) if *last < 5.0 => {
                *last += e;
                bin.push(key);
            }
            _ => {
                expected.push(e);
                members.push(vec![key]);
            }
        }
    }
    if expected.len() >= 2 && expected.last().is_some_and(|&e| e < 5.0) {
        let e = expected.pop().unwrap_or(0.0);
        let m = members.pop().unwrap_or_default();
        if let Some(last) = expected.last_mut() {
            *last += e;
        }
        if let Some(last) = members.last_mut() {
            last.extend(m);
        }
    }
    Bins { members, expected }
}

// ---------------------------------------------------------------------------
// Independence
// ---------------------------------------------------------------------------

/// Chi-square test of independence over adjacent ordered symbol pairs.
///
/// Expected count of pair `(a, b)` is `p_a * p_b * (N - 1)`; pairs are
/// binned ascending by expectation. `None` when fewer than two bins can be
/// formed (the statistic would be meaningless).
pub fn chi_square_independence(symbols: &[u8], alph_size: usize) -> Option<ChiSquareResult> {
    let n = symbols.len();
    let k = alph_size;
    if n < 2 || k < 2 {
        return None;
    }

    let mut counts = vec![0u64; k];
    for &s in symbols {
        counts[s as usize] += 1;
    }
    let p: Vec<f64> = counts.iter().map(|&c| c as f64 / n as f64).collect();

    // Expected pair counts, ascending, pair key as tie-break.
    let mut expected: Vec<(f64, (u8, u8))> = Vec::with_capacity(k * k);
    for a in 0..k {
        for b in 0..k {
            expected.push((p[a] * p[b] * (n - 1) as f64, (a as u8, b as u8)));
        }
    }
    expected.sort_by(|x, y| {
        x.0.partial_cmp(&y.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(x.1.cmp(&y.1))
    });

    let bins = allocate_bins(&expected);
    if bins.expected.len() < 2 {
        return None;
    }

    let mut observed = vec![0u64; k * k];
    for w in symbols.windows(2) {
        observed[w[0] as usize * k + w[1] as usize] += 1;
    }

    let mut statistic = 0.0;
    for (members, &e) in bins.members.iter().zip(&bins.expected) {
        let o: u64 = members
            .iter()
            .map(|&(a, b)| observed[a as usize * k + b as usize])
            .sum();
        statistic += (o as f64 - e).powi(2) / e;
    }

    Some(ChiSquareResult::from_statistic(statistic, bins.expected.len() - 1))
}

// ---------------------------------------------------------------------------
// Goodness of fit
// ---------------------------------------------------------------------------

/// Chi-square goodness-of-fit across ten equal subsets of the sequence.
///
/// The expected per-subset count of each symbol is one tenth of its total
/// count over the ten subsets; symbols are binned ascending by expectation
/// and each subset contributes its own `(O - E)^2 / E` terms.
pub fn chi_square_goodness_of_fit(symbols: &[u8], alph_size: usize) -> Option<ChiSquareResult> {
    let n = symbols.len();
    let k = alph_size;
    let sublength = n / 10;
    if sublength == 0 || k < 2 {
        return None;
    }

    let mut subset_counts = vec![vec![0u64; k]; 10];
    for (subset, chunk) in symbols[..10 * sublength].chunks(sublength).enumerate() {
        for &s in chunk {
            subset_counts[subset][s as usize] += 1;
        }
    }

    let mut expected: Vec<(f64, u8)> = (0..k)
        .map(|s| {
            let total: u64 = subset_counts.iter().map(|c| c[s]).sum();
            (total as f64 / 10.0, s as u8)
        })
        .collect();
    expected.sort_by(|x, y| {
        x.0.partial_cmp(&y.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(x.1.cmp(&y.1))
    });

    let bins = allocate_bins(&expected);
    if bins.expected.len() < 2 {
        return None;
    }

    let mut statistic = 0.0;
    for counts in &subset_counts {
        for (members, &e) in bins.members.iter().zip(&bins.expected) {
            let o: u64 = members.iter().map(|&s| counts[s as usize]).sum();
            statistic += (o as f64 - e).powi(2) / e;
        }
    }

    Some(ChiSquareResult::from_statistic(
        statistic,
        9 * (bins.expected.len() - 1),
    ))
}

/// Run independence, then goodness-of-fit if independence passed.
pub fn chi_square_tests(symbols: &[u8], alph_size: usize) -> Option<IidVerdict> {
    let independence = chi_square_independence(symbols, alph_size)?;
    if !independence.passed {
        return Some(IidVerdict {
            independence,
            goodness_of_fit: None,
            passed: false,
        });
    }
    let gof = chi_square_goodness_of_fit(symbols, alph_size)?;
    let passed = gof.passed;
    Some(IidVerdict {
        independence,
        goodness_of_fit: Some(gof),
        passed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_bytes(n: usize, alph: u64, seed: u64) -> Vec<u8> {
        // splitmix64: pair statistics good enough for 0.1% cutoffs.
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state.wrapping_add(0x9e3779b97f4a7c15);
                let mut z = state;
                z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
                z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
                ((z ^ (z >> 31)) % alph) as u8
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Cutoff table
    // -----------------------------------------------------------------------

    #[test]
    fn cutoff_table_endpoints() {
        assert_eq!(chi_square_cutoff(1), 10.828);
        assert_eq!(chi_square_cutoff(100), 149.449);
    }

    #[test]
    fn cutoff_above_table_close_to_true_quantile() {
        for df in [101usize, 200, 500, 1000] {
            let approx = chi_square_cutoff(df);
            let exact = ChiSquared::new(df as f64).unwrap().inverse_cdf(0.999);
            assert!(
                (approx - exact).abs() / exact < 0.01,
                "df {df}: approx {approx}, exact {exact}"
            );
        }
    }

    #[test]
    fn cutoff_is_monotone_across_table_edge() {
        assert!(chi_square_cutoff(101) > chi_square_cutoff(100));
    }

    // -----------------------------------------------------------------------
    // Binning
    // -----------------------------------------------------------------------

    #[test]
    fn bins_reach_expected_five() {
        let cells: Vec<(f64, u8)> = (0..20).map(|i| (1.5, i as u8)).collect();
        let bins = allocate_bins(&cells);
        assert!(bins.expected.iter().all(|&e| e >= 5.0));
        let total: f64 = bins.expected.iter().sum();
        assert!((total - 30.0).abs() < 1e-9);
        let members: usize = bins.members.iter().map(|m| m.len()).sum();
        assert_eq!(members, 20);
    }

    #[test]
    fn underfull_tail_bin_merges_backwards() {
        let cells = [(6.0, 0u8), (6.0, 1), (1.0, 2)];
        let bins = allocate_bins(&cells);
        assert_eq!(bins.expected.len(), 2);
        assert!((bins.expected[1] - 7.0).abs() < 1e-9);
        assert_eq!(bins.members[1], vec![1, 2]);
    }

    // -----------------------------------------------------------------------
    // Independence
    // -----------------------------------------------------------------------

    #[test]
    fn independence_passes_on_uniform_bytes() {
        let data = random_bytes(100_000, 256, 0xdeadbeef);
        let r = chi_square_independence(&data, 256).unwrap();
        assert!(r.passed, "statistic {} cutoff {}", r.statistic, r.cutoff);
        assert!(r.p_value > 0.001);
    }

    #[test]
    fn independence_fails_on_alternating_pairs() {
        // 0,1,0,1,... never produces the pairs (0,0) or (1,1).
        let data: Vec<u8> = (0..100_000).map(|i| (i % 2) as u8).collect();
        let r = chi_square_independence(&data, 2).unwrap();
        assert!(!r.passed);
        assert!(r.statistic > 10.0 * r.cutoff);
    }

    #[test]
    fn independence_needs_two_symbols() {
        assert!(chi_square_independence(&[0u8; 100], 1).is_none());
    }

    // -----------------------------------------------------------------------
    // Goodness of fit
    // -----------------------------------------------------------------------

    #[test]
    fn goodness_of_fit_passes_on_uniform_bytes() {
        let data = random_bytes(100_000, 256, 0xcafef00d);
        let r = chi_square_goodness_of_fit(&data, 256).unwrap();
        assert!(r.passed, "statistic {} cutoff {}", r.statistic, r.cutoff);
        assert_eq!(r.df % 9, 0);
    }

    #[test]
    fn goodness_of_fit_fails_on_drifting_distribution() {
        // First half all zeros, second half all ones, a little uniform noise
        // spread over four values so binning has cells to work with.
        let mut data = Vec::with_capacity(100_000);
        for i in 0..100_000u32 {
            let v = if i % 10 == 9 {
                (i % 4) as u8
            } else if i < 50_000 {
                0
            } else {
                1
            };
            data.push(v);
        }
        let r = chi_square_goodness_of_fit(&data, 4).unwrap();
        assert!(!r.passed);
    }

    // -----------------------------------------------------------------------
    // Combined battery
    // -----------------------------------------------------------------------

    #[test]
    fn battery_passes_on_uniform_bytes() {
        let data = random_bytes(100_000, 256, 0x5eed);
        let v = chi_square_tests(&data, 256).unwrap();
        assert!(v.passed);
        assert!(v.goodness_of_fit.is_some());
    }

    #[test]
    fn battery_stops_after_failed_independence() {
        let data: Vec<u8> = (0..10_000).map(|i| (i % 2) as u8).collect();
        let v = chi_square_tests(&data, 2).unwrap();
        assert!(!v.passed);
        assert!(v.goodness_of_fit.is_none());
    }
}
