//! Suffix array, LCP array, and per-length repetition statistics.
//!
//! The t-tuple and LRS estimators both ask the same two questions about the
//! sample sequence, for every candidate tuple length `l`:
//!
//! - how often does the most common `l`-tuple occur?
//! - how many unordered pairs of positions carry identical `l`-tuples?
//!
//! Both answers fall out of the LCP array. A run of `r` adjacent LCP entries
//! `>= l` is a block of `r + 1` suffixes sharing an `l`-prefix, so the max
//! tuple count is `1 + longest_run(l)` and the pair count is the number of
//! rank intervals whose LCP minimum is `>= l`. [`LengthStats`] precomputes
//! both for every `l` at once with a monotonic stack, so periodic inputs
//! whose longest repeated substring approaches the sequence length still
//! cost O(N), not O(N * max_lcp).

/// Suffix array with its LCP array, over an 8-bit alphabet.
///
/// `sa` is the permutation of suffix start positions in lexicographic order;
/// `lcp[i]` is the longest common prefix of the suffixes at ranks `i - 1`
/// and `i` (`lcp[0] == 0`).
#[derive(Debug, Clone)]
pub struct SuffixArray {
    sa: Vec<u32>,
    lcp: Vec<u32>,
}

/// Repetition statistics indexed by tuple length.
#[derive(Debug, Clone)]
pub struct LengthStats {
    max_lcp: usize,
    /// `longest_run[l]` = longest run of adjacent LCP entries `>= l`, `l >= 1`.
    longest_run: Vec<u32>,
    /// `pairs[l]` = number of unordered suffix pairs with common prefix `>= l`.
    pairs: Vec<u64>,
}

impl SuffixArray {
    /// Build the suffix array by prefix doubling with counting sorts
    /// (O(N log N)), then the LCP array by Kasai's algorithm.
    pub fn build(text: &[u8]) -> Self {
        let n = text.len();
        if n == 0 {
            return Self {
                sa: Vec::new(),
                lcp: Vec::new(),
            };
        }

        let mut rank: Vec<u32> = text.iter().map(|&b| b as u32).collect();
        let mut new_rank: Vec<u32> = vec![0; n];
        let mut sa: Vec<u32> = vec![0; n];
        let mut buf: Vec<u32> = vec![0; n];

        // Round 0: order by the single leading symbol.
        let ident: Vec<u32> = (0..n as u32).collect();
        counting_sort(&ident, &mut sa, 255, |i| rank[i as usize] as usize);
        let mut max_rank = rerank(&sa, &rank, &mut new_rank, 0);
        std::mem::swap(&mut rank, &mut new_rank);

        let mut k = 1usize;
        while max_rank + 1 < n && k < n {
            // Stable two-pass radix: by the rank at offset k, then by the
            // leading rank. Suffixes too short for a second half sort first.
            counting_sort(&sa, &mut buf, max_rank + 1, |i| {
                let j = i as usize + k;
                if j < n {
                    rank[j] as usize + 1
                } else {
                    0
                }
            });
            counting_sort(&buf, &mut sa, max_rank, |i| rank[i as usize] as usize);
            max_rank = rerank(&sa, &rank, &mut new_rank, k);
            std::mem::swap(&mut rank, &mut new_rank);
            k *= 2;
        }

        // Kasai: walk suffixes in text order, reusing the previous overlap.
        let mut inv = vec![0u32; n];
        for (r, &i) in sa.iter().enumerate() {
            inv[i as usize] = r as u32;
        }
        let mut lcp = vec![0u32; n];
        let mut h = 0usize;
        for i in 0..n {
            let r = inv[i] as usize;
            if r == 0 {
                h = 0;
                continue;
            }
            let j = sa[r - 1] as usize;
            while i + h < n && j + h < n && text[i + h] == text[j + h] {
                h += 1;
            }
            lcp[r] = h as u32;
            h = h.saturating_sub(1);
        }

        Self { sa, lcp }
    }

    /// The suffix permutation.
    pub fn sa(&self) -> &[u32] {
        &self.sa
    }

    /// The LCP array (`lcp[0] == 0`).
    pub fn lcp(&self) -> &[u32] {
        &self.lcp
    }

    /// Length of the longest repeated substring.
    pub fn max_lcp(&self) -> usize {
        self.lcp.iter().copied().max().unwrap_or(0) as usize
    }

    /// Compute [`LengthStats`] for every tuple length in one O(N) pass.
    pub fn length_stats(&self) -> LengthStats {
        let a = if self.lcp.is_empty() {
            &self.lcp[..]
        } else {
            &self.lcp[1..]
        };
        let m = a.len();
        let max_lcp = a.iter().copied().max().unwrap_or(0) as usize;

        // Nearest strictly-smaller neighbours (and smaller-or-equal to the
        // right, so each rank interval attributes its minimum exactly once).
        let mut prev_lt = vec![-1i64; m];
        let mut next_lt = vec![m as i64; m];
        let mut next_le = vec![m as i64; m];
        let mut stack: Vec<usize> = Vec::new();
        for idx in 0..m {
            while stack.last().is_some_and(|&t| a[t] >= a[idx]) {
                stack.pop();
            }
            prev_lt[idx] = stack.last().map_or(-1, |&t| t as i64);
            stack.push(idx);
        }
        stack.clear();
        for idx in (0..m).rev() {
            while stack.last().is_some_and(|&t| a[t] >= a[idx]) {
                stack.pop();
            }
            next_lt[idx] = stack.last().map_or(m as i64, |&t| t as i64);
            stack.push(idx);
        }
        stack.clear();
        for idx in (0..m).rev() {
            while stack.last().is_some_and(|&t| a[t] > a[idx]) {
                stack.pop();
            }
            next_le[idx] = stack.last().map_or(m as i64, |&t| t as i64);
            stack.push(idx);
        }

        let mut pairs_exact = vec![0u64; max_lcp + 1];
        let mut best_window = vec![0u32; max_lcp + 1];
        for idx in 0..m {
            let v = a[idx] as usize;
            let left = (idx as i64 - prev_lt[idx]) as u64;
            let right = (next_le[idx] - idx as i64) as u64;
            pairs_exact[v] += left * right;
            let w = (next_lt[idx] - prev_lt[idx] - 1) as u32;
            if w > best_window[v] {
                best_window[v] = w;
            }
        }

        let mut pairs = vec![0u64; max_lcp + 1];
        let mut longest_run = vec![0u32; max_lcp + 1];
        let mut acc_pairs = 0u64;
        let mut acc_run = 0u32;
        for v in (1..=max_lcp).rev() {
            acc_pairs += pairs_exact[v];
            acc_run = acc_run.max(best_window[v]);
            pairs[v] = acc_pairs;
            longest_run[v] = acc_run;
        }

        LengthStats {
            max_lcp,
            longest_run,
            pairs,
        }
    }
}

impl LengthStats {
    /// Length of the longest repeated substring.
    pub fn max_len(&self) -> usize {
        self.max_lcp
    }

    /// Occurrence count of the most common tuple of length `l` (`l >= 1`).
    pub fn max_tuple_count(&self, l: usize) -> u64 {
        if l == 0 || l > self.max_lcp {
            return 1;
        }
        u64::from(self.longest_run[l]) + 1
    }

    /// Sum over distinct `l`-tuples of C(count, 2).
    pub fn tuple_pair_count(&self, l: usize) -> u64 {
        if l == 0 || l > self.max_lcp {
            return 0;
        }
        self.pairs[l]
    }
}

/// Stable counting sort of `src` indices into `dst` by `key`, keys in
/// `0..=max_key`.
fn counting_sort<F>(src: &[u32], dst: &mut [u32], max_key: usize, key: F)
where
    F: Fn(u32) -> usize,
{
    let mut count = vec![0u32; max_key + 2];
    for &i in src {
        count[key(i) + 1] += 1;
    }
    for j in 1..count.len() {
        count[j] += count[j - 1];
    }
    for &i in src {
        let k = key(i);
        dst[count[k] as usize] = i;
        count[k] += 1;
    }
}

/// Assign dense ranks to `sa` order comparing (rank, rank at +k) pairs;
/// returns the largest assigned rank.
fn rerank(sa: &[u32], rank: &[u32], new_rank: &mut [u32], k: usize) -> usize {
    let n = sa.len();
    let pair = |i: usize| {
        let second = if i + k < n { rank[i + k] + 1 } else { 0 };
        (rank[i], second)
    };
    let mut r = 0u32;
    new_rank[sa[0] as usize] = 0;
    for idx in 1..n {
        if pair(sa[idx] as usize) != pair(sa[idx - 1] as usize) {
            r += 1;
        }
        new_rank[sa[idx] as usize] = r;
    }
    r as usize
}
