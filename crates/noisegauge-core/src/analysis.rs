//! The assessment engine: run the full estimator battery over one sample
//! buffer and reduce the results to an assessed min-entropy.
//!
//! `analyze` is a pure function of `(SampleBuffer, AssessmentConfig)`. The
//! battery runs in a fixed canonical order (for each estimator, the
//! bitstring record precedes the literal record) because downstream logs
//! are compared line by line; the final minimum does not depend on it.
//!
//! Dispatch rules, inherited from the reference driver:
//! - the bitstring battery runs when `alph_size > 2` or in conditioned
//!   mode (for a binary source in initial mode it would duplicate the
//!   literal battery);
//! - the literal battery runs in initial mode only;
//! - collision, Markov, and compression are binary-sequence estimators:
//!   on the literal side they require `alph_size == 2`.

use serde::Serialize;

use crate::chi_square::{chi_square_tests, IidVerdict};
use crate::error::Error;
use crate::estimators::{
    collision::collision_estimate, compression::compression_estimate, lag::lag_estimate,
    lz78y::lz78y_estimate, markov::markov_estimate, mcv::mcv_estimate,
    multi_mcw::multi_mcw_estimate, multi_mmc::multi_mmc_estimate, tuple::tuple_estimates,
};
use crate::sample::{SampleBuffer, MIN_SIZE};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What the assessment is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentMode {
    /// Initial entropy estimate: literal battery plus, for non-binary
    /// sources, the bitstring battery.
    InitialEntropy,
    /// Conditioned sequential dataset estimate: bitstring battery only.
    Conditioned,
}

/// Assessment options.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    pub mode: AssessmentMode,
    /// When false, the bitstring is truncated to [`MIN_SIZE`] bits.
    pub all_bits: bool,
    /// Driver verbosity; the engine itself never prints.
    pub verbose: u8,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            mode: AssessmentMode::InitialEntropy,
            all_bits: true,
            verbose: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Which form of the sequence an estimate was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Bitstring,
    Literal,
}

/// The ten estimators, in canonical battery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    MostCommonValue,
    Collision,
    Markov,
    Compression,
    TTuple,
    Lrs,
    MultiMcw,
    Lag,
    MultiMmc,
    Lz78y,
}

impl EstimatorKind {
    /// Canonical battery order.
    pub const ALL: [EstimatorKind; 10] = [
        Self::MostCommonValue,
        Self::Collision,
        Self::Markov,
        Self::Compression,
        Self::TTuple,
        Self::Lrs,
        Self::MultiMcw,
        Self::Lag,
        Self::MultiMmc,
        Self::Lz78y,
    ];

    /// Human-readable estimator name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MostCommonValue => "most common value",
            Self::Collision => "collision",
            Self::Markov => "markov",
            Self::Compression => "compression",
            Self::TTuple => "t-tuple",
            Self::Lrs => "longest repeated substring",
            Self::MultiMcw => "multi most common in window",
            Self::Lag => "lag prediction",
            Self::MultiMmc => "multi markov model with counting",
            Self::Lz78y => "lz78y prediction",
        }
    }

    /// True for the estimators defined only over binary sequences.
    fn binary_only(&self) -> bool {
        matches!(self, Self::Collision | Self::Markov | Self::Compression)
    }
}

/// One estimator run: which estimator, over which form, and its estimate
/// (`None` = inapplicable or non-convergent, skipped by the reduction).
#[derive(Debug, Clone, Serialize)]
pub struct EstimatorRecord {
    pub estimator: EstimatorKind,
    pub domain: Domain,
    pub estimate: Option<f64>,
}

/// Full result of one analysis unit.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub len: usize,
    pub word_size: u8,
    pub alph_size: usize,
    pub mode: AssessmentMode,
    /// Per-estimator records in canonical order; skipped runs are absent.
    pub records: Vec<EstimatorRecord>,
    /// Minimum over the literal battery, starting from `word_size`.
    pub h_original: Option<f64>,
    /// Minimum over the bitstring battery, starting from 1.
    pub h_bitstring: Option<f64>,
    /// The assessed min-entropy in bits per sample.
    pub h_assessed: f64,
    /// Section 5.2 health verdict; absent for binary alphabets.
    pub chi_square: Option<IidVerdict>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Run the battery over one sample buffer.
///
/// Fails only on a degenerate (single-symbol) alphabet; every estimator-level
/// failure is recorded as an absent estimate instead.
pub fn analyze(data: &SampleBuffer, config: &AssessmentConfig) -> Result<Report, Error> {
    if data.alph_size() < 2 {
        return Err(Error::DegenerateAlphabet);
    }

    let word_size = data.word_size();
    let alph_size = data.alph_size();
    let run_bitstring =
        alph_size > 2 || config.mode == AssessmentMode::Conditioned;
    let run_literal = config.mode == AssessmentMode::InitialEntropy;

    let bits = if config.all_bits {
        data.bsymbols()
    } else {
        &data.bsymbols()[..data.blen().min(MIN_SIZE)]
    };
    let symbols = data.symbols();

    // The two suffix-array estimators share one build per domain.
    let bit_tuples = run_bitstring.then(|| tuple_estimates(bits, 2));
    let lit_tuples = run_literal.then(|| tuple_estimates(symbols, alph_size));

    let mut records = Vec::new();
    let mut h_bitstring = 1.0f64;
    let mut h_original = word_size as f64;

    for kind in EstimatorKind::ALL {
        if run_bitstring {
            let estimate = match kind {
                EstimatorKind::TTuple => bit_tuples.as_ref().and_then(|t| t.t_tuple),
                EstimatorKind::Lrs => bit_tuples.as_ref().and_then(|t| t.lrs),
                _ => run_estimator(kind, bits, 2),
            };
            if let Some(h) = estimate {
                h_bitstring = h_bitstring.min(h);
            }
            records.push(EstimatorRecord {
                estimator: kind,
                domain: Domain::Bitstring,
                estimate,
            });
        }
        if run_literal && (!kind.binary_only() || alph_size == 2) {
            let estimate = match kind {
                EstimatorKind::TTuple => lit_tuples.as_ref().and_then(|t| t.t_tuple),
                EstimatorKind::Lrs => lit_tuples.as_ref().and_then(|t| t.lrs),
                _ => run_estimator(kind, symbols, alph_size),
            };
            if let Some(h) = estimate {
                h_original = h_original.min(h);
            }
            records.push(EstimatorRecord {
                estimator: kind,
                domain: Domain::Literal,
                estimate,
            });
        }
    }

    let mut h_assessed = word_size as f64;
    if run_bitstring {
        h_assessed = h_assessed.min(h_bitstring * word_size as f64);
    }
    if run_literal {
        h_assessed = h_assessed.min(h_original);
    }

    let chi_square = (alph_size > 2).then(|| chi_square_tests(symbols, alph_size)).flatten();

    Ok(Report {
        len: data.len(),
        word_size,
        alph_size,
        mode: config.mode,
        records,
        h_original: run_literal.then_some(h_original),
        h_bitstring: run_bitstring.then_some(h_bitstring),
        h_assessed,
        chi_square,
    })
}

/// Dispatch one estimator over one symbol sequence.
///
/// The suffix-array pair (t-tuple, LRS) is precomputed by `analyze` and
/// never reaches this function.
fn run_estimator(kind: EstimatorKind, symbols: &[u8], alph_size: usize) -> Option<f64> {
    match kind {
        EstimatorKind::MostCommonValue => mcv_estimate(symbols, alph_size),
        EstimatorKind::Collision => collision_estimate(symbols),
        EstimatorKind::Markov => markov_estimate(symbols),
        EstimatorKind::Compression => compression_estimate(symbols),
        EstimatorKind::MultiMcw => multi_mcw_estimate(symbols, alph_size),
        EstimatorKind::Lag => lag_estimate(symbols, alph_size),
        EstimatorKind::MultiMmc => multi_mmc_estimate(symbols, alph_size),
        EstimatorKind::Lz78y => lz78y_estimate(symbols, alph_size),
        EstimatorKind::TTuple | EstimatorKind::Lrs => unreachable!("handled by analyze"),
    }
}
