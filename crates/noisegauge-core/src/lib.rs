//! # noisegauge-core
//!
//! **How random is your noise source, really?**
//!
//! `noisegauge-core` implements the non-IID min-entropy estimation battery of
//! NIST SP 800-90B section 6.3: ten statistical estimators, each a conservative
//! lower bound on the per-symbol min-entropy of a sampled noise source, plus
//! the section 5.2 chi-square health tests that decide whether the samples are
//! plausibly independent and identically distributed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use noisegauge_core::{analyze, AssessmentConfig, SampleBuffer};
//!
//! let raw = std::fs::read("samples.bin").unwrap();
//! let data = SampleBuffer::from_bytes(&raw, 0).unwrap(); // 0 = infer word size
//! let report = analyze(&data, &AssessmentConfig::default()).unwrap();
//! println!("assessed min-entropy: {:.4} bits/sample", report.h_assessed);
//! ```
//!
//! ## Architecture
//!
//! Raw bytes → [`SampleBuffer`] (literal + bitstring forms) → estimators →
//! [`Report`] (per-estimator records, H_original / H_bitstring, assessment).
//!
//! Every estimator is a pure function over an immutable sample slice and
//! returns `Option<f64>`: `Some(bits_per_symbol)` or `None` when the
//! estimator is inapplicable or its numeric solver failed to converge. The
//! driver-side `min(...)` reduction simply skips absent values. Nothing in
//! this crate touches global state; parallelism belongs to the caller, one
//! analysis unit per input.

pub mod analysis;
pub mod chi_square;
pub mod error;
pub mod estimators;
pub mod numeric;
pub mod sample;
pub mod suffix;

pub use analysis::{
    analyze, AssessmentConfig, AssessmentMode, Domain, EstimatorKind, EstimatorRecord, Report,
};
pub use chi_square::{chi_square_cutoff, chi_square_tests, ChiSquareResult, IidVerdict};
pub use error::Error;
pub use sample::{SampleBuffer, MIN_SIZE};
pub use suffix::SuffixArray;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
