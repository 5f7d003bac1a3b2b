//! `assess` subcommand: the batch driver.
//!
//! The unit of concurrency is the input file. A bounded pool of workers
//! pulls file indices off a shared atomic counter; each worker owns its
//! unit's buffer, report, and log writer end to end, so nothing is shared
//! but the results vector. Estimators within a unit run sequentially.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use serde::Serialize;

use noisegauge_core::{
    analyze, AssessmentConfig, AssessmentMode, Domain, Error, Report, SampleBuffer, MIN_SIZE,
};

use crate::unit_log::UnitLog;

pub struct AssessCommandConfig<'a> {
    pub files: &'a [PathBuf],
    pub bits: u8,
    pub mode: AssessmentMode,
    pub all_bits: bool,
    pub verbose: u8,
    pub subset: Option<&'a str>,
    pub output_dir: Option<&'a Path>,
    pub output_path: Option<&'a Path>,
    pub workers: Option<usize>,
}

/// JSON row for one unit.
#[derive(Serialize)]
struct UnitSummary {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(cfg: AssessCommandConfig<'_>) {
    let subset = match cfg.subset.map(parse_subset).transpose() {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("invalid --subset: {msg}");
            std::process::exit(2);
        }
    };

    let workers = cfg
        .workers
        .unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
        .max(1)
        .min(cfg.files.len().max(1));

    let next = AtomicUsize::new(0);
    let results: Mutex<Vec<(usize, Result<Report, Error>)>> = Mutex::new(Vec::new());

    thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| loop {
                let i = next.fetch_add(1, Ordering::Relaxed);
                if i >= cfg.files.len() {
                    break;
                }
                let outcome = assess_unit(&cfg.files[i], &cfg, subset);
                results.lock().unwrap().push((i, outcome));
            });
        }
    });

    let mut results = results.into_inner().unwrap();
    results.sort_by_key(|(i, _)| *i);

    let mut failures = 0usize;
    let mut summaries = Vec::with_capacity(results.len());
    for (i, outcome) in results {
        let path = cfg.files[i].display().to_string();
        match outcome {
            Ok(report) => {
                print_unit(&path, &report, cfg.verbose);
                summaries.push(UnitSummary {
                    path,
                    report: Some(report),
                    error: None,
                });
            }
            Err(e) => {
                eprintln!("{path}: {e}");
                failures += 1;
                summaries.push(UnitSummary {
                    path,
                    report: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    if let Some(out) = cfg.output_path {
        match serde_json::to_string_pretty(&summaries) {
            Ok(json) => {
                if let Err(e) = std::fs::write(out, json) {
                    eprintln!("{}: {e}", out.display());
                    failures += 1;
                }
            }
            Err(e) => {
                eprintln!("report serialization failed: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}

/// Load, assess, and log a single unit.
fn assess_unit(
    path: &Path,
    cfg: &AssessCommandConfig<'_>,
    subset: Option<(usize, usize)>,
) -> Result<Report, Error> {
    let mut raw = std::fs::read(path)?;
    if let Some((index, size)) = subset {
        let start = index * size;
        let end = start + size;
        if end > raw.len() {
            return Err(Error::InsufficientSamples {
                got: raw.len().saturating_sub(start),
                need: size,
            });
        }
        raw = raw[start..end].to_vec();
    }
    if raw.len() < MIN_SIZE {
        return Err(Error::InsufficientSamples {
            got: raw.len(),
            need: MIN_SIZE,
        });
    }

    let data = SampleBuffer::from_bytes(&raw, cfg.bits)?;
    if cfg.verbose > 0 {
        println!(
            "{}: {} samples of {} distinct {}-bit symbols",
            path.display(),
            data.len(),
            data.alph_size(),
            data.word_size()
        );
    }

    let config = AssessmentConfig {
        mode: cfg.mode,
        all_bits: cfg.all_bits,
        verbose: cfg.verbose,
    };
    let report = analyze(&data, &config)?;

    if let Some(dir) = cfg.output_dir {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unit".to_string());
        let mut log = UnitLog::create(dir, &stem)?;
        for record in &report.records {
            log.record(record.estimate)?;
        }
        log.finish(report.h_assessed)?;
    }

    Ok(report)
}

/// Print one unit's results; per-estimator detail at -v and above.
fn print_unit(path: &str, report: &Report, verbose: u8) {
    if verbose > 0 {
        for record in &report.records {
            let domain = match record.domain {
                Domain::Bitstring => "bitstring",
                Domain::Literal => "literal",
            };
            match record.estimate {
                Some(h) => println!("  {} ({domain}) = {h:.6}", record.estimator.name()),
                None => println!("  {} ({domain}) = no estimate", record.estimator.name()),
            }
        }
        if let Some(h) = report.h_original {
            println!("  H_original = {h:.6}");
        }
        if let Some(h) = report.h_bitstring {
            println!("  H_bitstring = {h:.6}");
        }
        if let Some(chi) = &report.chi_square {
            println!(
                "  chi-square health test: {}",
                if chi.passed { "pass" } else { "FAIL" }
            );
        }
    }
    println!(
        "{path}: assessed min-entropy = {:.6} / {} bit(s)",
        report.h_assessed, report.word_size
    );
}

/// Parse `<index>,<samples>`.
fn parse_subset(s: &str) -> Result<(usize, usize), String> {
    let (index, size) = s
        .split_once(',')
        .ok_or_else(|| format!("expected <index>,<samples>, got '{s}'"))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad index: {e}"))?;
    let size = size
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad sample count: {e}"))?;
    if size == 0 {
        return Err("sample count must be positive".to_string());
    }
    Ok((index, size))
}
